//! Structural validation of incoming orders.
//!
//! Validation runs before any data store access, so a rejected request never costs a database round trip and can
//! never leave a partial write behind.
use log::*;

use super::{errors::ValidationError, intake_objects::IntakeOrder};
use crate::db_types::DeliveryMethod;

/// The most units of a single item one order line may ask for.
pub const MAX_LINE_QUANTITY: i64 = 999;

/// An order that has passed structural validation, along with the address it will be delivered to (if any).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedOrder {
    pub order: IntakeOrder,
    /// `Some` if and only if the order is a delivery.
    pub delivery_address: Option<String>,
}

/// Checks that the order carries a phone number, at least one line, a quantity between 1 and [`MAX_LINE_QUANTITY`] on
/// every line and, for deliveries, an address from one of the accepted sources.
pub fn validate_order(order: IntakeOrder) -> Result<ValidatedOrder, ValidationError> {
    if order.phone.trim().is_empty() {
        warn!("🧾️ Rejecting order from {}: no customer phone number", order.source);
        return Err(ValidationError::MissingPhone);
    }
    if order.lines.is_empty() {
        warn!("🧾️ Rejecting order from {} for {}: no items", order.source, order.phone);
        return Err(ValidationError::NoItems);
    }
    if let Some(line) = order.lines.iter().find(|l| !(1..=MAX_LINE_QUANTITY).contains(&l.quantity)) {
        warn!("🧾️ Rejecting order for {}: \"{}\" has quantity {}", order.phone, line.name, line.quantity);
        return Err(ValidationError::InvalidQuantity { name: line.name.clone(), quantity: line.quantity });
    }
    let delivery_address = match order.delivery_method {
        DeliveryMethod::Pickup => None,
        DeliveryMethod::Delivery => {
            let address = resolve_delivery_address(&order);
            debug!(
                "🧾️ Address sources for {}: delivery address: {:?}, customer address: {:?}, using: {:?}",
                order.phone, order.delivery_address, order.customer_address, address
            );
            match address {
                Some(a) => Some(a),
                None => {
                    error!("🧾️ Delivery order for {} without an address. Rejecting.", order.phone);
                    return Err(ValidationError::MissingDeliveryAddress);
                },
            }
        },
    };
    Ok(ValidatedOrder { order, delivery_address })
}

/// The explicit delivery address wins. Otherwise, fall back to the address the customer supplied about themselves.
pub fn resolve_delivery_address(order: &IntakeOrder) -> Option<String> {
    [order.delivery_address.as_deref(), order.customer_address.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(String::from)
}
