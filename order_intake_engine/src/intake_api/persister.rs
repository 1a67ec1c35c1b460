//! Writes an accepted order to the data store.
//!
//! The customer is resolved (or created) first, then the order header and its lines are written through
//! [`OrderIntakeDatabase::insert_order_with_items`], which guarantees that a header never survives without its items.
//! Order numbers are random, so if the store reports that a number is already taken, the write is repeated with a
//! fresh number.
use chrono::Utc;
use log::*;
use rand::Rng;

use super::{
    errors::{IntakeError, PersistenceStage},
    intake_objects::{IntakeOrder, OrderReceipt},
    pricing::PricedOrder,
};
use crate::{
    db_types::{Customer, CustomerUpdate, NewCustomer, NewOrder, OrderStatusType, PaymentStatus},
    traits::{IntakeStoreError, OrderIntakeDatabase, OrderWriteError},
};

/// The name placeholder used by the voice agent when the caller did not give a name. It is never written over a real
/// name.
pub const UNKNOWN_CUSTOMER_NAME: &str = "Unknown";

/// How many order numbers are tried before a write that keeps colliding is given up on.
pub const ORDER_NUMBER_ATTEMPTS: usize = 5;

/// Generates a human-friendly order number of the form `YYMMDD-NNNNNN`.
pub fn new_order_number() -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{}-{suffix:06}", Utc::now().format("%y%m%d"))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Works out which customer fields need to change. Values are only ever replaced by a non-empty, different value, and
/// a placeholder name never replaces anything.
pub fn customer_changes(existing: &Customer, name: Option<&str>, address: Option<&str>) -> CustomerUpdate {
    let name = non_empty(name)
        .filter(|n| *n != UNKNOWN_CUSTOMER_NAME)
        .filter(|n| *n != existing.name)
        .map(String::from);
    let address = non_empty(address).filter(|a| Some(*a) != existing.address.as_deref()).map(String::from);
    CustomerUpdate { name, address }
}

/// Finds the customer by phone number, refreshing their name and address if the order carries newer values, or
/// creates a new customer record.
pub async fn resolve_customer<B: OrderIntakeDatabase>(
    db: &B,
    order: &IntakeOrder,
    address: Option<&str>,
) -> Result<Customer, IntakeError> {
    let phone = order.phone.trim();
    let existing = db
        .fetch_customer_by_phone(phone)
        .await
        .map_err(IntakeError::persistence(PersistenceStage::CustomerLookup))?;
    match existing {
        Some(customer) => {
            let update = customer_changes(&customer, order.customer_name.as_deref(), address);
            if update.is_empty() {
                debug!("👤️ Returning customer #{} ({phone}). Nothing to update.", customer.id);
                return Ok(customer);
            }
            info!("👤️ Updating customer #{} ({phone}): {update:?}", customer.id);
            db.update_customer(customer.id, update).await.map_err(|e| {
                error!("👤️ Could not update customer #{}. {e}", customer.id);
                IntakeError::persistence(PersistenceStage::CustomerUpdate)(e)
            })
        },
        None => {
            let new_customer = NewCustomer {
                name: non_empty(order.customer_name.as_deref()).unwrap_or(UNKNOWN_CUSTOMER_NAME).to_string(),
                phone: phone.to_string(),
                email: non_empty(order.email.as_deref()).map(String::from),
                address: non_empty(address).map(String::from),
            };
            let customer = db.insert_customer(new_customer).await.map_err(|e| {
                error!("👤️ Could not create a customer for {phone}. {e}");
                IntakeError::persistence(PersistenceStage::CustomerCreate)(e)
            })?;
            info!("👤️ New customer #{} created for {phone}", customer.id);
            Ok(customer)
        },
    }
}

/// Builds the order header. Pickup orders never carry a delivery address.
pub fn build_new_order(
    order: &IntakeOrder,
    customer_id: i64,
    delivery_address: Option<String>,
    priced: &PricedOrder,
) -> NewOrder {
    NewOrder {
        order_number: new_order_number(),
        customer_id,
        delivery_method: order.delivery_method,
        delivery_address: delivery_address.filter(|_| order.delivery_method.is_delivery()),
        payment_method: non_empty(order.payment_method.as_deref()).map(String::from),
        total_amount: priced.total,
        notes: non_empty(order.notes.as_deref()).map(String::from),
        allergy_info: non_empty(order.allergy_info.as_deref()).map(String::from),
        external_source: order.source,
        call_id: non_empty(order.call_id.as_deref()).map(String::from),
        order_status: OrderStatusType::Pending,
        payment_status: PaymentStatus::Pending,
    }
}

/// Writes the order header and lines, and maps any failure onto the stage at which it happened.
pub async fn write_order<B: OrderIntakeDatabase>(
    db: &B,
    new_order: NewOrder,
    priced: PricedOrder,
) -> Result<OrderReceipt, IntakeError> {
    debug!("📝️ Writing {new_order}");
    let items_count = priced.items_count();
    let mut new_order = new_order;
    let mut attempt = 1;
    let result = loop {
        match db.insert_order_with_items(new_order.clone(), priced.items.clone()).await {
            Err(OrderWriteError::OrderInsert(IntakeStoreError::DuplicateOrderNumber(taken)))
                if attempt < ORDER_NUMBER_ATTEMPTS =>
            {
                attempt += 1;
                new_order.order_number = new_order_number();
                warn!(
                    "📝️ Order number {taken} is already taken. Trying {} (attempt {attempt} of {ORDER_NUMBER_ATTEMPTS})",
                    new_order.order_number
                );
            },
            other => break other,
        }
    };
    match result {
        Ok((order, items)) => {
            info!(
                "📝️ Order {} (#{}) saved for customer #{} with {} items. Total {}",
                order.order_number,
                order.id,
                order.customer_id,
                items.len(),
                order.total_amount
            );
            Ok(OrderReceipt {
                order_id: order.id,
                order_number: order.order_number,
                total_amount: order.total_amount,
                items_count,
            })
        },
        Err(OrderWriteError::OrderInsert(e)) => {
            error!("📝️ Could not create the order. {e}");
            Err(IntakeError::persistence(PersistenceStage::OrderInsert)(e))
        },
        Err(OrderWriteError::ItemsInsert { order_id, source, rolled_back }) => {
            error!("📝️ Could not create the items for order #{order_id} (order removed: {rolled_back}). {source}");
            Err(IntakeError::persistence(PersistenceStage::OrderItemsInsert)(source))
        },
    }
}
