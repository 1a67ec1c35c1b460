use intake_common::Money;
use serde::{Deserialize, Serialize};

use crate::db_types::{DeliveryMethod, OrderSource};

/// The canonical order shape produced by every intake adapter.
///
/// An `IntakeOrder` only lives for the duration of a single request. Nothing downstream of the adapters knows which
/// source the payload came from, other than the `source` tag that is recorded on the order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeOrder {
    pub customer_name: Option<String>,
    /// The customer identity key
    pub phone: String,
    pub email: Option<String>,
    /// The address the customer supplied about themselves, used when no explicit delivery address is given.
    pub customer_address: Option<String>,
    pub delivery_method: DeliveryMethod,
    pub delivery_address: Option<String>,
    pub payment_method: Option<String>,
    pub lines: Vec<IntakeLine>,
    pub notes: Option<String>,
    pub allergy_info: Option<String>,
    pub source: OrderSource,
    pub call_id: Option<String>,
}

impl IntakeOrder {
    pub fn new(source: OrderSource, phone: impl Into<String>) -> Self {
        Self {
            customer_name: None,
            phone: phone.into(),
            email: None,
            customer_address: None,
            delivery_method: DeliveryMethod::Pickup,
            delivery_address: None,
            payment_method: None,
            lines: Vec::new(),
            notes: None,
            allergy_info: None,
            source,
            call_id: None,
        }
    }

    pub fn with_customer_name(mut self, name: impl Into<String>) -> Self {
        self.customer_name = Some(name.into());
        self
    }

    pub fn with_delivery(mut self, address: impl Into<String>) -> Self {
        self.delivery_method = DeliveryMethod::Delivery;
        self.delivery_address = Some(address.into());
        self
    }

    pub fn with_line(mut self, line: IntakeLine) -> Self {
        self.lines.push(line);
        self
    }
}

/// A single requested line, exactly as the customer (or the transcript) phrased it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeLine {
    pub name: String,
    pub quantity: i64,
    pub modifiers: Vec<String>,
    pub special_instructions: Option<String>,
}

impl IntakeLine {
    pub fn new(name: impl Into<String>, quantity: i64) -> Self {
        Self { name: name.into(), quantity, modifiers: Vec::new(), special_instructions: None }
    }

    pub fn with_modifier(mut self, modifier: impl Into<String>) -> Self {
        self.modifiers.push(modifier.into());
        self
    }
}

/// The outcome of a successfully accepted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReceipt {
    pub order_id: i64,
    pub order_number: String,
    pub total_amount: Money,
    pub items_count: usize,
}
