use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
pub use intake_common::Money;
use log::warn;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

/// The reserved price that marks a menu item as a placeholder that has not really been priced.
pub const SENTINEL_PRICE: Money = Money::from_minor(1);

#[derive(Debug, Clone, Error)]
#[error("Invalid value for {field}: {value}")]
pub struct ConversionError {
    pub field: &'static str,
    pub value: String,
}

//--------------------------------------      MenuItem        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: i64,
    /// The canonical name. May carry a leading ordinal ("4. ") and a size qualifier ("(Large)").
    pub name: String,
    pub price: Money,
    pub available: bool,
}

impl MenuItem {
    /// A menu item is priced if its price is positive and is not the placeholder sentinel.
    pub fn is_priced(&self) -> bool {
        self.price.is_positive() && self.price != SENTINEL_PRICE
    }
}

//--------------------------------------   DeliveryMethod     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMethod {
    #[default]
    Pickup,
    Delivery,
}

impl DeliveryMethod {
    pub fn is_delivery(&self) -> bool {
        matches!(self, Self::Delivery)
    }

    /// Lenient parsing for free-text sources. Anything that is not recognisably "delivery" is a pickup.
    pub fn from_loose(value: Option<&str>) -> Self {
        match value.map(str::trim).filter(|s| !s.is_empty()) {
            None => Self::Pickup,
            Some(s) => s.parse().unwrap_or_else(|e| {
                warn!("{e}. Treating the order as a pickup");
                Self::Pickup
            }),
        }
    }
}

impl Display for DeliveryMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryMethod::Pickup => write!(f, "pickup"),
            DeliveryMethod::Delivery => write!(f, "delivery"),
        }
    }
}

impl FromStr for DeliveryMethod {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pickup" => Ok(Self::Pickup),
            "delivery" => Ok(Self::Delivery),
            _ => Err(ConversionError { field: "delivery method", value: s.to_string() }),
        }
    }
}

//--------------------------------------    OrderSource       ---------------------------------------------------------
/// The external system an order arrived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderSource {
    /// The workflow-automation bot
    N8n,
    /// The voice-call AI agent
    Vapi,
}

impl Display for OrderSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderSource::N8n => write!(f, "n8n"),
            OrderSource::Vapi => write!(f, "vapi"),
        }
    }
}

//--------------------------------------   OrderStatusType    ---------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatusType {
    /// Newly received, not yet picked up by the kitchen
    #[default]
    Pending,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::Pending => write!(f, "pending"),
            OrderStatusType::Preparing => write!(f, "preparing"),
            OrderStatusType::Ready => write!(f, "ready"),
            OrderStatusType::Completed => write!(f, "completed"),
            OrderStatusType::Cancelled => write!(f, "cancelled"),
        }
    }
}

//--------------------------------------   PaymentStatus      ---------------------------------------------------------
/// Payment is recorded here, never captured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Refunded,
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Paid => write!(f, "paid"),
            PaymentStatus::Refunded => write!(f, "refunded"),
        }
    }
}

//--------------------------------------      Customer        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
}

/// A partial update to a customer record. Fields that are `None` are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
}

impl CustomerUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.address.is_none()
    }
}

//--------------------------------------        Order         ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub order_number: String,
    pub customer_id: i64,
    pub delivery_method: DeliveryMethod,
    pub delivery_address: Option<String>,
    pub payment_method: Option<String>,
    pub total_amount: Money,
    pub notes: Option<String>,
    pub allergy_info: Option<String>,
    pub external_source: OrderSource,
    pub call_id: Option<String>,
    pub order_status: OrderStatusType,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------      NewOrder        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub order_number: String,
    pub customer_id: i64,
    pub delivery_method: DeliveryMethod,
    /// Always `None` for pickups
    pub delivery_address: Option<String>,
    pub payment_method: Option<String>,
    pub total_amount: Money,
    pub notes: Option<String>,
    pub allergy_info: Option<String>,
    pub external_source: OrderSource,
    pub call_id: Option<String>,
    pub order_status: OrderStatusType,
    pub payment_status: PaymentStatus,
}

impl Display for NewOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Order {} for customer #{} ({}, {} via {})",
            self.order_number, self.customer_id, self.delivery_method, self.total_amount, self.external_source
        )
    }
}

//--------------------------------------     OrderItem        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub menu_item_id: i64,
    pub item_name: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub subtotal: Money,
    pub special_instructions: Option<String>,
}

/// An order line that is ready to be written. The parent order id is supplied at insert time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderItem {
    pub menu_item_id: i64,
    pub item_name: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub subtotal: Money,
    pub special_instructions: Option<String>,
}
