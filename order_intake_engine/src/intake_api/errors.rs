use std::fmt::Display;

use thiserror::Error;

use crate::traits::IntakeStoreError;

/// Structural problems with an incoming order. These are raised before the data store is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Customer phone number is required")]
    MissingPhone,
    #[error("Order must contain at least one item")]
    NoItems,
    #[error("Delivery orders must include an address")]
    MissingDeliveryAddress,
    #[error("Item \"{name}\" has an invalid quantity ({quantity})")]
    InvalidQuantity { name: String, quantity: i64 },
}

/// The data store step at which an order failed to persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceStage {
    MenuFetch,
    CustomerLookup,
    CustomerCreate,
    CustomerUpdate,
    OrderInsert,
    OrderItemsInsert,
}

impl Display for PersistenceStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PersistenceStage::MenuFetch => write!(f, "Failed to fetch menu items"),
            PersistenceStage::CustomerLookup => write!(f, "Failed to look up customer"),
            PersistenceStage::CustomerCreate => write!(f, "Failed to create customer"),
            PersistenceStage::CustomerUpdate => write!(f, "Failed to update customer"),
            PersistenceStage::OrderInsert => write!(f, "Failed to create order"),
            PersistenceStage::OrderItemsInsert => write!(f, "Failed to create order items"),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum IntakeError {
    #[error("{0}")]
    Validation(#[from] ValidationError),
    /// One or more lines could not be matched to the menu, or matched an item without a valid price.
    /// Each entry describes one failing line.
    #[error("Order validation failed")]
    RejectedItems(Vec<String>),
    #[error("{stage}")]
    Persistence { stage: PersistenceStage, source: IntakeStoreError },
}

impl IntakeError {
    pub fn persistence(stage: PersistenceStage) -> impl FnOnce(IntakeStoreError) -> Self {
        move |source| Self::Persistence { stage, source }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::RejectedItems(_))
    }
}
