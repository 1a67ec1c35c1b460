use log::*;
use thiserror::Error;

use crate::db_types::{Customer, CustomerUpdate, MenuItem, NewCustomer, NewOrder, NewOrderItem, Order, OrderItem};

/// This trait defines the data store operations used by the order intake pipeline.
///
/// Every call is a single round trip to the store. Implementations must not cache across calls: the pipeline fetches
/// a fresh menu snapshot for every request.
#[allow(async_fn_in_trait)]
pub trait OrderIntakeDatabase {
    /// The URL of the database
    fn url(&self) -> &str;

    /// Fetches every menu item that is currently marked as available.
    async fn fetch_available_menu_items(&self) -> Result<Vec<MenuItem>, IntakeStoreError>;

    /// Fetches the customer with the given phone number. Phone numbers are not unique in the store; if more than one
    /// customer shares the number, the oldest record is returned.
    async fn fetch_customer_by_phone(&self, phone: &str) -> Result<Option<Customer>, IntakeStoreError>;

    async fn insert_customer(&self, customer: NewCustomer) -> Result<Customer, IntakeStoreError>;

    /// Applies a partial update to the customer record. Fields that are `None` in `update` are left untouched.
    async fn update_customer(&self, customer_id: i64, update: CustomerUpdate) -> Result<Customer, IntakeStoreError>;

    /// Inserts the order header and returns the written row.
    async fn insert_order(&self, order: NewOrder) -> Result<Order, IntakeStoreError>;

    /// Deletes the order with the given id. Returns `false` if no such order exists, which is not an error, so that
    /// the call can safely be repeated.
    async fn delete_order(&self, order_id: i64) -> Result<bool, IntakeStoreError>;

    /// Inserts all the order lines for `order_id` in one statement.
    async fn insert_order_items(
        &self,
        order_id: i64,
        items: &[NewOrderItem],
    ) -> Result<Vec<OrderItem>, IntakeStoreError>;

    /// Writes the order header and all its lines so that an order never exists without its items.
    ///
    /// The default implementation issues the header insert followed by the items insert. If the items insert fails,
    /// the header is deleted again before the error is returned. This is a compensating action rather than a
    /// transaction: a crash between the two inserts leaves an empty order behind. Backends that support multi-statement
    /// transactions should override this method and commit the header and items atomically.
    async fn insert_order_with_items(
        &self,
        order: NewOrder,
        items: Vec<NewOrderItem>,
    ) -> Result<(Order, Vec<OrderItem>), OrderWriteError> {
        let order = self.insert_order(order).await.map_err(OrderWriteError::OrderInsert)?;
        trace!("🗃️ Order {} written with id {}. Writing {} items", order.order_number, order.id, items.len());
        match self.insert_order_items(order.id, &items).await {
            Ok(items) => Ok((order, items)),
            Err(source) => {
                warn!("🗃️ Items for order {} could not be written. {source}. Removing the order header.", order.id);
                let rolled_back = match self.delete_order(order.id).await {
                    Ok(true) => {
                        info!("🗃️ Order {} ({}) was removed after its items failed to save", order.id, order.order_number);
                        true
                    },
                    Ok(false) => {
                        warn!("🗃️ Order {} was already gone when its removal was attempted", order.id);
                        true
                    },
                    Err(e) => {
                        error!(
                            "🗃️ Order {} ({}) has NO items and could not be removed. Manual clean-up is required. {e}",
                            order.id, order.order_number
                        );
                        false
                    },
                };
                Err(OrderWriteError::ItemsInsert { order_id: order.id, source, rolled_back })
            },
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum IntakeStoreError {
    #[error("We have an internal database engine (configuration/uptime etc.) : {0}")]
    DatabaseError(String),
    #[error("The requested customer (id {0}) does not exist")]
    CustomerNotFound(i64),
    #[error("The customer update for id {0} would result in a no-op.")]
    CustomerUpdateNoOp(i64),
    #[error("Order number {0} is already in use")]
    DuplicateOrderNumber(String),
}

impl From<sqlx::Error> for IntakeStoreError {
    fn from(e: sqlx::Error) -> Self {
        IntakeStoreError::DatabaseError(e.to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum OrderWriteError {
    #[error("Could not write the order header. {0}")]
    OrderInsert(IntakeStoreError),
    #[error("Could not write the items for order {order_id}. {source}")]
    ItemsInsert { order_id: i64, source: IntakeStoreError, rolled_back: bool },
}
