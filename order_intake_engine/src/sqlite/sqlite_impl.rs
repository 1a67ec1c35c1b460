//! `SqliteDatabase` is a concrete implementation of an order intake backend.
//!
//! It uses SQLite as the backend and implements [`OrderIntakeDatabase`]. Unlike the default implementation, order
//! headers and their items are written inside a single transaction.
use std::fmt::Debug;

use log::*;
use sqlx::{migrate::Migrator, SqlitePool};

use super::db::{customers, menu, new_pool, orders};
use crate::{
    db_types::{Customer, CustomerUpdate, MenuItem, NewCustomer, NewOrder, NewOrderItem, Order, OrderItem},
    traits::{IntakeStoreError, OrderIntakeDatabase, OrderWriteError},
};

static MIGRATOR: Migrator = sqlx::migrate!("./src/sqlite/migrations");

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Brings the schema up to date with the migrations embedded in this crate.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        MIGRATOR.run(&self.pool).await?;
        info!("🗃️ Database migrations complete for {}", self.url);
        Ok(())
    }
}

impl OrderIntakeDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn fetch_available_menu_items(&self) -> Result<Vec<MenuItem>, IntakeStoreError> {
        let mut conn = self.pool.acquire().await?;
        let items = menu::fetch_available_menu_items(&mut conn).await?;
        Ok(items)
    }

    async fn fetch_customer_by_phone(&self, phone: &str) -> Result<Option<Customer>, IntakeStoreError> {
        let mut conn = self.pool.acquire().await?;
        let customer = customers::fetch_customer_by_phone(phone, &mut conn).await?;
        Ok(customer)
    }

    async fn insert_customer(&self, customer: NewCustomer) -> Result<Customer, IntakeStoreError> {
        let mut conn = self.pool.acquire().await?;
        let customer = customers::insert_customer(customer, &mut conn).await?;
        Ok(customer)
    }

    async fn update_customer(&self, customer_id: i64, update: CustomerUpdate) -> Result<Customer, IntakeStoreError> {
        let mut conn = self.pool.acquire().await?;
        customers::update_customer(customer_id, update, &mut conn).await
    }

    async fn insert_order(&self, order: NewOrder) -> Result<Order, IntakeStoreError> {
        let mut conn = self.pool.acquire().await?;
        let order_number = order.order_number.clone();
        orders::insert_order(order, &mut conn).await.map_err(|e| order_insert_error(&order_number, e))
    }

    async fn delete_order(&self, order_id: i64) -> Result<bool, IntakeStoreError> {
        let mut conn = self.pool.acquire().await?;
        let deleted = orders::delete_order(order_id, &mut conn).await?;
        Ok(deleted)
    }

    async fn insert_order_items(
        &self,
        order_id: i64,
        items: &[NewOrderItem],
    ) -> Result<Vec<OrderItem>, IntakeStoreError> {
        let mut conn = self.pool.acquire().await?;
        let items = orders::insert_order_items(order_id, items, &mut conn).await?;
        Ok(items)
    }

    /// Writes the header and the items in one transaction. If anything fails, the transaction is dropped without being
    /// committed, and SQLite rolls the whole write back.
    async fn insert_order_with_items(
        &self,
        order: NewOrder,
        items: Vec<NewOrderItem>,
    ) -> Result<(Order, Vec<OrderItem>), OrderWriteError> {
        let mut tx = self.pool.begin().await.map_err(|e| OrderWriteError::OrderInsert(e.into()))?;
        let order_number = order.order_number.clone();
        let order = orders::insert_order(order, &mut tx)
            .await
            .map_err(|e| OrderWriteError::OrderInsert(order_insert_error(&order_number, e)))?;
        let order_id = order.id;
        let written = match orders::insert_order_items(order_id, &items, &mut tx).await {
            Ok(written) => written,
            Err(e) => {
                warn!("🗃️ Items for order {} could not be written. Rolling back. {e}", order.order_number);
                return Err(OrderWriteError::ItemsInsert { order_id, source: e.into(), rolled_back: true });
            },
        };
        tx.commit()
            .await
            .map_err(|e| OrderWriteError::ItemsInsert { order_id, source: e.into(), rolled_back: true })?;
        debug!("🗃️ Order {} committed with {} items", order.order_number, written.len());
        Ok((order, written))
    }
}

/// Order numbers carry a unique index, so a unique violation on the header insert means the number is already taken.
fn order_insert_error(order_number: &str, e: sqlx::Error) -> IntakeStoreError {
    match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            IntakeStoreError::DuplicateOrderNumber(order_number.to_string())
        },
        _ => e.into(),
    }
}
