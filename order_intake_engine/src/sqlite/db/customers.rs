use log::{debug, trace};
use sqlx::{sqlite::SqliteRow, FromRow, QueryBuilder, SqliteConnection};

use crate::{
    db_types::{Customer, CustomerUpdate, NewCustomer},
    traits::IntakeStoreError,
};

/// Returns the oldest customer with the given phone number.
pub async fn fetch_customer_by_phone(phone: &str, conn: &mut SqliteConnection) -> Result<Option<Customer>, sqlx::Error> {
    let customer = sqlx::query_as("SELECT * FROM customers WHERE phone = $1 ORDER BY id LIMIT 1")
        .bind(phone)
        .fetch_optional(conn)
        .await?;
    Ok(customer)
}

pub async fn insert_customer(customer: NewCustomer, conn: &mut SqliteConnection) -> Result<Customer, sqlx::Error> {
    let customer: Customer =
        sqlx::query_as("INSERT INTO customers (name, phone, email, address) VALUES ($1, $2, $3, $4) RETURNING *")
            .bind(customer.name)
            .bind(customer.phone)
            .bind(customer.email)
            .bind(customer.address)
            .fetch_one(conn)
            .await?;
    debug!("🗃️ Customer #{} inserted for {}", customer.id, customer.phone);
    Ok(customer)
}

pub async fn update_customer(
    id: i64,
    update: CustomerUpdate,
    conn: &mut SqliteConnection,
) -> Result<Customer, IntakeStoreError> {
    if update.is_empty() {
        debug!("🗃️ No fields to update for customer #{id}. Update request skipped.");
        return Err(IntakeStoreError::CustomerUpdateNoOp(id));
    }
    let mut builder = QueryBuilder::new("UPDATE customers SET updated_at = CURRENT_TIMESTAMP, ");
    let mut set_clause = builder.separated(", ");
    if let Some(name) = update.name {
        set_clause.push("name = ");
        set_clause.push_bind_unseparated(name);
    }
    if let Some(address) = update.address {
        set_clause.push("address = ");
        set_clause.push_bind_unseparated(address);
    }
    builder.push(" WHERE id = ");
    builder.push_bind(id);
    builder.push(" RETURNING *");
    trace!("🗃️ Executing query: {}", builder.sql());
    let customer =
        builder.build().fetch_optional(conn).await?.map(|row: SqliteRow| Customer::from_row(&row)).transpose()?;
    customer.ok_or(IntakeStoreError::CustomerNotFound(id))
}
