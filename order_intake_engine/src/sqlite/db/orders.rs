use log::{debug, trace};
use sqlx::{QueryBuilder, SqliteConnection};

use crate::db_types::{NewOrder, NewOrderItem, Order, OrderItem};

/// Inserts a new order header using the given connection. This is not atomic. Embed the call in a transaction, and
/// pass `&mut tx` as the connection argument, if the header must be written together with its items.
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, sqlx::Error> {
    let order: Order = sqlx::query_as(
        r#"
            INSERT INTO orders (
                order_number,
                customer_id,
                delivery_method,
                delivery_address,
                payment_method,
                total_amount,
                notes,
                allergy_info,
                external_source,
                call_id,
                order_status,
                payment_status
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *;
        "#,
    )
    .bind(order.order_number)
    .bind(order.customer_id)
    .bind(order.delivery_method)
    .bind(order.delivery_address)
    .bind(order.payment_method)
    .bind(order.total_amount)
    .bind(order.notes)
    .bind(order.allergy_info)
    .bind(order.external_source)
    .bind(order.call_id)
    .bind(order.order_status)
    .bind(order.payment_status)
    .fetch_one(conn)
    .await?;
    debug!("📝️ Order [{}] inserted with id {}", order.order_number, order.id);
    Ok(order)
}

/// Inserts all the lines for an order in a single statement.
pub async fn insert_order_items(
    order_id: i64,
    items: &[NewOrderItem],
    conn: &mut SqliteConnection,
) -> Result<Vec<OrderItem>, sqlx::Error> {
    if items.is_empty() {
        return Ok(Vec::new());
    }
    let mut builder = QueryBuilder::new(
        "INSERT INTO order_items (order_id, menu_item_id, item_name, quantity, unit_price, subtotal, \
         special_instructions) ",
    );
    builder.push_values(items, |mut row, item| {
        row.push_bind(order_id)
            .push_bind(item.menu_item_id)
            .push_bind(item.item_name.clone())
            .push_bind(item.quantity)
            .push_bind(item.unit_price)
            .push_bind(item.subtotal)
            .push_bind(item.special_instructions.clone());
    });
    builder.push(" RETURNING *");
    trace!("📝️ Executing query: {}", builder.sql());
    let written = builder.build_query_as::<OrderItem>().fetch_all(conn).await?;
    debug!("📝️ {} items written for order #{order_id}", written.len());
    Ok(written)
}

/// Deletes the order (and, through the cascade, its items). Returns `false` if there was nothing to delete.
pub async fn delete_order(order_id: i64, conn: &mut SqliteConnection) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM orders WHERE id = $1").bind(order_id).execute(conn).await?;
    Ok(result.rows_affected() > 0)
}

pub async fn fetch_order_by_number(order_number: &str, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let order =
        sqlx::query_as("SELECT * FROM orders WHERE order_number = $1").bind(order_number).fetch_optional(conn).await?;
    Ok(order)
}

pub async fn fetch_order_items(order_id: i64, conn: &mut SqliteConnection) -> Result<Vec<OrderItem>, sqlx::Error> {
    let items =
        sqlx::query_as("SELECT * FROM order_items WHERE order_id = $1 ORDER BY id").bind(order_id).fetch_all(conn).await?;
    Ok(items)
}

pub async fn count_orders(conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders").fetch_one(conn).await?;
    Ok(count)
}
