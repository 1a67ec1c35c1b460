use log::trace;
use sqlx::SqliteConnection;

use crate::db_types::{MenuItem, Money};

/// Fetches all available menu items in a stable order (by id), so that matching is deterministic.
pub async fn fetch_available_menu_items(conn: &mut SqliteConnection) -> Result<Vec<MenuItem>, sqlx::Error> {
    let items: Vec<MenuItem> =
        sqlx::query_as("SELECT * FROM menu_items WHERE available = 1 ORDER BY id").fetch_all(conn).await?;
    trace!("🗃️ Fetched {} available menu items", items.len());
    Ok(items)
}

pub async fn insert_menu_item(
    name: &str,
    price: Money,
    available: bool,
    conn: &mut SqliteConnection,
) -> Result<MenuItem, sqlx::Error> {
    let item = sqlx::query_as("INSERT INTO menu_items (name, price, available) VALUES ($1, $2, $3) RETURNING *")
        .bind(name)
        .bind(price)
        .bind(available)
        .fetch_one(conn)
        .await?;
    Ok(item)
}
