use std::fmt::Debug;

use log::*;

use super::{
    errors::{IntakeError, PersistenceStage},
    intake_objects::{IntakeOrder, OrderReceipt},
    persister::{build_new_order, resolve_customer, write_order},
    pricing::{price_order_lines, PricingPolicy},
    validator::validate_order,
};
use crate::traits::OrderIntakeDatabase;

/// `OrderIntakeApi` is the entry point of the order intake pipeline. Every intake adapter hands its orders to
/// [`Self::process_order`], regardless of where they came from.
pub struct OrderIntakeApi<B> {
    db: B,
    policy: PricingPolicy,
}

impl<B> Debug for OrderIntakeApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderIntakeApi ({:?})", self.policy)
    }
}

impl<B> OrderIntakeApi<B> {
    pub fn new(db: B, policy: PricingPolicy) -> Self {
        Self { db, policy }
    }
}

impl<B> OrderIntakeApi<B>
where B: OrderIntakeDatabase
{
    /// Runs an order through the full pipeline and, if it is accepted, writes it to the data store.
    ///
    /// The stages run strictly in sequence:
    /// 1. Structural validation. Nothing is read from or written to the store if this fails.
    /// 2. A fresh snapshot of the available menu items is fetched.
    /// 3. Every line is matched to the menu and priced. If any line fails, the order is rejected with the full list of
    ///    failing lines, and nothing is written.
    /// 4. The customer is looked up by phone number, and updated or created as needed.
    /// 5. The order header and all its lines are written together.
    pub async fn process_order(&self, order: IntakeOrder) -> Result<OrderReceipt, IntakeError> {
        info!("🔄️📦️ New {} order for {} with {} lines", order.source, order.phone, order.lines.len());
        let validated = validate_order(order)?;
        let menu = self
            .db
            .fetch_available_menu_items()
            .await
            .map_err(IntakeError::persistence(PersistenceStage::MenuFetch))?;
        debug!("🔄️📦️ Menu snapshot has {} available items", menu.len());
        let priced = price_order_lines(&validated.order.lines, &menu, &self.policy).map_err(IntakeError::RejectedItems)?;
        let customer = resolve_customer(&self.db, &validated.order, validated.delivery_address.as_deref()).await?;
        let new_order = build_new_order(&validated.order, customer.id, validated.delivery_address, &priced);
        let receipt = write_order(&self.db, new_order, priced).await?;
        info!(
            "🔄️📦️ Order {} accepted for customer #{}. {} items, total {}",
            receipt.order_number, customer.id, receipt.items_count, receipt.total_amount
        );
        Ok(receipt)
    }
}
