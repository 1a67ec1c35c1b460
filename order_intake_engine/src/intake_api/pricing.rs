//! Turns matched order lines into priced order items.
//!
//! Pricing is all-or-nothing. Every line is checked, and if even one of them cannot be matched to the menu, or matches
//! an item without a usable price, or comes to an amount too large to represent, the whole order is rejected with a
//! description of each failing line.
use log::*;

use super::{
    intake_objects::IntakeLine,
    menu_matcher::MenuCatalog,
};
use crate::db_types::{MenuItem, Money, NewOrderItem};

pub const DEFAULT_EXTRA_CHEESE_SURCHARGE: Money = Money::from_major(10);

/// Surcharges applied on top of a menu item's base price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingPolicy {
    pub extra_cheese_surcharge: Money,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self { extra_cheese_surcharge: DEFAULT_EXTRA_CHEESE_SURCHARGE }
    }
}

impl PricingPolicy {
    pub fn new(extra_cheese_surcharge: Money) -> Self {
        Self { extra_cheese_surcharge }
    }

    /// The surcharge for a single modifier. Unrecognised modifiers are free.
    pub fn surcharge_for(&self, modifier: &str) -> Money {
        if modifier.to_lowercase().contains("extra cheese") {
            self.extra_cheese_surcharge
        } else {
            Money::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedOrder {
    pub items: Vec<NewOrderItem>,
    pub total: Money,
}

impl PricedOrder {
    pub fn items_count(&self) -> usize {
        self.items.len()
    }
}

/// The name stored against an order item: the canonical menu name, followed by the modifiers as the customer gave them.
pub fn render_item_name(menu_item: &MenuItem, modifiers: &[String]) -> String {
    if modifiers.is_empty() {
        menu_item.name.clone()
    } else {
        format!("{} + {}", menu_item.name, modifiers.join(", "))
    }
}

/// Prices a single line against an already-matched menu item. Returns the failure description if the item has no
/// usable price or the line's subtotal overflows.
pub fn price_line(line: &IntakeLine, menu_item: &MenuItem, policy: &PricingPolicy) -> Result<NewOrderItem, String> {
    if !menu_item.is_priced() {
        error!(
            "💰️ Menu item #{} \"{}\" has an invalid price ({}). Refusing to sell \"{}\".",
            menu_item.id, menu_item.name, menu_item.price, line.name
        );
        return Err(format!("{} (invalid price: {})", line.name, menu_item.price.as_major_f64()));
    }
    let mut unit_price = menu_item.price;
    for modifier in &line.modifiers {
        let surcharge = policy.surcharge_for(modifier);
        if surcharge.is_positive() {
            debug!("💰️ \"{modifier}\" on {} adds {surcharge}", menu_item.name);
            unit_price = unit_price.checked_add(surcharge).ok_or_else(|| amount_too_large(line))?;
        }
    }
    let subtotal = unit_price.checked_mul(line.quantity).ok_or_else(|| amount_too_large(line))?;
    Ok(NewOrderItem {
        menu_item_id: menu_item.id,
        item_name: render_item_name(menu_item, &line.modifiers),
        quantity: line.quantity,
        unit_price,
        subtotal,
        special_instructions: line.special_instructions.clone(),
    })
}

fn amount_too_large(line: &IntakeLine) -> String {
    error!("💰️ {} x \"{}\" does not fit in a monetary amount. Refusing to price it.", line.quantity, line.name);
    format!("{} (amount too large: quantity {})", line.name, line.quantity)
}

/// Matches and prices every line of an order against the given menu snapshot.
///
/// On failure, the error holds one description per rejected line, in the order the lines were given: the requested
/// name for lines that did not match, `"<name> (invalid price: <price>)"` for lines that matched an unpriced item, and
/// `"<name> (amount too large: quantity <n>)"` for lines whose subtotal overflows. If every line prices but the sum
/// does not fit, the single failure is `"Order total (amount too large)"`.
pub fn price_order_lines(
    lines: &[IntakeLine],
    menu: &[MenuItem],
    policy: &PricingPolicy,
) -> Result<PricedOrder, Vec<String>> {
    let catalog = MenuCatalog::new(menu);
    if catalog.is_empty() {
        warn!("💰️ There are no available menu items. None of the {} lines can be matched.", lines.len());
    }
    let mut items = Vec::with_capacity(lines.len());
    let mut failures = Vec::new();
    for line in lines {
        let Some(found) = catalog.find(&line.name) else {
            failures.push(line.name.clone());
            continue;
        };
        match price_line(line, found.item, policy) {
            Ok(item) => {
                debug!(
                    "💰️ {} x {} @ {} = {} ({} match)",
                    item.quantity, item.item_name, item.unit_price, item.subtotal, found.tier
                );
                items.push(item);
            },
            Err(description) => failures.push(description),
        }
    }
    if !failures.is_empty() {
        warn!("💰️ Rejecting order. {} of {} lines failed: {}", failures.len(), lines.len(), failures.join("; "));
        return Err(failures);
    }
    let Some(total) = Money::checked_sum(items.iter().map(|i| i.subtotal)) else {
        error!("💰️ Rejecting order. The {} line subtotals do not add up to a representable total.", items.len());
        return Err(vec!["Order total (amount too large)".to_string()]);
    };
    info!("💰️ Priced {} lines. Order total: {total}", items.len());
    Ok(PricedOrder { items, total })
}
