//! Converts the payloads of each order source into the engine's [`IntakeOrder`].
//!
//! Every source the server understands is a variant of [`SourcePayload`], and the conversion into an `IntakeOrder` is
//! total: it never fails. Anything that makes an order unacceptable (no phone number, no items, and so on) is left for
//! the engine's validator to report.
use log::*;
use order_intake_engine::{
    db_types::{DeliveryMethod, OrderSource},
    intake_api::persister::UNKNOWN_CUSTOMER_NAME,
    IntakeLine,
    IntakeOrder,
};
use serde_json::{Map, Value};

use crate::data_objects::{quantity_from_value, AutomationLine, AutomationOrderPayload, VoiceCallReport};

#[derive(Debug, Clone)]
pub enum SourcePayload {
    Automation(AutomationOrderPayload),
    VoiceAgent(VoiceCallReport),
}

impl From<SourcePayload> for IntakeOrder {
    fn from(payload: SourcePayload) -> Self {
        match payload {
            SourcePayload::Automation(p) => automation_order(p),
            SourcePayload::VoiceAgent(r) => voice_agent_order(r),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

//--------------------------------------   Automation source   --------------------------------------------------------
fn automation_order(payload: AutomationOrderPayload) -> IntakeOrder {
    let customer = payload.customer;
    IntakeOrder {
        customer_name: non_empty(customer.name),
        phone: customer.phone.unwrap_or_default().trim().to_string(),
        email: non_empty(customer.email),
        customer_address: non_empty(customer.address),
        delivery_method: DeliveryMethod::from_loose(payload.delivery_method.as_deref()),
        delivery_address: non_empty(payload.delivery_address),
        payment_method: non_empty(payload.payment_method),
        lines: payload.items.into_iter().map(automation_line).collect(),
        notes: non_empty(payload.notes),
        allergy_info: non_empty(payload.allergy_info),
        source: OrderSource::N8n,
        call_id: None,
    }
}

fn automation_line(line: AutomationLine) -> IntakeLine {
    IntakeLine {
        name: line.name,
        quantity: line.quantity,
        modifiers: line.modifiers,
        special_instructions: non_empty(line.special_instructions),
    }
}

//--------------------------------------   Voice agent source   -------------------------------------------------------
/// Returns the first of `keys` that holds a non-empty value. Numbers are accepted and rendered as text, since phone
/// numbers are sometimes transcribed as numbers.
pub fn first_text(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().filter_map(|k| map.get(*k)).find_map(|v| match v {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn first_list<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> &'a [Value] {
    keys.iter().filter_map(|k| map.get(*k)).find_map(Value::as_array).map(Vec::as_slice).unwrap_or_default()
}

fn voice_agent_order(report: VoiceCallReport) -> IntakeOrder {
    let analysis = &report.analysis;
    let lines = first_list(analysis, &["items", "order_items"]).iter().filter_map(voice_agent_line).collect::<Vec<_>>();
    let order = IntakeOrder {
        customer_name: Some(
            first_text(analysis, &["customerName", "customer_name"]).unwrap_or_else(|| UNKNOWN_CUSTOMER_NAME.into()),
        ),
        phone: first_text(analysis, &["customerPhone", "phone", "customer_phone"]).unwrap_or_default(),
        email: first_text(analysis, &["customerEmail", "email"]),
        customer_address: None,
        delivery_method: DeliveryMethod::from_loose(
            first_text(analysis, &["deliveryMethod", "delivery_method"]).as_deref(),
        ),
        delivery_address: first_text(analysis, &["deliveryAddress", "address", "delivery_address"]),
        payment_method: first_text(analysis, &["paymentMethod", "payment_method"]),
        lines,
        notes: first_text(analysis, &["notes"]),
        allergy_info: first_text(analysis, &["allergyInfo", "allergy_info"]),
        source: OrderSource::Vapi,
        call_id: report.call_id.and_then(|id| non_empty(Some(id))),
    };
    debug!(
        "🎙️ Call {:?}: {} ({}), {} via {}, {} lines",
        order.call_id,
        order.customer_name.as_deref().unwrap_or_default(),
        order.phone,
        order.delivery_method,
        order.source,
        order.lines.len()
    );
    order
}

/// Lines without a usable name are dropped.
fn voice_agent_line(value: &Value) -> Option<IntakeLine> {
    let Some(item) = value.as_object() else {
        warn!("🎙️ Ignoring order line that is not an object: {value}");
        return None;
    };
    let Some(name) = first_text(item, &["name", "item", "itemName"]) else {
        warn!("🎙️ Ignoring order line without a name: {value}");
        return None;
    };
    let quantity = ["quantity", "qty"].iter().find_map(|k| item.get(*k)).map(quantity_from_value).unwrap_or(1);
    let modifiers = item
        .get("modifiers")
        .and_then(Value::as_array)
        .map(|mods| mods.iter().filter_map(Value::as_str).map(String::from).collect())
        .unwrap_or_default();
    Some(IntakeLine {
        name,
        quantity,
        modifiers,
        special_instructions: first_text(item, &["specialInstructions", "notes"]),
    })
}
