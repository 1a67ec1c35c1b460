//! Request and response bodies for the webhook endpoints.
use intake_common::Money;
use log::*;
use order_intake_engine::OrderReceipt;
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

//--------------------------------------   Automation source   --------------------------------------------------------
/// An order as posted by the workflow-automation bot.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationOrderPayload {
    #[serde(default)]
    pub customer: AutomationCustomer,
    /// Anything other than a list is treated as "no items".
    #[serde(default, deserialize_with = "list_or_empty")]
    pub items: Vec<AutomationLine>,
    pub delivery_method: Option<String>,
    pub delivery_address: Option<String>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub allergy_info: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AutomationCustomer {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationLine {
    pub name: String,
    #[serde(default = "default_quantity", deserialize_with = "lenient_quantity")]
    pub quantity: i64,
    #[serde(default)]
    pub modifiers: Vec<String>,
    pub special_instructions: Option<String>,
}

//--------------------------------------   Voice agent source   -------------------------------------------------------
pub const END_OF_CALL_REPORT: &str = "end-of-call-report";

/// The envelope the voice agent posts for every call event.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VoiceAgentWebhook {
    #[serde(default)]
    pub message: Option<VoiceAgentMessage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VoiceAgentMessage {
    #[serde(rename = "type", default)]
    pub event_type: Option<String>,
    /// The structured data extracted from the call. Field names vary, so it is kept as a raw JSON object.
    #[serde(default)]
    pub analysis: Option<Value>,
    #[serde(default)]
    pub call: Option<VoiceAgentCall>,
    #[serde(default)]
    pub transcript: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VoiceAgentCall {
    pub id: Option<String>,
}

/// The parts of an end-of-call report that carry an order.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceCallReport {
    pub analysis: Map<String, Value>,
    pub call_id: Option<String>,
}

impl VoiceAgentWebhook {
    pub fn event_type(&self) -> Option<&str> {
        self.message.as_ref().and_then(|m| m.event_type.as_deref())
    }

    /// Extracts the call report. Returns `None` for any event other than an end-of-call report, and for reports
    /// that carry no analysis object.
    pub fn into_call_report(self) -> Option<VoiceCallReport> {
        let message = self.message?;
        if message.event_type.as_deref() != Some(END_OF_CALL_REPORT) {
            debug!("🎙️ Skipping voice agent event of type {:?}", message.event_type);
            return None;
        }
        let call_id = message.call.and_then(|c| c.id);
        match message.analysis {
            Some(Value::Object(analysis)) => Some(VoiceCallReport { analysis, call_id }),
            _ => {
                info!("🎙️ End-of-call report for call {call_id:?} has no analysis data");
                None
            },
        }
    }
}

//--------------------------------------      Responses         -------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderAccepted {
    pub success: bool,
    pub order_number: String,
    pub order_id: i64,
    pub total_amount: Money,
    pub items_count: usize,
}

impl From<OrderReceipt> for OrderAccepted {
    fn from(receipt: OrderReceipt) -> Self {
        Self {
            success: true,
            order_number: receipt.order_number,
            order_id: receipt.order_id,
            total_amount: receipt.total_amount,
            items_count: receipt.items_count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EventReceived {
    pub received: bool,
}

impl EventReceived {
    pub fn ack() -> Self {
        Self { received: true }
    }
}

//--------------------------------------   Lenient decoding     -------------------------------------------------------
pub fn default_quantity() -> i64 {
    1
}

/// Reads a quantity from a number or from the integer a string starts with, so `"2.5"` and `"2 pizzas"` are both 2.
/// Anything else (including `null`) is a quantity of one. Fractions are truncated and out-of-range values saturate,
/// which leaves the quantity check in validation to reject them.
pub fn quantity_from_value(value: &Value) -> i64 {
    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => leading_integer(s),
        _ => None,
    };
    parsed.unwrap_or_else(|| {
        if !value.is_null() {
            warn!("🎙️ Quantity {value} is not a number. Using 1.");
        }
        default_quantity()
    })
}

fn leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    // Only overflow can fail here, since the slice is all digits.
    let magnitude = rest[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

fn lenient_quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(quantity_from_value(&value))
}

fn list_or_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => {
            items.into_iter().map(|v| serde_json::from_value(v).map_err(serde::de::Error::custom)).collect()
        },
        other => {
            warn!("🤖️ Expected a list of items, but got {other}. Treating it as empty.");
            Ok(Vec::new())
        },
    }
}
