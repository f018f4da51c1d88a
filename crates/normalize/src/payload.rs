//! Embedded JSON payloads and the shapes we recognize in them.
//!
//! Transport records carry a JSON blob whose meaning depends on which fields
//! are present. Instead of an if/else ladder, each `WxLink` shape is a
//! [`ShapeMatcher`] and [`LINK_SHAPES`] lists them in priority order. The
//! first matcher returning `Some` wins, so the payment-link rule is
//! guaranteed to run before the general link-share rule.
//!
//! Field access follows one rule throughout: a JSON `null` counts as absent,
//! strings are used as-is, and any other scalar or structure is rendered as
//! its JSON text.
use serde_json::{Map, Value};

use crate::error::PayloadError;

/// Marker in a link title that identifies a merchant payment request.
pub const PAYMENT_TITLE_MARKER: &str = "向商家付款";

/// Marker in a call notice that means `content` already states the length.
pub const CALL_LENGTH_MARKER: &str = "通话时长";

/// Typed view of an embedded payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubPayload {
    MiniProgram { content_xml: Option<String> },
    Merged { url: String },
    PaymentLink { title: String },
    LinkShare { title: String, desc: Option<String> },
    ContentSharing { text: Option<String> },
    VoiceText { text: Option<String> },
    Voip { content: Option<String>, duration: Option<u64> },
    Unrecognized,
}

/// One candidate shape: `Some` when the object has that shape.
pub type ShapeMatcher = fn(&Map<String, Value>) -> Option<SubPayload>;

/// `WxLink` shapes, highest priority first.
pub const LINK_SHAPES: [(&str, ShapeMatcher); 5] = [
    ("miniprogram", match_mini_program),
    ("merged", match_merged),
    ("payment_link", match_payment_link),
    ("link_share", match_link_share),
    ("content_sharing", match_content_sharing),
];

/// Parses `raw` and insists on a JSON object.
pub fn parse_object(raw: &str) -> Result<Map<String, Value>, PayloadError> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(PayloadError::NotAnObject(json_kind(&other))),
        Err(err) => Err(PayloadError::InvalidJson(err.to_string())),
    }
}

/// Runs [`LINK_SHAPES`] in order.
pub fn match_link_payload(obj: &Map<String, Value>) -> SubPayload {
    LINK_SHAPES
        .iter()
        .find_map(|(_, matcher)| matcher(obj))
        .unwrap_or(SubPayload::Unrecognized)
}

/// Voice clips only ever carry an optional transcript.
pub fn match_voice_payload(obj: &Map<String, Value>) -> SubPayload {
    SubPayload::VoiceText {
        text: text_field(obj, "text"),
    }
}

pub fn match_voip_payload(obj: &Map<String, Value>) -> SubPayload {
    SubPayload::Voip {
        content: text_field(obj, "content"),
        duration: obj.get("duration").and_then(seconds_value),
    }
}

/// Collects every `datadesc` string from a merged chat-history body.
///
/// Items without a string `datadesc` are skipped; an empty result is not an
/// error here, the caller decides what an empty history means.
pub fn parse_history(raw: &str) -> Result<Vec<String>, PayloadError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|err| PayloadError::InvalidJson(err.to_string()))?;
    let Value::Array(items) = value else {
        return Err(PayloadError::NotAnArray(json_kind(&value)));
    };

    Ok(items
        .iter()
        .filter_map(|item| item.get("datadesc").and_then(Value::as_str))
        .map(str::to_string)
        .collect())
}

fn match_mini_program(obj: &Map<String, Value>) -> Option<SubPayload> {
    (obj.contains_key("contentXml") && type_is(obj, "miniprogram")).then(|| {
        SubPayload::MiniProgram {
            content_xml: text_field(obj, "contentXml"),
        }
    })
}

fn match_merged(obj: &Map<String, Value>) -> Option<SubPayload> {
    (obj.contains_key("content") && type_is(obj, "merged")).then(|| SubPayload::Merged {
        url: text_field(obj, "content").unwrap_or_default(),
    })
}

fn match_payment_link(obj: &Map<String, Value>) -> Option<SubPayload> {
    if !type_is(obj, "link") {
        return None;
    }
    let title = text_field(obj, "title")?;
    title
        .contains(PAYMENT_TITLE_MARKER)
        .then_some(SubPayload::PaymentLink { title })
}

fn match_link_share(obj: &Map<String, Value>) -> Option<SubPayload> {
    if !type_is(obj, "link") {
        return None;
    }
    let title = text_field(obj, "title")?;
    let desc = text_field(obj, "desc").filter(|d| !d.is_empty());
    Some(SubPayload::LinkShare { title, desc })
}

fn match_content_sharing(obj: &Map<String, Value>) -> Option<SubPayload> {
    type_is(obj, "content_sharing").then(|| SubPayload::ContentSharing {
        text: ["content", "text", "description"]
            .into_iter()
            .find_map(|key| text_field(obj, key)),
    })
}

fn type_is(obj: &Map<String, Value>, expected: &str) -> bool {
    obj.get("type").and_then(Value::as_str) == Some(expected)
}

fn text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Whole, non-negative seconds from a number or numeric string.
fn seconds_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
