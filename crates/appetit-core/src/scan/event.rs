//! Typed events decoded from the analysis push stream.
//!
//! Each pushed message is one UTF-8 JSON object carrying a discriminant:
//! a `status` marker (`"start"`/`"stop"`), a `summary` text, or a
//! `menu_item` with its `servings` estimate. The wire format is owned by
//! the server and may grow fields, so anything unrecognized decodes to an
//! error the state machine logs and drops instead of failing the session.

use super::model::DetectedItem;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// One decoded message from the analysis stream.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanEvent {
    /// Server-side scanning has begun.
    Start,
    /// Server-side scanning has ended; trailing events may still follow.
    Stop,
    /// Free-text meal summary (possibly partial, possibly repeated).
    Summary(String),
    /// One detected dish.
    Item(DetectedItem),
}

/// Why a raw message could not be turned into a [`ScanEvent`].
///
/// Both variants are recoverable: the session drops the message and keeps
/// consuming the stream.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Not a parseable JSON object.
    #[error("malformed event payload: {0}")]
    Malformed(#[from] serde_json::Error),
    /// Valid JSON, but matching none of the recognized shapes.
    #[error("unrecognized event shape: {0}")]
    Unrecognized(String),
}

#[derive(Deserialize)]
struct WireMessage {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    menu_item: Option<WireMenuItem>,
    #[serde(default)]
    servings: Option<Value>,
}

/// The server sends the full menu item model; only the name matters here.
#[derive(Deserialize)]
struct WireMenuItem {
    name: String,
}

impl ScanEvent {
    /// Decodes one raw pushed message.
    ///
    /// Shapes are checked in a fixed order: `status`, then `summary`, then
    /// `menu_item`. A message matching none of them yields
    /// [`DecodeError::Unrecognized`].
    pub fn decode(raw: &str) -> Result<ScanEvent, DecodeError> {
        let message: WireMessage = serde_json::from_str(raw)?;

        if let Some(status) = message.status.as_deref() {
            return match status {
                "start" => Ok(ScanEvent::Start),
                "stop" => Ok(ScanEvent::Stop),
                other => Err(DecodeError::Unrecognized(format!("status={}", other))),
            };
        }

        if let Some(summary) = message.summary {
            return Ok(ScanEvent::Summary(summary));
        }

        if let Some(item) = message.menu_item {
            let serving = message.servings.map(format_servings).unwrap_or_default();
            return Ok(ScanEvent::Item(DetectedItem::new(item.name, serving)));
        }

        Err(DecodeError::Unrecognized(snippet(raw)))
    }
}

/// The backend has emitted both bare numbers and free text for `servings`;
/// normalize to a display string either way.
fn format_servings(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn snippet(raw: &str) -> String {
    const MAX: usize = 120;
    if raw.len() <= MAX {
        raw.to_string()
    } else {
        let mut end = MAX;
        while !raw.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &raw[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_start_stop() {
        assert_eq!(
            ScanEvent::decode(r#"{"status": "start"}"#).unwrap(),
            ScanEvent::Start
        );
        assert_eq!(
            ScanEvent::decode(r#"{"status": "stop"}"#).unwrap(),
            ScanEvent::Stop
        );
    }

    #[test]
    fn test_decode_summary() {
        let event = ScanEvent::decode(r#"{"summary": "A balanced breakfast"}"#).unwrap();
        assert_eq!(event, ScanEvent::Summary("A balanced breakfast".into()));
    }

    #[test]
    fn test_decode_item_with_text_servings() {
        let raw = r#"{"menu_item": {"name": "Blueberry pancakes"}, "servings": "1 cup"}"#;
        let event = ScanEvent::decode(raw).unwrap();
        assert_eq!(
            event,
            ScanEvent::Item(DetectedItem::new("Blueberry pancakes", "1 cup"))
        );
    }

    #[test]
    fn test_decode_item_with_numeric_servings() {
        let raw = r#"{"menu_item": {"name": "Clam Chowder"}, "servings": 2}"#;
        let event = ScanEvent::decode(raw).unwrap();
        assert_eq!(event, ScanEvent::Item(DetectedItem::new("Clam Chowder", "2")));
    }

    #[test]
    fn test_decode_item_ignores_extra_menu_item_fields() {
        let raw = r#"{"menu_item": {"name": "Sausage Pizza", "hash": "ab12", "ingredients": "flour"}, "servings": 1}"#;
        let event = ScanEvent::decode(raw).unwrap();
        assert_eq!(event, ScanEvent::Item(DetectedItem::new("Sausage Pizza", "1")));
    }

    #[test]
    fn test_unknown_status_is_unrecognized() {
        let err = ScanEvent::decode(r#"{"status": "paused"}"#).unwrap_err();
        assert!(matches!(err, DecodeError::Unrecognized(_)));
    }

    #[test]
    fn test_unknown_shape_is_unrecognized() {
        let err = ScanEvent::decode(r#"{"heartbeat": true}"#).unwrap_err();
        assert!(matches!(err, DecodeError::Unrecognized(_)));
    }

    #[test]
    fn test_malformed_json() {
        let err = ScanEvent::decode("not json").unwrap_err();
        assert!(matches!(err, DecodeError::Malformed(_)));
    }

    #[test]
    fn test_status_takes_priority_over_other_fields() {
        // If the server ever bundles fields, the status marker wins.
        let raw = r#"{"status": "start", "summary": "ignored"}"#;
        assert_eq!(ScanEvent::decode(raw).unwrap(), ScanEvent::Start);
    }
}
