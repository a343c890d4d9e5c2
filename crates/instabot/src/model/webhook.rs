//! Webhook envelope decoding.
//!
//! ```text
//! { "object": "instagram",
//!   "entry": [ { "id", "time", "messaging": [ <event>, … ] }, … ] }
//! ```
//!
//! Older API versions deliver the events of an entry under `message`
//! instead of `messaging`. The legacy array is used only when `messaging`
//! is absent or empty.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use instabot_core::{DecodeError, DecodeResult};

use crate::model::event::{MessagingEvent, nullable};

/// One notification batch for one business account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawEntry")]
pub struct Entry {
    /// Business account id.
    pub id: String,
    /// Batch time, epoch milliseconds.
    pub time: i64,
    pub messaging: Vec<MessagingEvent>,
}

#[derive(Deserialize)]
struct RawEntry {
    id: String,
    time: i64,
    #[serde(default, deserialize_with = "nullable")]
    messaging: Vec<MessagingEvent>,
    #[serde(default, deserialize_with = "nullable")]
    message: Vec<MessagingEvent>,
}

impl From<RawEntry> for Entry {
    fn from(raw: RawEntry) -> Self {
        let messaging = if raw.messaging.is_empty() && !raw.message.is_empty() {
            warn!(entry = %raw.id, "Webhook entry uses legacy `message` array");
            raw.message
        } else {
            raw.messaging
        };

        Self {
            id: raw.id,
            time: raw.time,
            messaging,
        }
    }
}

/// A decoded webhook payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// Platform tag, `instagram` for Instagram webhooks.
    pub object: String,
    #[serde(rename = "entry", deserialize_with = "nullable")]
    pub entries: Vec<Entry>,
}

impl WebhookEvent {
    pub fn from_slice(payload: &[u8]) -> DecodeResult<Self> {
        decode(payload)
    }

    /// Every messaging event in payload order, across all entries.
    pub fn events(&self) -> impl Iterator<Item = &MessagingEvent> {
        self.entries.iter().flat_map(|entry| entry.messaging.iter())
    }

    pub fn into_events(self) -> impl Iterator<Item = MessagingEvent> {
        self.entries.into_iter().flat_map(|entry| entry.messaging)
    }
}

impl FromStr for WebhookEvent {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s.as_bytes())
    }
}

/// Decodes and classifies a raw webhook payload.
///
/// All-or-nothing: any syntax or structure error fails the whole payload.
/// Events that match no known shape are kept with
/// [`EventKind::Unknown`](crate::EventKind::Unknown).
pub fn decode(payload: &[u8]) -> DecodeResult<WebhookEvent> {
    let webhook: WebhookEvent = serde_json::from_slice(payload).map_err(|e| {
        debug!(error = %e, "Failed to decode webhook payload");
        DecodeError::from(e)
    })?;

    debug!(
        object = %webhook.object,
        entries = webhook.entries.len(),
        events = webhook.events().count(),
        "Decoded webhook payload"
    );
    for event in webhook.events() {
        debug!(kind = %event.kind(), sender = %event.sender.id, "Classified messaging event");
    }

    Ok(webhook)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EventKind;

    const TEXT: &str = r#"{"object":"instagram","entry":[{"id":"A","time":1,"messaging":[
        {"sender":{"id":"S"},"recipient":{"id":"R"},"timestamp":2,"message":{"mid":"M1","text":"hi"}}
    ]}]}"#;

    #[test]
    fn test_decode_text() {
        let webhook = decode(TEXT.as_bytes()).unwrap();
        assert_eq!(webhook.object, "instagram");
        assert_eq!(webhook.entries.len(), 1);
        assert_eq!(webhook.entries[0].id, "A");
        assert_eq!(webhook.entries[0].time, 1);
        assert_eq!(webhook.entries[0].messaging.len(), 1);
        assert_eq!(webhook.entries[0].messaging[0].kind(), EventKind::TextMessage);
    }

    #[test]
    fn test_entry_points_agree() {
        let a = decode(TEXT.as_bytes()).unwrap();
        let b = WebhookEvent::from_slice(TEXT.as_bytes()).unwrap();
        let c: WebhookEvent = TEXT.parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn test_legacy_alias() {
        let legacy = TEXT.replace("\"messaging\"", "\"message\"");
        assert_eq!(decode(legacy.as_bytes()).unwrap(), decode(TEXT.as_bytes()).unwrap());

        let both_empty = r#"{"object":"instagram","entry":[{"id":"A","time":1,"messaging":[],"message":[]}]}"#;
        assert!(decode(both_empty.as_bytes()).unwrap().entries[0].messaging.is_empty());
    }

    #[test]
    fn test_primary_wins_when_both_present() {
        let payload = r#"{"object":"instagram","entry":[{"id":"A","time":1,
            "messaging":[{"sender":{"id":"P"},"recipient":{"id":"R"},"timestamp":2}],
            "message":[{"sender":{"id":"L"},"recipient":{"id":"R"},"timestamp":2}]}]}"#;
        let webhook = decode(payload.as_bytes()).unwrap();
        let senders: Vec<_> = webhook.events().map(|e| e.sender.id.as_str()).collect();
        assert_eq!(senders, ["P"]);
    }

    #[test]
    fn test_order_preserved() {
        let payload = r#"{"object":"instagram","entry":[
            {"id":"A","time":1,"messaging":[
                {"sender":{"id":"1"},"recipient":{"id":"R"},"timestamp":2},
                {"sender":{"id":"2"},"recipient":{"id":"R"},"timestamp":2}]},
            {"id":"B","time":1,"messaging":[
                {"sender":{"id":"3"},"recipient":{"id":"R"},"timestamp":2}]}]}"#;
        let webhook = decode(payload.as_bytes()).unwrap();
        let ids: Vec<_> = webhook.events().map(|e| e.sender.id.clone()).collect();
        assert_eq!(ids, ["1", "2", "3"]);
        assert_eq!(webhook.into_events().count(), 3);
    }

    #[test]
    fn test_null_arrays() {
        let payload = r#"{"object":"instagram","entry":[{"id":"A","time":1,"messaging":null}]}"#;
        assert!(decode(payload.as_bytes()).unwrap().entries[0].messaging.is_empty());

        let payload = r#"{"object":"instagram","entry":null}"#;
        assert!(decode(payload.as_bytes()).unwrap().entries.is_empty());
    }

    #[test]
    fn test_decode_errors() {
        let err = decode(b"{\"object\":").unwrap_err();
        assert!(err.is_syntax());

        let err = decode(br#"{"object":"instagram"}"#).unwrap_err();
        assert!(!err.is_syntax());

        let err = decode(br#"{"object":"instagram","entry":[{"id":"A","messaging":[]}]}"#).unwrap_err();
        assert!(err.to_string().contains("time"));

        // One bad event fails the whole payload.
        let err = decode(
            br#"{"object":"instagram","entry":[{"id":"A","time":1,"messaging":[
                {"sender":{"id":"S"},"recipient":{"id":"R"},"timestamp":2},
                {"sender":{"id":"S"},"timestamp":2}]}]}"#,
        )
        .unwrap_err();
        assert!(!err.is_syntax());
    }
}
