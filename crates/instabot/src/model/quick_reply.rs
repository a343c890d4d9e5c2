//! Quick replies offered under a text message.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickReplyType {
    #[default]
    Text,
}

/// A quick reply button. Only text quick replies exist on Instagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickReply {
    pub content_type: QuickReplyType,
    pub title: String,
    pub payload: String,
}

impl QuickReply {
    pub fn text(title: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            content_type: QuickReplyType::Text,
            title: title.into(),
            payload: payload.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quick_reply_serialize() {
        let q = QuickReply::text("Red", "DEVELOPER_DEFINED_PAYLOAD_FOR_RED");
        assert_eq!(
            serde_json::to_string(&q).unwrap(),
            r#"{"content_type":"text","title":"Red","payload":"DEVELOPER_DEFINED_PAYLOAD_FOR_RED"}"#
        );
    }
}
