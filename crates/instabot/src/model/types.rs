//! Common Instagram messaging types.
//!
//! Identities shared by inbound webhook events and outbound API requests.

use serde::{Deserialize, Serialize};

/// The Instagram-scoped user (IGSID) that triggered a webhook event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sender {
    #[serde(default)]
    pub id: String,
}

impl Sender {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Recipient of a message or action, identified by Instagram user id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Recipient {
    #[serde(default)]
    pub id: String,
}

impl Recipient {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Recipient of a private reply: the comment being replied to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrivateReplyRecipient {
    pub comment_id: String,
}

impl PrivateReplyRecipient {
    pub fn new(comment_id: impl Into<String>) -> Self {
        Self {
            comment_id: comment_id.into(),
        }
    }
}
