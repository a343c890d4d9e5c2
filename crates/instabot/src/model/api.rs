//! Request bodies and response shapes of the Graph API calls.
//!
//! Every response field is defaulted: the platform omits fields freely and a
//! 2xx with an empty body decodes to `Default::default()`.

use serde::{Deserialize, Serialize};

use super::ice_breaker::IceBreaker;
use super::message::Message;
use super::types::{PrivateReplyRecipient, Recipient};

// ============================================================================
// Request bodies
// ============================================================================

/// Body of `POST /me/messages`.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageRequest<'a, R> {
    pub recipient: R,
    pub message: &'a Message,
}

pub type DirectMessageRequest<'a> = SendMessageRequest<'a, Recipient>;
pub type PrivateReplyRequest<'a> = SendMessageRequest<'a, PrivateReplyRecipient>;

/// Body of `POST /me/messenger_profile`.
#[derive(Debug, Clone, Serialize)]
pub struct SetIceBreakersRequest<'a> {
    pub platform: &'a str,
    pub ice_breakers: &'a [IceBreaker],
}

/// Body of `DELETE /me/messenger_profile`.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteFieldsRequest<'a> {
    pub fields: &'a [&'a str],
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessageResponse {
    #[serde(default)]
    pub recipient_id: String,
    #[serde(default)]
    pub message_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetIceBreakersResponse {
    /// `success` when the platform accepted the list.
    #[serde(default)]
    pub result: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceBreakers {
    #[serde(default)]
    pub ice_breakers: Vec<IceBreaker>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetIceBreakersResponse {
    #[serde(default)]
    pub data: Vec<IceBreakers>,
}

impl GetIceBreakersResponse {
    /// All ice breakers across the returned profiles.
    pub fn ice_breakers(&self) -> impl Iterator<Item = &IceBreaker> {
        self.data.iter().flat_map(|d| d.ice_breakers.iter())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteIceBreakersResponse {
    #[serde(default)]
    pub result: String,
}

/// Public profile of an Instagram user who messaged the business account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub profile_pic: String,
    #[serde(default)]
    pub is_verified_user: bool,
    #[serde(default)]
    pub follower_count: u64,
    #[serde(default)]
    pub is_user_follow_business: bool,
    #[serde(default)]
    pub is_business_follow_user: bool,
}
