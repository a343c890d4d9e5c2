//! Sub-payloads carried by a messaging event.
//!
//! Every field the platform may omit is defaulted, so a missing sub-field
//! never fails decoding; it simply makes the corresponding predicate
//! return `false`.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// Deserializes `null` as `T::default()`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn is_false(v: &bool) -> bool {
    !*v
}

// ============================================================================
// Attachments
// ============================================================================

/// Attachment type tag.
///
/// Tags the platform adds later (reels, audio notes, …), as well as `null`
/// or non-string tags, decode as [`AttachmentType::Other`] and match no
/// predicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "RawTag")]
pub enum AttachmentType {
    Image,
    Audio,
    Video,
    File,
    Share,
    StoryMention,
    #[default]
    Other,
}

impl AttachmentType {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "image" => Self::Image,
            "audio" => Self::Audio,
            "video" => Self::Video,
            "file" => Self::File,
            "share" => Self::Share,
            "story_mention" => Self::StoryMention,
            _ => Self::Other,
        }
    }
}

/// Any JSON value in the `type` slot.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawTag {
    Tag(String),
    Unrecognized(IgnoredAny),
}

impl From<RawTag> for AttachmentType {
    fn from(raw: RawTag) -> Self {
        match raw {
            RawTag::Tag(tag) => Self::from_tag(&tag),
            RawTag::Unrecognized(_) => Self::Other,
        }
    }
}

/// Attachment payload; only the media URL is exposed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentPayload {
    #[serde(default, deserialize_with = "nullable")]
    pub url: String,
}

/// Attachment of a webhook message (audio, video, media share, …).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(default, rename = "type")]
    pub attachment_type: AttachmentType,
    #[serde(default, deserialize_with = "nullable")]
    pub payload: AttachmentPayload,
}

// ============================================================================
// Replies
// ============================================================================

/// Story details of a story reply or story mention.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyToStory {
    #[serde(default, deserialize_with = "nullable")]
    pub url: String,
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,
}

/// What a message replies to: a previous message or a story.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyTo {
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "String::is_empty"
    )]
    pub mid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story: Option<ReplyToStory>,
}

/// Quick reply payload echoed back when a user taps a quick reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookQuickReply {
    #[serde(default, deserialize_with = "nullable")]
    pub payload: String,
}

// ============================================================================
// Message
// ============================================================================

/// The `message` sub-payload.
///
/// Several signals may be present at once (a deleted message can still carry
/// text); the classifier decides which one wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookMessage {
    #[serde(default, deserialize_with = "nullable")]
    pub mid: String,
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "String::is_empty"
    )]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quick_reply: Option<WebhookQuickReply>,
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub attachments: Vec<Attachment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<ReplyTo>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "is_false")]
    pub is_echo: bool,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "is_false")]
    pub is_unsupported: bool,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "is_false")]
    pub is_deleted: bool,
}

impl WebhookMessage {
    /// The first attachment. Later attachments never take part in
    /// classification or flattening.
    pub fn first_attachment(&self) -> Option<&Attachment> {
        self.attachments.first()
    }

    fn first_attachment_is(&self, attachment_type: AttachmentType) -> bool {
        self.first_attachment()
            .is_some_and(|a| a.attachment_type == attachment_type)
    }

    pub fn is_quick_reply(&self) -> bool {
        self.quick_reply.is_some()
    }

    pub fn is_story_reply(&self) -> bool {
        self.reply_to.as_ref().is_some_and(|r| r.story.is_some())
    }

    pub fn is_message_reply(&self) -> bool {
        self.reply_to.as_ref().is_some_and(|r| !r.mid.is_empty())
    }

    pub fn is_story_mention(&self) -> bool {
        self.first_attachment_is(AttachmentType::StoryMention)
    }

    pub fn is_share(&self) -> bool {
        self.first_attachment_is(AttachmentType::Share)
    }

    pub fn is_image(&self) -> bool {
        self.first_attachment_is(AttachmentType::Image)
    }

    pub fn is_audio(&self) -> bool {
        self.first_attachment_is(AttachmentType::Audio)
    }

    pub fn is_video(&self) -> bool {
        self.first_attachment_is(AttachmentType::Video)
    }

    pub fn is_file(&self) -> bool {
        self.first_attachment_is(AttachmentType::File)
    }

    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }
}

// ============================================================================
// Other sub-payloads
// ============================================================================

/// Read receipt: the last message the user has seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Read {
    #[serde(default, deserialize_with = "nullable")]
    pub mid: String,
}

/// Reaction to a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    #[serde(default, deserialize_with = "nullable")]
    pub mid: String,
    /// `react` or `unreact`.
    #[serde(default, deserialize_with = "nullable")]
    pub action: String,
    #[serde(default, deserialize_with = "nullable")]
    pub reaction: String,
    #[serde(default, deserialize_with = "nullable")]
    pub emoji: String,
}

impl Reaction {
    pub fn is_unreact(&self) -> bool {
        self.action == "unreact"
    }
}

/// Postback sent when a user taps a postback button or ice breaker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Postback {
    #[serde(default, deserialize_with = "nullable")]
    pub mid: String,
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub payload: String,
}

/// Shop product a referral points at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferralProduct {
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,
}

/// Product referral.
///
/// Decoded and exposed, but not classified: an event carrying only a
/// referral is [`EventKind::Unknown`](super::EventKind::Unknown).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Referral {
    #[serde(default, deserialize_with = "nullable")]
    pub product: ReferralProduct,
}
