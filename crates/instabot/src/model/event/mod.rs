//! Webhook messaging events.
//!
//! A messaging event arrives as a loose JSON object carrying any of the
//! optional sub-payloads `message`, `read`, `reaction`, `referral` and
//! `postback`. Decoding goes through two steps:
//!
//! ```text
//! JSON ──serde──▶ RawMessagingEvent ──classify──▶ MessagingEvent { raw, kind }
//!                                                      │
//!                                     event() / From<&MessagingEvent>
//!                                                      ▼
//!                                   Event::TextMessage(TextMessageEvent), …
//! ```
//!
//! [`MessagingEvent`] is immutable once built: its [`EventKind`] is assigned
//! exactly once, during deserialization, and the raw sub-payloads are only
//! reachable through a shared `Deref`.

mod payload;
mod projection;

use std::fmt;
use std::ops::Deref;

use chrono::DateTime;
use serde::{Deserialize, Serialize};

pub(crate) use payload::nullable;
pub use payload::*;
pub use projection::*;

use crate::model::types::{Recipient, Sender};
use crate::Timestamp;

// ============================================================================
// EventKind
// ============================================================================

/// Classification result of a messaging event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    TextMessage,
    ImageMessage,
    AudioMessage,
    VideoMessage,
    FileMessage,
    Share,
    MessageReply,
    StoryMention,
    StoryReply,
    QuickReply,
    Reaction,
    MessageSeen,
    PostBack,
    Echo,
    Deleted,
    Unsupported,
    /// No known signal matched. Referral-only events land here too.
    #[default]
    Unknown,
}

impl EventKind {
    /// Every kind, in declaration order.
    pub const ALL: [EventKind; 17] = [
        Self::TextMessage,
        Self::ImageMessage,
        Self::AudioMessage,
        Self::VideoMessage,
        Self::FileMessage,
        Self::Share,
        Self::MessageReply,
        Self::StoryMention,
        Self::StoryReply,
        Self::QuickReply,
        Self::Reaction,
        Self::MessageSeen,
        Self::PostBack,
        Self::Echo,
        Self::Deleted,
        Self::Unsupported,
        Self::Unknown,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TextMessage => "text_message",
            Self::ImageMessage => "image_message",
            Self::AudioMessage => "audio_message",
            Self::VideoMessage => "video_message",
            Self::FileMessage => "file_message",
            Self::Share => "share",
            Self::MessageReply => "message_reply",
            Self::StoryMention => "story_mention",
            Self::StoryReply => "story_reply",
            Self::QuickReply => "quick_reply",
            Self::Reaction => "reaction",
            Self::MessageSeen => "message_seen",
            Self::PostBack => "post_back",
            Self::Echo => "echo",
            Self::Deleted => "deleted",
            Self::Unsupported => "unsupported",
            Self::Unknown => "unknown",
        }
    }

    /// Returns `true` for the four attachment-backed media kinds.
    pub const fn is_media(self) -> bool {
        matches!(
            self,
            Self::ImageMessage | Self::AudioMessage | Self::VideoMessage | Self::FileMessage
        )
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// FlatEvent
// ============================================================================

/// A flattened, kind-specific view of a [`MessagingEvent`].
///
/// Implemented with `#[derive(FlatEvent)]`. Two ways to build one:
///
/// - `From<&MessagingEvent>` is permissive: projecting an event of another
///   kind yields a partially empty record, never an error.
/// - [`FlatEvent::from_event`] checks the kind first and returns `None` on a
///   mismatch.
pub trait FlatEvent: Sized + for<'a> From<&'a MessagingEvent> {
    /// Kinds this projection is meant for.
    const KINDS: &'static [EventKind];

    fn kind(&self) -> EventKind;

    fn sender(&self) -> &Sender;

    fn recipient(&self) -> &Recipient;

    fn timestamp(&self) -> Timestamp;

    fn accepts(kind: EventKind) -> bool {
        Self::KINDS.contains(&kind)
    }

    fn from_event(event: &MessagingEvent) -> Option<Self> {
        Self::accepts(event.kind()).then(|| Self::from(event))
    }
}

// ============================================================================
// Raw event
// ============================================================================

/// A messaging event exactly as the platform sent it.
///
/// `sender`, `recipient` and `timestamp` are required; every sub-payload is
/// optional and more than one may be present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMessagingEvent {
    pub sender: Sender,
    pub recipient: Recipient,
    /// Epoch seconds.
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<WebhookMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read: Option<Read>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reaction: Option<Reaction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referral: Option<Referral>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postback: Option<Postback>,
}

impl RawMessagingEvent {
    /// Assigns exactly one kind. First match wins.
    pub fn classify(&self) -> EventKind {
        if let Some(message) = &self.message {
            return classify_message(message);
        }
        if self.read.is_some() {
            EventKind::MessageSeen
        } else if self.reaction.is_some() {
            EventKind::Reaction
        } else if self.postback.is_some() {
            EventKind::PostBack
        } else {
            EventKind::Unknown
        }
    }
}

/// Platform flags come first: a deleted or echoed message may still carry
/// text or attachments.
fn classify_message(m: &WebhookMessage) -> EventKind {
    if m.is_echo {
        EventKind::Echo
    } else if m.is_deleted {
        EventKind::Deleted
    } else if m.is_unsupported {
        EventKind::Unsupported
    } else if m.is_audio() {
        EventKind::AudioMessage
    } else if m.is_file() {
        EventKind::FileMessage
    } else if m.is_image() {
        EventKind::ImageMessage
    } else if m.is_video() {
        EventKind::VideoMessage
    } else if m.is_message_reply() {
        EventKind::MessageReply
    } else if m.is_quick_reply() {
        EventKind::QuickReply
    } else if m.is_share() {
        EventKind::Share
    } else if m.is_story_mention() {
        EventKind::StoryMention
    } else if m.is_story_reply() {
        EventKind::StoryReply
    } else if m.has_text() {
        EventKind::TextMessage
    } else {
        EventKind::Unknown
    }
}

// ============================================================================
// Classified event
// ============================================================================

/// A classified messaging event.
///
/// Dereferences to [`RawMessagingEvent`] for read access to the sub-payloads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawMessagingEvent", into = "RawMessagingEvent")]
pub struct MessagingEvent {
    raw: RawMessagingEvent,
    kind: EventKind,
}

impl MessagingEvent {
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// The event timestamp as a UTC instant; out-of-range values map to the
    /// Unix epoch.
    pub fn time(&self) -> Timestamp {
        DateTime::from_timestamp(self.raw.timestamp, 0).unwrap_or_default()
    }

    pub fn raw(&self) -> &RawMessagingEvent {
        &self.raw
    }

    pub fn into_raw(self) -> RawMessagingEvent {
        self.raw
    }

    /// Projects into any flattened view, regardless of kind.
    pub fn project<T: FlatEvent>(&self) -> T {
        T::from(self)
    }
}

impl From<RawMessagingEvent> for MessagingEvent {
    fn from(raw: RawMessagingEvent) -> Self {
        let kind = raw.classify();
        Self { raw, kind }
    }
}

impl From<MessagingEvent> for RawMessagingEvent {
    fn from(event: MessagingEvent) -> Self {
        event.raw
    }
}

impl Deref for MessagingEvent {
    type Target = RawMessagingEvent;

    fn deref(&self) -> &Self::Target {
        &self.raw
    }
}
