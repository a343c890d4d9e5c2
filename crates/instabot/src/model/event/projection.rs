//! Flattened per-kind projections of a [`MessagingEvent`].
//!
//! Every projection copies `sender` and `recipient`, converts the timestamp
//! to a UTC instant, and pulls out only the fields its kind needs. Missing
//! sub-payloads produce empty fields rather than errors.

use serde::Serialize;

use instabot_macros::FlatEvent;

use super::{EventKind, FlatEvent, MessagingEvent, Postback, Reaction, ReplyToStory, WebhookMessage};
use crate::Timestamp;
use crate::model::types::{Recipient, Sender};

/// Fields shared by every projection.
fn head(event: &MessagingEvent) -> (Sender, Recipient, Timestamp) {
    (event.sender.clone(), event.recipient.clone(), event.time())
}

fn message(event: &MessagingEvent) -> Option<&WebhookMessage> {
    event.message.as_ref()
}

fn mid(event: &MessagingEvent) -> String {
    message(event).map(|m| m.mid.clone()).unwrap_or_default()
}

fn text(event: &MessagingEvent) -> String {
    message(event).map(|m| m.text.clone()).unwrap_or_default()
}

fn first_attachment_url(event: &MessagingEvent) -> String {
    message(event)
        .and_then(WebhookMessage::first_attachment)
        .map(|a| a.payload.url.clone())
        .unwrap_or_default()
}

// ============================================================================
// Message projections
// ============================================================================

/// Plain text message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FlatEvent)]
#[event(kind = "TextMessage")]
pub struct TextMessageEvent {
    pub sender: Sender,
    pub recipient: Recipient,
    pub timestamp: Timestamp,
    pub mid: String,
    pub text: String,
}

impl From<&MessagingEvent> for TextMessageEvent {
    fn from(event: &MessagingEvent) -> Self {
        let (sender, recipient, timestamp) = head(event);
        Self {
            sender,
            recipient,
            timestamp,
            mid: mid(event),
            text: text(event),
        }
    }
}

/// Image, audio, video or file message.
///
/// `kind` carries the concrete media kind so one handler can serve all four.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FlatEvent)]
#[event(kind = "ImageMessage")]
#[event(kind = "AudioMessage")]
#[event(kind = "VideoMessage")]
#[event(kind = "FileMessage")]
pub struct MediaMessageEvent {
    pub sender: Sender,
    pub recipient: Recipient,
    pub timestamp: Timestamp,
    pub mid: String,
    #[event(kind_field)]
    pub kind: EventKind,
    /// URL of the first attachment.
    pub url: String,
}

impl From<&MessagingEvent> for MediaMessageEvent {
    fn from(event: &MessagingEvent) -> Self {
        let (sender, recipient, timestamp) = head(event);
        Self {
            sender,
            recipient,
            timestamp,
            mid: mid(event),
            kind: event.kind(),
            url: first_attachment_url(event),
        }
    }
}

/// Reply to an earlier message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FlatEvent)]
#[event(kind = "MessageReply")]
pub struct MessageReplyEvent {
    pub sender: Sender,
    pub recipient: Recipient,
    pub timestamp: Timestamp,
    pub mid: String,
    pub text: String,
    pub reply_to_mid: String,
}

impl From<&MessagingEvent> for MessageReplyEvent {
    fn from(event: &MessagingEvent) -> Self {
        let (sender, recipient, timestamp) = head(event);
        Self {
            sender,
            recipient,
            timestamp,
            mid: mid(event),
            text: text(event),
            reply_to_mid: message(event)
                .and_then(|m| m.reply_to.as_ref())
                .map(|r| r.mid.clone())
                .unwrap_or_default(),
        }
    }
}

/// User tapped a quick reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FlatEvent)]
#[event(kind = "QuickReply")]
pub struct QuickReplyEvent {
    pub sender: Sender,
    pub recipient: Recipient,
    pub timestamp: Timestamp,
    pub mid: String,
    pub text: String,
    pub payload: String,
}

impl From<&MessagingEvent> for QuickReplyEvent {
    fn from(event: &MessagingEvent) -> Self {
        let (sender, recipient, timestamp) = head(event);
        Self {
            sender,
            recipient,
            timestamp,
            mid: mid(event),
            text: text(event),
            payload: message(event)
                .and_then(|m| m.quick_reply.as_ref())
                .map(|q| q.payload.clone())
                .unwrap_or_default(),
        }
    }
}

/// The business account was mentioned in a story.
///
/// Only the story URL is known here; `story.id` stays empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FlatEvent)]
#[event(kind = "StoryMention")]
pub struct StoryMentionEvent {
    pub sender: Sender,
    pub recipient: Recipient,
    pub timestamp: Timestamp,
    pub mid: String,
    pub story: ReplyToStory,
}

impl From<&MessagingEvent> for StoryMentionEvent {
    fn from(event: &MessagingEvent) -> Self {
        let (sender, recipient, timestamp) = head(event);
        Self {
            sender,
            recipient,
            timestamp,
            mid: mid(event),
            story: ReplyToStory {
                url: first_attachment_url(event),
                id: String::new(),
            },
        }
    }
}

/// Reply to one of the business account's stories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FlatEvent)]
#[event(kind = "StoryReply")]
pub struct StoryReplyEvent {
    pub sender: Sender,
    pub recipient: Recipient,
    pub timestamp: Timestamp,
    pub mid: String,
    pub text: String,
    pub story: ReplyToStory,
}

impl From<&MessagingEvent> for StoryReplyEvent {
    fn from(event: &MessagingEvent) -> Self {
        let (sender, recipient, timestamp) = head(event);
        Self {
            sender,
            recipient,
            timestamp,
            mid: mid(event),
            text: text(event),
            story: message(event)
                .and_then(|m| m.reply_to.as_ref())
                .and_then(|r| r.story.clone())
                .unwrap_or_default(),
        }
    }
}

/// Shared post or reel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FlatEvent)]
#[event(kind = "Share")]
pub struct ShareEvent {
    pub sender: Sender,
    pub recipient: Recipient,
    pub timestamp: Timestamp,
    pub url: String,
}

impl From<&MessagingEvent> for ShareEvent {
    fn from(event: &MessagingEvent) -> Self {
        let (sender, recipient, timestamp) = head(event);
        Self {
            sender,
            recipient,
            timestamp,
            url: first_attachment_url(event),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FlatEvent)]
#[event(kind = "Deleted")]
pub struct MessageDeletedEvent {
    pub sender: Sender,
    pub recipient: Recipient,
    pub timestamp: Timestamp,
    pub mid: String,
}

impl From<&MessagingEvent> for MessageDeletedEvent {
    fn from(event: &MessagingEvent) -> Self {
        let (sender, recipient, timestamp) = head(event);
        Self {
            sender,
            recipient,
            timestamp,
            mid: mid(event),
        }
    }
}

/// A message the business account sent itself, echoed back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FlatEvent)]
#[event(kind = "Echo")]
pub struct EchoEvent {
    pub sender: Sender,
    pub recipient: Recipient,
    pub timestamp: Timestamp,
    pub mid: String,
    pub text: String,
}

impl From<&MessagingEvent> for EchoEvent {
    fn from(event: &MessagingEvent) -> Self {
        let (sender, recipient, timestamp) = head(event);
        Self {
            sender,
            recipient,
            timestamp,
            mid: mid(event),
            text: text(event),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FlatEvent)]
#[event(kind = "Unsupported")]
pub struct UnsupportedEvent {
    pub sender: Sender,
    pub recipient: Recipient,
    pub timestamp: Timestamp,
    pub mid: String,
}

impl From<&MessagingEvent> for UnsupportedEvent {
    fn from(event: &MessagingEvent) -> Self {
        let (sender, recipient, timestamp) = head(event);
        Self {
            sender,
            recipient,
            timestamp,
            mid: mid(event),
        }
    }
}

// ============================================================================
// Non-message projections
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FlatEvent)]
#[event(kind = "Reaction")]
pub struct MessageReactionEvent {
    pub sender: Sender,
    pub recipient: Recipient,
    pub timestamp: Timestamp,
    pub reaction: Reaction,
}

impl From<&MessagingEvent> for MessageReactionEvent {
    fn from(event: &MessagingEvent) -> Self {
        let (sender, recipient, timestamp) = head(event);
        Self {
            sender,
            recipient,
            timestamp,
            reaction: event.reaction.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FlatEvent)]
#[event(kind = "PostBack")]
pub struct PostBackEvent {
    pub sender: Sender,
    pub recipient: Recipient,
    pub timestamp: Timestamp,
    pub postback: Postback,
}

impl From<&MessagingEvent> for PostBackEvent {
    fn from(event: &MessagingEvent) -> Self {
        let (sender, recipient, timestamp) = head(event);
        Self {
            sender,
            recipient,
            timestamp,
            postback: event.postback.clone().unwrap_or_default(),
        }
    }
}

/// Read receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FlatEvent)]
#[event(kind = "MessageSeen")]
pub struct MessageSeenEvent {
    pub sender: Sender,
    pub recipient: Recipient,
    pub timestamp: Timestamp,
    /// Last message the user has seen.
    pub mid: String,
}

impl From<&MessagingEvent> for MessageSeenEvent {
    fn from(event: &MessagingEvent) -> Self {
        let (sender, recipient, timestamp) = head(event);
        Self {
            sender,
            recipient,
            timestamp,
            mid: event.read.as_ref().map(|r| r.mid.clone()).unwrap_or_default(),
        }
    }
}

/// Common fields of an event no other projection claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FlatEvent)]
#[event(kind = "Unknown")]
pub struct UnknownEvent {
    pub sender: Sender,
    pub recipient: Recipient,
    pub timestamp: Timestamp,
}

impl From<&MessagingEvent> for UnknownEvent {
    fn from(event: &MessagingEvent) -> Self {
        let (sender, recipient, timestamp) = head(event);
        Self {
            sender,
            recipient,
            timestamp,
        }
    }
}

// ============================================================================
// Named projections on MessagingEvent
// ============================================================================

impl MessagingEvent {
    pub fn text_message_event(&self) -> TextMessageEvent {
        self.into()
    }

    pub fn media_message_event(&self) -> MediaMessageEvent {
        self.into()
    }

    pub fn message_reply_event(&self) -> MessageReplyEvent {
        self.into()
    }

    pub fn quick_reply_event(&self) -> QuickReplyEvent {
        self.into()
    }

    pub fn story_mention_event(&self) -> StoryMentionEvent {
        self.into()
    }

    pub fn story_reply_event(&self) -> StoryReplyEvent {
        self.into()
    }

    pub fn share_event(&self) -> ShareEvent {
        self.into()
    }

    pub fn message_deleted_event(&self) -> MessageDeletedEvent {
        self.into()
    }

    pub fn echo_event(&self) -> EchoEvent {
        self.into()
    }

    pub fn unsupported_event(&self) -> UnsupportedEvent {
        self.into()
    }

    pub fn message_reaction_event(&self) -> MessageReactionEvent {
        self.into()
    }

    pub fn postback_event(&self) -> PostBackEvent {
        self.into()
    }

    pub fn message_seen_event(&self) -> MessageSeenEvent {
        self.into()
    }

    /// Builds the sum-type view matching this event's kind.
    pub fn event(&self) -> Event {
        match self.kind() {
            EventKind::TextMessage => Event::TextMessage(self.into()),
            EventKind::ImageMessage => Event::ImageMessage(self.into()),
            EventKind::AudioMessage => Event::AudioMessage(self.into()),
            EventKind::VideoMessage => Event::VideoMessage(self.into()),
            EventKind::FileMessage => Event::FileMessage(self.into()),
            EventKind::Share => Event::Share(self.into()),
            EventKind::MessageReply => Event::MessageReply(self.into()),
            EventKind::StoryMention => Event::StoryMention(self.into()),
            EventKind::StoryReply => Event::StoryReply(self.into()),
            EventKind::QuickReply => Event::QuickReply(self.into()),
            EventKind::Reaction => Event::Reaction(self.into()),
            EventKind::MessageSeen => Event::MessageSeen(self.into()),
            EventKind::PostBack => Event::PostBack(self.into()),
            EventKind::Echo => Event::Echo(self.into()),
            EventKind::Deleted => Event::Deleted(self.into()),
            EventKind::Unsupported => Event::Unsupported(self.into()),
            EventKind::Unknown => Event::Unknown(self.into()),
        }
    }
}

// ============================================================================
// Event sum type
// ============================================================================

/// A classified event, one variant per [`EventKind`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TextMessage(TextMessageEvent),
    ImageMessage(MediaMessageEvent),
    AudioMessage(MediaMessageEvent),
    VideoMessage(MediaMessageEvent),
    FileMessage(MediaMessageEvent),
    Share(ShareEvent),
    MessageReply(MessageReplyEvent),
    StoryMention(StoryMentionEvent),
    StoryReply(StoryReplyEvent),
    QuickReply(QuickReplyEvent),
    Reaction(MessageReactionEvent),
    MessageSeen(MessageSeenEvent),
    PostBack(PostBackEvent),
    Echo(EchoEvent),
    Deleted(MessageDeletedEvent),
    Unsupported(UnsupportedEvent),
    Unknown(UnknownEvent),
}

macro_rules! dispatch {
    ($self:expr, $e:ident => $body:expr) => {
        match $self {
            Event::TextMessage($e) => $body,
            Event::ImageMessage($e)
            | Event::AudioMessage($e)
            | Event::VideoMessage($e)
            | Event::FileMessage($e) => $body,
            Event::Share($e) => $body,
            Event::MessageReply($e) => $body,
            Event::StoryMention($e) => $body,
            Event::StoryReply($e) => $body,
            Event::QuickReply($e) => $body,
            Event::Reaction($e) => $body,
            Event::MessageSeen($e) => $body,
            Event::PostBack($e) => $body,
            Event::Echo($e) => $body,
            Event::Deleted($e) => $body,
            Event::Unsupported($e) => $body,
            Event::Unknown($e) => $body,
        }
    };
}

impl Event {
    pub fn kind(&self) -> EventKind {
        dispatch!(self, e => e.kind())
    }

    pub fn sender(&self) -> &Sender {
        dispatch!(self, e => e.sender())
    }

    pub fn recipient(&self) -> &Recipient {
        dispatch!(self, e => e.recipient())
    }

    pub fn timestamp(&self) -> Timestamp {
        dispatch!(self, e => e.timestamp())
    }
}

impl From<&MessagingEvent> for Event {
    fn from(event: &MessagingEvent) -> Self {
        event.event()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(message: &str) -> MessagingEvent {
        serde_json::from_str(&format!(
            r#"{{"sender":{{"id":"S"}},"recipient":{{"id":"R"}},"timestamp":2,"message":{message}}}"#
        ))
        .unwrap()
    }

    #[test]
    fn test_text_projection() {
        let e = event(r#"{"mid":"M1","text":"hi"}"#);
        let flat = e.text_message_event();
        assert_eq!(flat.sender, Sender::new("S"));
        assert_eq!(flat.recipient, Recipient::new("R"));
        assert_eq!(flat.timestamp.timestamp(), 2);
        assert_eq!(flat.mid, "M1");
        assert_eq!(flat.text, "hi");
        assert_eq!(flat.kind(), EventKind::TextMessage);
    }

    #[test]
    fn test_media_projection_carries_kind() {
        let e = event(r#"{"mid":"M3","attachments":[{"type":"audio","payload":{"url":"A"}}]}"#);
        let flat = e.media_message_event();
        assert_eq!(flat.kind, EventKind::AudioMessage);
        assert_eq!(flat.kind(), EventKind::AudioMessage);
        assert_eq!(flat.url, "A");
        assert!(MediaMessageEvent::accepts(EventKind::FileMessage));
        assert!(!MediaMessageEvent::accepts(EventKind::Share));
    }

    #[test]
    fn test_story_projections() {
        let e = event(r#"{"mid":"m","attachments":[{"type":"story_mention","payload":{"url":"U"}}]}"#);
        let flat = e.story_mention_event();
        assert_eq!(flat.story.url, "U");
        assert_eq!(flat.story.id, "");

        let e = event(r#"{"mid":"m","text":"nice","reply_to":{"story":{"url":"U","id":"ST"}}}"#);
        let flat = e.story_reply_event();
        assert_eq!(flat.text, "nice");
        assert_eq!(flat.story, ReplyToStory { url: "U".into(), id: "ST".into() });
    }

    #[test]
    fn test_reply_and_quick_reply_projections() {
        let e = event(r#"{"mid":"m","text":"t","reply_to":{"mid":"prev"}}"#);
        assert_eq!(e.message_reply_event().reply_to_mid, "prev");

        let e = event(r#"{"mid":"m","text":"Red","quick_reply":{"payload":"RED"}}"#);
        let flat = e.quick_reply_event();
        assert_eq!(flat.text, "Red");
        assert_eq!(flat.payload, "RED");
    }

    #[test]
    fn test_wrong_projection_is_permissive() {
        let e = event(r#"{"mid":"M1","text":"hi"}"#);
        let flat = e.message_seen_event();
        assert_eq!(flat.mid, "");
        assert_eq!(flat.sender.id, "S");

        let flat = e.postback_event();
        assert_eq!(flat.postback, Postback::default());

        let flat = e.media_message_event();
        assert_eq!(flat.mid, "M1");
        assert_eq!(flat.url, "");
        assert_eq!(flat.kind, EventKind::TextMessage);
    }

    #[test]
    fn test_from_event_checks_kind() {
        let e = event(r#"{"mid":"M1","text":"hi"}"#);
        assert!(TextMessageEvent::from_event(&e).is_some());
        assert!(MessageDeletedEvent::from_event(&e).is_none());
        assert!(MediaMessageEvent::from_event(&e).is_none());
    }

    #[test]
    fn test_event_sum_type() {
        let e = event(r#"{"mid":"M2","is_deleted":true,"text":"hi"}"#);
        match e.event() {
            Event::Deleted(flat) => assert_eq!(flat.mid, "M2"),
            other => panic!("unexpected event: {other:?}"),
        }

        let e = event(r#"{"mid":"m","attachments":[{"type":"file","payload":{"url":"F"}}]}"#);
        let ev = Event::from(&e);
        assert_eq!(ev.kind(), EventKind::FileMessage);
        assert_eq!(ev.sender().id, "S");
        assert_eq!(ev.recipient().id, "R");
        assert_eq!(ev.timestamp(), e.time());
    }

    #[test]
    fn test_event_kind_matches_every_variant() {
        let cases = [
            r#"{"mid":"m","text":"t"}"#,
            r#"{"mid":"m","is_echo":true}"#,
            r#"{"mid":"m","is_unsupported":true}"#,
            r#"{"mid":"m","attachments":[{"type":"video","payload":{"url":"V"}}]}"#,
            r#"{"mid":"m","attachments":[{"type":"share","payload":{"url":"P"}}]}"#,
            r#"{"mid":"m"}"#,
        ];
        for message in cases {
            let e = event(message);
            assert_eq!(e.event().kind(), e.kind(), "message {message}");
        }
    }

    #[test]
    fn test_event_serializes_with_type_tag() {
        let e = event(r#"{"mid":"M1","text":"hi"}"#);
        let json = serde_json::to_value(e.event()).unwrap();
        assert_eq!(json["type"], "text_message");
        assert_eq!(json["mid"], "M1");
        assert_eq!(json["sender"]["id"], "S");
    }
}
