//! Outbound messages.
//!
//! Wire shapes, as placed under `"message"` in a send request:
//!
//! | Variant | JSON |
//! |---------|------|
//! | `Text` | `{"text", "quick_replies"?}` |
//! | `Image` | `{"attachment":{"type":"image","payload":{"url"}}}` |
//! | `Sticker` | `{"attachment":{"type":"like_heart"}}` |
//! | `MediaShare` | `{"attachment":{"type":"media_share","payload":{"id"}}}` |
//! | `GenericTemplate` / `ProductTemplate` | `{"attachment":{"type":"template","payload":{"template_type","elements"}}}` |

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use super::quick_reply::QuickReply;
use super::template::{GenericTemplateElement, ProductTemplateElement, TemplateType};

/// Message type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Text,
    Image,
    Sticker,
    MediaShare,
    Template,
}

impl MessageType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Sticker => "sticker",
            Self::MediaShare => "media_share",
            Self::Template => "template",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Attachment envelope
// ============================================================================

#[derive(Serialize)]
struct Envelope<'a, P> {
    attachment: AttachmentBody<'a, P>,
}

#[derive(Serialize)]
struct AttachmentBody<'a, P> {
    #[serde(rename = "type")]
    attachment_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<P>,
}

fn serialize_attachment<S, P>(
    serializer: S,
    attachment_type: &str,
    payload: Option<P>,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    P: Serialize,
{
    Envelope {
        attachment: AttachmentBody {
            attachment_type,
            payload,
        },
    }
    .serialize(serializer)
}

#[derive(Serialize)]
struct TemplatePayload<'a, E> {
    template_type: TemplateType,
    elements: &'a [E],
}

// ============================================================================
// Variants
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextMessage {
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub quick_replies: Vec<QuickReply>,
}

impl TextMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quick_replies: Vec::new(),
        }
    }

    pub fn with_quick_replies(mut self, quick_replies: impl IntoIterator<Item = QuickReply>) -> Self {
        self.quick_replies.extend(quick_replies);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageMessage {
    pub url: String,
}

impl Serialize for ImageMessage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Payload<'a> {
            url: &'a str,
        }
        serialize_attachment(
            serializer,
            MessageType::Image.as_str(),
            Some(Payload { url: &self.url }),
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StickerType {
    #[default]
    LikeHeart,
}

impl StickerType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LikeHeart => "like_heart",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StickerMessage {
    pub sticker: StickerType,
}

impl Serialize for StickerMessage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_attachment::<_, ()>(serializer, self.sticker.as_str(), None)
    }
}

/// Shares a post published by the business account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaShareMessage {
    pub media_id: String,
}

impl Serialize for MediaShareMessage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Payload<'a> {
            id: &'a str,
        }
        serialize_attachment(
            serializer,
            MessageType::MediaShare.as_str(),
            Some(Payload { id: &self.media_id }),
        )
    }
}

/// Carousel of up to ten cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericTemplateMessage {
    pub elements: Vec<GenericTemplateElement>,
}

impl Serialize for GenericTemplateMessage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_attachment(
            serializer,
            MessageType::Template.as_str(),
            Some(TemplatePayload {
                template_type: TemplateType::Generic,
                elements: &self.elements,
            }),
        )
    }
}

/// Up to ten catalog products.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductTemplateMessage {
    pub elements: Vec<ProductTemplateElement>,
}

impl Serialize for ProductTemplateMessage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_attachment(
            serializer,
            MessageType::Template.as_str(),
            Some(TemplatePayload {
                template_type: TemplateType::Product,
                elements: &self.elements,
            }),
        )
    }
}

// ============================================================================
// Message
// ============================================================================

/// Any message the send API accepts.
///
/// ```rust,ignore
/// use instabot::{Message, QuickReply};
///
/// let hello = Message::text("Hello!");
/// let pick = Message::text_with_quick_replies(
///     "Pick a color",
///     [QuickReply::text("Red", "RED"), QuickReply::text("Green", "GREEN")],
/// );
/// let heart = Message::sticker();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Message {
    Text(TextMessage),
    Image(ImageMessage),
    Sticker(StickerMessage),
    MediaShare(MediaShareMessage),
    GenericTemplate(GenericTemplateMessage),
    ProductTemplate(ProductTemplateMessage),
}

impl Message {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(TextMessage::new(text))
    }

    pub fn text_with_quick_replies(
        text: impl Into<String>,
        quick_replies: impl IntoIterator<Item = QuickReply>,
    ) -> Self {
        Self::Text(TextMessage::new(text).with_quick_replies(quick_replies))
    }

    pub fn image(url: impl Into<String>) -> Self {
        Self::Image(ImageMessage { url: url.into() })
    }

    /// The heart sticker, the only sticker Instagram supports.
    pub fn sticker() -> Self {
        Self::Sticker(StickerMessage::default())
    }

    pub fn media_share(media_id: impl Into<String>) -> Self {
        Self::MediaShare(MediaShareMessage {
            media_id: media_id.into(),
        })
    }

    pub fn generic_template(elements: impl IntoIterator<Item = GenericTemplateElement>) -> Self {
        Self::GenericTemplate(GenericTemplateMessage {
            elements: elements.into_iter().collect(),
        })
    }

    pub fn product_template(elements: impl IntoIterator<Item = ProductTemplateElement>) -> Self {
        Self::ProductTemplate(ProductTemplateMessage {
            elements: elements.into_iter().collect(),
        })
    }

    pub fn message_type(&self) -> MessageType {
        match self {
            Self::Text(_) => MessageType::Text,
            Self::Image(_) => MessageType::Image,
            Self::Sticker(_) => MessageType::Sticker,
            Self::MediaShare(_) => MessageType::MediaShare,
            Self::GenericTemplate(_) | Self::ProductTemplate(_) => MessageType::Template,
        }
    }

    /// `Some` for template messages.
    pub fn template_type(&self) -> Option<TemplateType> {
        match self {
            Self::GenericTemplate(_) => Some(TemplateType::Generic),
            Self::ProductTemplate(_) => Some(TemplateType::Product),
            _ => None,
        }
    }
}

impl From<TextMessage> for Message {
    fn from(m: TextMessage) -> Self {
        Self::Text(m)
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Self::text(text)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::button::Button;

    fn to_json(m: &Message) -> serde_json::Value {
        serde_json::to_value(m).unwrap()
    }

    #[test]
    fn test_text_message() {
        let m = Message::text("hello");
        assert_eq!(m.message_type(), MessageType::Text);
        assert_eq!(to_json(&m), json!({"text": "hello"}));

        let m = Message::text_with_quick_replies("pick", [QuickReply::text("Red", "RED")]);
        assert_eq!(
            to_json(&m),
            json!({
                "text": "pick",
                "quick_replies": [{"content_type": "text", "title": "Red", "payload": "RED"}]
            })
        );
    }

    #[test]
    fn test_attachment_messages() {
        assert_eq!(
            to_json(&Message::image("https://example.com/a.png")),
            json!({"attachment": {"type": "image", "payload": {"url": "https://example.com/a.png"}}})
        );
        assert_eq!(
            to_json(&Message::sticker()),
            json!({"attachment": {"type": "like_heart"}})
        );
        assert_eq!(
            to_json(&Message::media_share("POST_ID")),
            json!({"attachment": {"type": "media_share", "payload": {"id": "POST_ID"}}})
        );
        assert_eq!(Message::sticker().message_type(), MessageType::Sticker);
        assert_eq!(Message::sticker().template_type(), None);
    }

    #[test]
    fn test_template_messages() {
        let m = Message::generic_template([GenericTemplateElement::new("card")
            .button(Button::postback("Buy", "BUY"))]);
        assert_eq!(m.message_type(), MessageType::Template);
        assert_eq!(m.template_type(), Some(TemplateType::Generic));
        assert_eq!(
            to_json(&m),
            json!({"attachment": {"type": "template", "payload": {
                "template_type": "generic",
                "elements": [{
                    "title": "card",
                    "buttons": [{"type": "postback", "title": "Buy", "payload": "BUY"}]
                }]
            }}})
        );

        let m = Message::product_template([ProductTemplateElement::new("P1")]);
        assert_eq!(m.template_type(), Some(TemplateType::Product));
        assert_eq!(
            to_json(&m),
            json!({"attachment": {"type": "template", "payload": {
                "template_type": "product",
                "elements": [{"id": "P1"}]
            }}})
        );
    }
}
