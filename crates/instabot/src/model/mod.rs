//! Data models for the Instagram Messaging API.
//!
//! - [`event`] / [`webhook`]: inbound webhook payloads and their
//!   classification.
//! - [`message`], [`button`], [`template`], [`quick_reply`],
//!   [`ice_breaker`]: outbound payload builders.
//! - [`api`]: request bodies and response shapes.

pub mod api;
pub mod button;
pub mod event;
pub mod ice_breaker;
pub mod message;
pub mod quick_reply;
pub mod template;
pub mod types;
pub mod webhook;

pub use api::*;
pub use button::{Button, ButtonType};
pub use event::*;
pub use ice_breaker::IceBreaker;
pub use message::{
    GenericTemplateMessage, ImageMessage, MediaShareMessage, Message, MessageType,
    ProductTemplateMessage, StickerMessage, StickerType, TextMessage,
};
pub use quick_reply::{QuickReply, QuickReplyType};
pub use template::{DefaultAction, GenericTemplateElement, ProductTemplateElement, TemplateType};
pub use types::{PrivateReplyRecipient, Recipient, Sender};
pub use webhook::{Entry, WebhookEvent, decode};
