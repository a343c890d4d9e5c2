//! # instabot
//!
//! Typed client for the Instagram Messaging API (Graph API).
//!
//! ## Overview
//!
//! Two halves:
//!
//! - **Outbound**: [`Client`] implements [`InstaBot`]: send messages and
//!   private replies, manage ice breakers, fetch user profiles.
//! - **Inbound**: [`decode`] turns a webhook payload into a [`WebhookEvent`]
//!   whose messaging events are already classified into an [`EventKind`].
//!
//! ```text
//! webhook bytes ──decode──▶ WebhookEvent
//!                           └─ Entry { id, time }
//!                              └─ MessagingEvent { kind, … }
//!                                 └─ event() ──▶ Event::TextMessage(TextMessageEvent), …
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use instabot::{Client, ClientConfig, Event, InstaBot, Message};
//!
//! let client = Client::new(ClientConfig::new(token))?;
//!
//! for event in instabot::decode(&body)?.events() {
//!     if let Event::TextMessage(text) = event.event() {
//!         client
//!             .send_message(&text.sender.id, &Message::text(format!("echo: {}", text.text)))
//!             .await?;
//!     }
//! }
//! ```
//!
//! ## Features
//!
//! - `http-client` *(default)*: [`Client::new`] over the reqwest transport.
//!   Without it, build clients with [`Client::with_caller`].

// `#[derive(FlatEvent)]` expands to `::instabot::…` paths.
extern crate self as instabot;

pub mod client;
pub mod config;
pub mod model;

pub use client::{Client, InstaBot};
pub use config::ClientConfig;
pub use model::*;

pub use instabot_core::{
    ApiCaller, ApiError, ApiErrorBody, ApiRequest, ApiResponse, ApiResult, DecodeError,
    DecodeResult, ErrorResponse, Method, TransportError, TransportResult,
};
pub use instabot_macros::FlatEvent;

#[cfg(feature = "http-client")]
pub use instabot_transport::HttpApiCaller;

/// Absolute UTC instant of a webhook event.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
