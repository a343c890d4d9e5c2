//! Procedural macros for the instabot crate.
//!
//! This crate provides:
//!
//! - `#[derive(FlatEvent)]` - Implements `instabot::FlatEvent` for a
//!   flattened webhook projection.
//!
//! # FlatEvent Derive Macro
//!
//! ```rust,ignore
//! use instabot::{Recipient, Sender, Timestamp};
//! use instabot_macros::FlatEvent;
//!
//! #[derive(Debug, Clone, FlatEvent)]
//! #[event(kind = "TextMessage")]
//! pub struct TextMessageEvent {
//!     pub sender: Sender,
//!     pub recipient: Recipient,
//!     pub timestamp: Timestamp,
//!     pub mid: String,
//!     pub text: String,
//! }
//! ```

mod event;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Derives `instabot::FlatEvent` for a projection struct.
///
/// The struct must have named fields `sender`, `recipient` and `timestamp`.
///
/// # Attributes
///
/// - `#[event(kind = "...")]` - An `EventKind` variant this projection is
///   valid for. Repeat the key to accept several kinds.
/// - `#[event(kind_field)]` *(field)* - The field holding the concrete
///   `EventKind`; required when more than one kind is accepted.
#[proc_macro_derive(FlatEvent, attributes(event))]
pub fn derive_flat_event(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match event::derive_flat_event(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
