//! # instabot-transport
//!
//! Network transport implementations of [`instabot_core::ApiCaller`].
//!
//! ## Feature Flags
//!
//! - `http-client` *(default)*: [`HttpApiCaller`], backed by `reqwest`.

#[cfg(feature = "http-client")]
pub mod http;

#[cfg(feature = "http-client")]
pub use http::HttpApiCaller;
