//! # instabot-core
//!
//! Shared building blocks for the instabot crates:
//!
//! - [`error`]: the error taxonomy ([`TransportError`], [`ApiError`],
//!   [`DecodeError`]) and the platform [`ErrorResponse`] shape.
//! - [`transport`]: the [`ApiCaller`] seam and its request/response values.
//!
//! Nothing here depends on an HTTP stack; see `instabot-transport` for the
//! reqwest-backed caller.

pub mod error;
pub mod transport;

pub use error::{
    ApiError, ApiErrorBody, ApiResult, DecodeError, DecodeResult, ErrorResponse, TransportError,
    TransportResult,
};
pub use transport::{ApiCaller, ApiRequest, ApiResponse, Method};
