//! # instabot-runtime
//!
//! Application plumbing for programs built on `instabot`:
//!
//! - [`config`]: layered configuration (defaults → `instabot.toml` /
//!   `instabot.yaml` → `INSTABOT_*` environment variables).
//! - [`logging`]: `tracing-subscriber` setup driven by that configuration.
//!
//! ```rust,ignore
//! use instabot::Client;
//! use instabot_runtime::{config::load_config, logging};
//!
//! let config = load_config()?;
//! logging::init_from_config(&config.logging);
//! let client = Client::new(config.client)?;
//! ```
//!
//! ## Features
//!
//! - `toml-config` *(default)*: TOML configuration files
//! - `yaml-config`: YAML configuration files
//! - `json-log`: JSON log format

pub mod config;
pub mod logging;

pub use config::{ConfigError, ConfigLoader, ConfigResult, InstabotConfig, load_config};
pub use logging::{LoggingBuilder, init_from_config};
