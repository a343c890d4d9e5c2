//! Client configuration.
//!
//! Loaded from the `client` section of `instabot.yaml` / `instabot.toml`
//! by `instabot-runtime`, or built directly in code.
//!
//! # Example Configuration
//!
//! ```yaml
//! client:
//!   access_token: ${INSTABOT_CLIENT__ACCESS_TOKEN}
//!   endpoint_base: https://graph.facebook.com
//!   api_version: v11.0
//!   timeout_secs: 30
//! ```

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use instabot_core::{ApiError, ApiResult};

pub const DEFAULT_ENDPOINT_BASE: &str = "https://graph.facebook.com";
pub const DEFAULT_API_VERSION: &str = "v11.0";
pub const DEFAULT_PLATFORM: &str = "instagram";

/// Settings for the Graph API client.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Page access token, appended to every request.
    pub access_token: String,

    /// Scheme and host of the Graph API.
    pub endpoint_base: String,

    /// Graph API version prefix, e.g. `v11.0`.
    pub api_version: String,

    /// Value of the `platform` parameter on messenger profile calls.
    pub platform: String,

    /// Per-request timeout in seconds (0 disables it).
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            endpoint_base: DEFAULT_ENDPOINT_BASE.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            platform: DEFAULT_PLATFORM.to_string(),
            timeout_secs: 30,
        }
    }
}

// The token never shows up in logs or panics.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("access_token", &"<redacted>")
            .field("endpoint_base", &self.endpoint_base)
            .field("api_version", &self.api_version)
            .field("platform", &self.platform)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ClientConfig {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            ..Default::default()
        }
    }

    pub fn with_endpoint_base(mut self, endpoint_base: impl Into<String>) -> Self {
        self.endpoint_base = endpoint_base.into();
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs();
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    /// Checks the token is set and the endpoint base is an http(s) URL.
    pub fn validate(&self) -> ApiResult<()> {
        if self.access_token.trim().is_empty() {
            return Err(ApiError::MissingAccessToken);
        }

        let rest = self
            .endpoint_base
            .strip_prefix("https://")
            .or_else(|| self.endpoint_base.strip_prefix("http://"));
        match rest {
            Some(host) if !host.trim_matches('/').is_empty() => {}
            _ => {
                return Err(ApiError::InvalidConfig(format!(
                    "endpoint_base must be an absolute http(s) URL, got {:?}",
                    self.endpoint_base
                )));
            }
        }

        if self.api_version.trim().is_empty() {
            return Err(ApiError::InvalidConfig("api_version is empty".to_string()));
        }

        Ok(())
    }

    /// `endpoint_base` without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.endpoint_base.trim_end_matches('/')
    }

    /// `/{version}/me/messages`
    pub fn messages_path(&self) -> String {
        format!("/{}/me/messages", self.api_version)
    }

    /// `/{version}/me/messenger_profile`
    pub fn messenger_profile_path(&self) -> String {
        format!("/{}/me/messenger_profile", self.api_version)
    }

    /// `/{version}/{ig_user_id}`
    pub fn user_profile_path(&self, ig_user_id: &str) -> String {
        format!("/{}/{}", self.api_version, ig_user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
access_token: token
api_version: v17.0
timeout_secs: 5
"#;

        let config: ClientConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.access_token, "token");
        assert_eq!(config.api_version, "v17.0");
        assert_eq!(config.endpoint_base, DEFAULT_ENDPOINT_BASE);
        assert_eq!(config.platform, "instagram");
        assert_eq!(config.timeout(), Some(Duration::from_secs(5)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate() {
        assert!(matches!(
            ClientConfig::default().validate(),
            Err(ApiError::MissingAccessToken)
        ));
        assert!(matches!(
            ClientConfig::new("   ").validate(),
            Err(ApiError::MissingAccessToken)
        ));
        assert!(matches!(
            ClientConfig::new("t")
                .with_endpoint_base("graph.facebook.com")
                .validate(),
            Err(ApiError::InvalidConfig(_))
        ));
        assert!(matches!(
            ClientConfig::new("t").with_endpoint_base("https://").validate(),
            Err(ApiError::InvalidConfig(_))
        ));
        assert!(
            ClientConfig::new("t")
                .with_endpoint_base("http://127.0.0.1:8080/")
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn test_endpoints() {
        let config = ClientConfig::new("t").with_endpoint_base("https://graph.facebook.com/");
        assert_eq!(config.base_url(), "https://graph.facebook.com");
        assert_eq!(config.messages_path(), "/v11.0/me/messages");
        assert_eq!(config.messenger_profile_path(), "/v11.0/me/messenger_profile");
        assert_eq!(config.user_profile_path("42"), "/v11.0/42");
    }

    #[test]
    fn test_debug_redacts_token() {
        let debug = format!("{:?}", ClientConfig::new("super-secret"));
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_zero_timeout() {
        let config = ClientConfig::new("t").with_timeout(Duration::ZERO);
        assert_eq!(config.timeout(), None);
    }
}
