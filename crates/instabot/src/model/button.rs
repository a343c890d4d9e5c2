//! Buttons attached to template elements.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Button type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonType {
    WebUrl,
    Postback,
    PhoneNumber,
    AccountLink,
    AccountUnlink,
}

impl ButtonType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WebUrl => "web_url",
            Self::Postback => "postback",
            Self::PhoneNumber => "phone_number",
            Self::AccountLink => "account_link",
            Self::AccountUnlink => "account_unlink",
        }
    }
}

impl fmt::Display for ButtonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A template button, serialized with its `type` tag.
///
/// ```rust,ignore
/// use instabot::Button;
///
/// let open = Button::url("Open", "https://example.com");
/// let call = Button::call("Call us", "+15105551234");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Button {
    /// Opens a URL in the in-app browser.
    WebUrl { title: String, url: String },
    /// Sends a postback webhook carrying `payload`.
    Postback { title: String, payload: String },
    /// Dials the phone number in `payload`.
    PhoneNumber { title: String, payload: String },
    /// Starts account linking at `url`.
    AccountLink { url: String },
    AccountUnlink,
}

impl Button {
    pub fn url(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self::WebUrl {
            title: title.into(),
            url: url.into(),
        }
    }

    pub fn postback(title: impl Into<String>, payload: impl Into<String>) -> Self {
        Self::Postback {
            title: title.into(),
            payload: payload.into(),
        }
    }

    pub fn call(title: impl Into<String>, phone_number: impl Into<String>) -> Self {
        Self::PhoneNumber {
            title: title.into(),
            payload: phone_number.into(),
        }
    }

    pub fn log_in(url: impl Into<String>) -> Self {
        Self::AccountLink { url: url.into() }
    }

    pub fn log_out() -> Self {
        Self::AccountUnlink
    }

    pub fn button_type(&self) -> ButtonType {
        match self {
            Self::WebUrl { .. } => ButtonType::WebUrl,
            Self::Postback { .. } => ButtonType::Postback,
            Self::PhoneNumber { .. } => ButtonType::PhoneNumber,
            Self::AccountLink { .. } => ButtonType::AccountLink,
            Self::AccountUnlink => ButtonType::AccountUnlink,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_button_serialize() {
        let cases = [
            (
                Button::url("title", "https://example.com"),
                json!({"type": "web_url", "title": "title", "url": "https://example.com"}),
            ),
            (
                Button::postback("title", "payload"),
                json!({"type": "postback", "title": "title", "payload": "payload"}),
            ),
            (
                Button::call("title", "+15105551234"),
                json!({"type": "phone_number", "title": "title", "payload": "+15105551234"}),
            ),
            (
                Button::log_in("https://example.com/login"),
                json!({"type": "account_link", "url": "https://example.com/login"}),
            ),
            (Button::log_out(), json!({"type": "account_unlink"})),
        ];

        for (button, expected) in cases {
            assert_eq!(serde_json::to_value(&button).unwrap(), expected);
            assert_eq!(expected["type"], button.button_type().as_str());
        }
    }
}
