//! Template elements: generic (carousel cards) and product.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::button::{Button, ButtonType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateType {
    Generic,
    Product,
}

impl TemplateType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Product => "product",
        }
    }
}

impl fmt::Display for TemplateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action taken when the element itself is tapped. Always a URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultAction {
    #[serde(rename = "type")]
    pub action_type: ButtonType,
    pub url: String,
}

impl DefaultAction {
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            action_type: ButtonType::WebUrl,
            url: url.into(),
        }
    }
}

/// One card of a generic template. Empty optional parts are omitted.
///
/// ```rust,ignore
/// use instabot::{Button, GenericTemplateElement};
///
/// let card = GenericTemplateElement::new("Sneakers")
///     .subtitle("New arrivals")
///     .image_url("https://example.com/sneakers.png")
///     .button(Button::url("Shop", "https://example.com/shop"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericTemplateElement {
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub subtitle: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_action: Option<DefaultAction>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<Button>,
}

impl GenericTemplateElement {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = subtitle.into();
        self
    }

    pub fn image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }

    pub fn default_action(mut self, url: impl Into<String>) -> Self {
        self.default_action = Some(DefaultAction::url(url));
        self
    }

    pub fn button(mut self, button: Button) -> Self {
        self.buttons.push(button);
        self
    }

    pub fn buttons(mut self, buttons: impl IntoIterator<Item = Button>) -> Self {
        self.buttons.extend(buttons);
        self
    }
}

/// A product from the connected catalog, referenced by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductTemplateElement {
    #[serde(rename = "id")]
    pub product_id: String,
}

impl ProductTemplateElement {
    pub fn new(product_id: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
        }
    }
}
