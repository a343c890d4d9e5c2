//! Ice breakers: FAQ-style questions shown when a user opens a new
//! conversation.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceBreaker {
    #[serde(default)]
    pub question: String,
    /// Returned in the postback webhook when the question is tapped.
    #[serde(default)]
    pub payload: String,
}

impl IceBreaker {
    pub fn new(question: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            payload: payload.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ice_breaker_serialize() {
        let ib = IceBreaker::new("What are your hours?", "HOURS");
        assert_eq!(
            serde_json::to_string(&ib).unwrap(),
            r#"{"question":"What are your hours?","payload":"HOURS"}"#
        );
    }
}
