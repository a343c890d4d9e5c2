//! Graph API client.
//!
//! [`Client`] turns every [`InstaBot`] operation into an [`ApiRequest`],
//! hands it to an [`ApiCaller`], and decodes the [`ApiResponse`]:
//!
//! - non-2xx → [`ApiError::Platform`] with the decoded error body,
//! - 2xx with an empty body → `T::default()`,
//! - 2xx with an undecodable body → [`ApiError::Serialization`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use instabot::{Client, ClientConfig, InstaBot, Message};
//!
//! let client = Client::new(ClientConfig::new(token))?;
//! let sent = client.send_message("IGSID", &Message::text("Hello!")).await?;
//! println!("sent {}", sent.message_id);
//! ```

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{Instrument, debug, info_span, warn};

use instabot_core::{ApiCaller, ApiError, ApiRequest, ApiResponse, ApiResult, ErrorResponse};

use crate::config::ClientConfig;
use crate::model::api::{
    DeleteFieldsRequest, DeleteIceBreakersResponse, DirectMessageRequest, GetIceBreakersResponse,
    PrivateReplyRequest, SendMessageResponse, SetIceBreakersRequest, SetIceBreakersResponse,
    UserProfile,
};
use crate::model::ice_breaker::IceBreaker;
use crate::model::message::Message;
use crate::model::types::{PrivateReplyRecipient, Recipient};

const ICE_BREAKERS_FIELD: &str = "ice_breakers";
const USER_PROFILE_FIELDS: &str =
    "name,profile_pic,is_verified_user,follower_count,is_user_follow_business,is_business_follow_user";

// =============================================================================
// InstaBot
// =============================================================================

/// Operations of the Instagram Messaging API.
#[async_trait]
pub trait InstaBot: Send + Sync {
    /// Sends `message` to the user with Instagram-scoped id `recipient_id`.
    async fn send_message(
        &self,
        recipient_id: &str,
        message: &Message,
    ) -> ApiResult<SendMessageResponse>;

    /// Privately replies to the author of comment `comment_id`.
    async fn send_private_reply(
        &self,
        comment_id: &str,
        message: &Message,
    ) -> ApiResult<SendMessageResponse>;

    /// Replaces the ice breakers shown on new conversations.
    async fn set_ice_breakers(
        &self,
        ice_breakers: &[IceBreaker],
    ) -> ApiResult<SetIceBreakersResponse>;

    async fn get_ice_breakers(&self) -> ApiResult<GetIceBreakersResponse>;

    async fn delete_ice_breakers(&self) -> ApiResult<DeleteIceBreakersResponse>;

    async fn get_user_profile(&self, ig_user_id: &str) -> ApiResult<UserProfile>;
}

// =============================================================================
// Client
// =============================================================================

/// [`InstaBot`] implementation over any [`ApiCaller`].
///
/// Cheap to clone; clones share the configuration and the caller.
#[derive(Clone)]
pub struct Client {
    config: Arc<ClientConfig>,
    caller: Arc<dyn ApiCaller>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a client backed by the reqwest transport.
    #[cfg(feature = "http-client")]
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        let caller = instabot_transport::HttpApiCaller::new(config.timeout())?;
        Self::with_caller(config, Arc::new(caller))
    }

    /// Creates a client that sends requests through `caller`.
    pub fn with_caller(config: ClientConfig, caller: Arc<dyn ApiCaller>) -> ApiResult<Self> {
        config.validate()?;
        debug!(
            endpoint_base = %config.endpoint_base,
            api_version = %config.api_version,
            "Instagram client created"
        );
        Ok(Self {
            config: Arc::new(config),
            caller,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Appends the access token, sends the request and decodes the response.
    async fn call<T>(&self, request: ApiRequest) -> ApiResult<T>
    where
        T: DeserializeOwned + Default,
    {
        let method = request.method;
        let path = request.path.clone();
        let request = request.query("access_token", self.config.access_token.as_str());

        let span = info_span!("api_call", %method, path = %path);

        async move {
            let response = self
                .caller
                .call(self.config.base_url(), request)
                .await
                .map_err(ApiError::from)?;
            decode_response(response)
        }
        .instrument(span)
        .await
        .inspect_err(|e| {
            warn!(%method, path = %path, error = %e, "Instagram API call failed");
        })
    }
}

fn decode_response<T>(response: ApiResponse) -> ApiResult<T>
where
    T: DeserializeOwned + Default,
{
    if !response.is_success() {
        return Err(ErrorResponse::from_body(response.status, &response.body).into());
    }
    if response.is_empty() {
        return Ok(T::default());
    }
    serde_json::from_slice(&response.body).map_err(ApiError::from)
}

#[async_trait]
impl InstaBot for Client {
    async fn send_message(
        &self,
        recipient_id: &str,
        message: &Message,
    ) -> ApiResult<SendMessageResponse> {
        debug!(message_type = %message.message_type(), "send_message");
        let body = serde_json::to_value(DirectMessageRequest {
            recipient: Recipient::new(recipient_id),
            message,
        })?;
        self.call(ApiRequest::post(self.config.messages_path(), body))
            .await
    }

    async fn send_private_reply(
        &self,
        comment_id: &str,
        message: &Message,
    ) -> ApiResult<SendMessageResponse> {
        debug!(message_type = %message.message_type(), "send_private_reply");
        let body = serde_json::to_value(PrivateReplyRequest {
            recipient: PrivateReplyRecipient::new(comment_id),
            message,
        })?;
        self.call(ApiRequest::post(self.config.messages_path(), body))
            .await
    }

    async fn set_ice_breakers(
        &self,
        ice_breakers: &[IceBreaker],
    ) -> ApiResult<SetIceBreakersResponse> {
        debug!(count = ice_breakers.len(), "set_ice_breakers");
        let body = serde_json::to_value(SetIceBreakersRequest {
            platform: &self.config.platform,
            ice_breakers,
        })?;
        self.call(ApiRequest::post(self.config.messenger_profile_path(), body))
            .await
    }

    async fn get_ice_breakers(&self) -> ApiResult<GetIceBreakersResponse> {
        debug!("get_ice_breakers");
        let request = ApiRequest::get(self.config.messenger_profile_path())
            .query("fields", ICE_BREAKERS_FIELD)
            .query("platform", self.config.platform.as_str());
        self.call(request).await
    }

    async fn delete_ice_breakers(&self) -> ApiResult<DeleteIceBreakersResponse> {
        debug!("delete_ice_breakers");
        let body = serde_json::to_value(DeleteFieldsRequest {
            fields: &[ICE_BREAKERS_FIELD],
        })?;
        let request = ApiRequest::delete(self.config.messenger_profile_path())
            .query("platform", self.config.platform.as_str())
            .body(body);
        self.call(request).await
    }

    async fn get_user_profile(&self, ig_user_id: &str) -> ApiResult<UserProfile> {
        debug!("get_user_profile");
        let request = ApiRequest::get(self.config.user_profile_path(ig_user_id))
            .query("fields", USER_PROFILE_FIELDS);
        self.call(request).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use instabot_core::{Method, TransportError, TransportResult};

    use super::*;
    use crate::model::quick_reply::QuickReply;

    /// Records every request and answers with a canned response.
    struct MockCaller {
        response: TransportResult<ApiResponse>,
        requests: Mutex<Vec<(String, ApiRequest)>>,
    }

    impl MockCaller {
        fn new(status: u16, body: &str) -> Arc<Self> {
            Arc::new(Self {
                response: Ok(ApiResponse::new(status, body)),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn failing(err: TransportError) -> Arc<Self> {
            Arc::new(Self {
                response: Err(err),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn last(&self) -> (String, ApiRequest) {
            self.requests.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl ApiCaller for MockCaller {
        async fn call(&self, base_url: &str, request: ApiRequest) -> TransportResult<ApiResponse> {
            self.requests
                .lock()
                .unwrap()
                .push((base_url.to_string(), request));
            self.response.clone()
        }
    }

    fn client(caller: Arc<MockCaller>) -> Client {
        Client::with_caller(ClientConfig::new("token"), caller).unwrap()
    }

    #[test]
    fn test_with_caller_validates_config() {
        let err = Client::with_caller(ClientConfig::default(), MockCaller::new(200, "")).unwrap_err();
        assert!(matches!(err, ApiError::MissingAccessToken));
    }

    #[test]
    fn test_send_message() {
        let caller = MockCaller::new(200, r#"{"recipient_id":"123","message_id":"mid.1"}"#);
        let client = client(caller.clone());

        let message = Message::text_with_quick_replies("pick", [QuickReply::text("Red", "RED")]);
        let response = tokio_test::block_on(client.send_message("123", &message)).unwrap();
        assert_eq!(response.recipient_id, "123");
        assert_eq!(response.message_id, "mid.1");

        let (base, request) = caller.last();
        assert_eq!(base, "https://graph.facebook.com");
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.path, "/v11.0/me/messages");
        assert_eq!(
            request.body,
            Some(json!({
                "recipient": {"id": "123"},
                "message": {
                    "text": "pick",
                    "quick_replies": [{"content_type": "text", "title": "Red", "payload": "RED"}]
                }
            }))
        );
        assert_eq!(
            request.query,
            vec![("access_token".to_string(), "token".to_string())]
        );
    }

    #[test]
    fn test_send_private_reply() {
        let caller = MockCaller::new(200, r#"{"recipient_id":"u","message_id":"m"}"#);
        let client = client(caller.clone());

        tokio_test::block_on(client.send_private_reply("C1", &Message::text("thanks"))).unwrap();

        let (_, request) = caller.last();
        assert_eq!(request.path, "/v11.0/me/messages");
        assert_eq!(
            request.body,
            Some(json!({"recipient": {"comment_id": "C1"}, "message": {"text": "thanks"}}))
        );
    }

    #[test]
    fn test_set_ice_breakers() {
        let caller = MockCaller::new(200, r#"{"result":"success"}"#);
        let client = client(caller.clone());

        let response = tokio_test::block_on(
            client.set_ice_breakers(&[IceBreaker::new("Hours?", "HOURS")]),
        )
        .unwrap();
        assert_eq!(response.result, "success");

        let (_, request) = caller.last();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.path, "/v11.0/me/messenger_profile");
        assert_eq!(
            request.body,
            Some(json!({
                "platform": "instagram",
                "ice_breakers": [{"question": "Hours?", "payload": "HOURS"}]
            }))
        );
    }

    #[test]
    fn test_get_ice_breakers() {
        let caller = MockCaller::new(
            200,
            r#"{"data":[{"ice_breakers":[{"question":"Q","payload":"P"}]}]}"#,
        );
        let client = client(caller.clone());

        let response = tokio_test::block_on(client.get_ice_breakers()).unwrap();
        assert_eq!(response.ice_breakers().count(), 1);

        let (_, request) = caller.last();
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.body, None);
        // Operation parameters first, token last.
        let keys: Vec<_> = request.query.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["fields", "platform", "access_token"]);
        assert_eq!(request.query_value("fields"), Some("ice_breakers"));
        assert_eq!(request.query_value("platform"), Some("instagram"));
    }

    #[test]
    fn test_delete_ice_breakers() {
        let caller = MockCaller::new(200, r#"{"result":"success"}"#);
        let client = client(caller.clone());

        let response = tokio_test::block_on(client.delete_ice_breakers()).unwrap();
        assert_eq!(response.result, "success");

        let (_, request) = caller.last();
        assert_eq!(request.method, Method::Delete);
        assert_eq!(request.query_value("platform"), Some("instagram"));
        assert_eq!(request.body, Some(json!({"fields": ["ice_breakers"]})));
    }

    #[test]
    fn test_get_user_profile() {
        let caller = MockCaller::new(
            200,
            r#"{"id":"42","name":"Peter","profile_pic":"https://example.com/p.png","is_verified_user":true}"#,
        );
        let client = client(caller.clone());

        let profile = tokio_test::block_on(client.get_user_profile("42")).unwrap();
        assert_eq!(profile.id, "42");
        assert_eq!(profile.name, "Peter");
        assert!(profile.is_verified_user);

        let (_, request) = caller.last();
        assert_eq!(request.path, "/v11.0/42");
        assert_eq!(request.query_value("fields"), Some(USER_PROFILE_FIELDS));
    }

    #[test]
    fn test_empty_success_body_is_default() {
        let client = client(MockCaller::new(200, ""));
        let response = tokio_test::block_on(client.delete_ice_breakers()).unwrap();
        assert_eq!(response, DeleteIceBreakersResponse::default());
    }

    #[test]
    fn test_undecodable_success_body() {
        let client = client(MockCaller::new(200, "<html>"));
        let err = tokio_test::block_on(client.get_ice_breakers()).unwrap_err();
        assert!(matches!(err, ApiError::Serialization(_)));
    }

    #[test]
    fn test_platform_error() {
        let client = client(MockCaller::new(
            400,
            r#"{"error":{"message":"Invalid OAuth access token.","type":"OAuthException","code":190,"fbtrace_id":"X"}}"#,
        ));
        let err = tokio_test::block_on(client.send_message("1", &Message::sticker())).unwrap_err();
        match err {
            ApiError::Platform(response) => {
                assert_eq!(response.status_code, 400);
                assert_eq!(response.error.code, 190);
                assert_eq!(response.error.error_type, "OAuthException");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_platform_error_without_body() {
        let client = client(MockCaller::new(503, ""));
        let err = tokio_test::block_on(client.get_user_profile("1")).unwrap_err();
        match err {
            ApiError::Platform(response) => assert_eq!(response.status_code, 503),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_transport_error() {
        let client = client(MockCaller::failing(TransportError::Timeout));
        let err = tokio_test::block_on(client.get_ice_breakers()).unwrap_err();
        assert!(matches!(err, ApiError::Transport(TransportError::Timeout)));
    }

    #[test]
    fn test_debug_hides_token() {
        let client = client(MockCaller::new(200, ""));
        assert!(!format!("{client:?}").contains("token\""));
    }
}
