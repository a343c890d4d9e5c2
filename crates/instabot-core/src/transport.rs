//! The transport seam between the client and an HTTP stack.
//!
//! The instabot `Client` builds an [`ApiRequest`] for
//! every API operation and hands it to an [`ApiCaller`]. The caller only moves
//! bytes; URL composition stops at `base_url + path`, and status handling
//! and body decoding stay with the client.
//!
//! | Implementation | Crate |
//! |----------------|-------|
//! | `HttpApiCaller` (reqwest) | `instabot-transport` (feature `http-client`) |
//! | test doubles | any crate, via the trait |

use async_trait::async_trait;
use serde_json::Value;

use crate::error::TransportResult;

/// HTTP method of an API request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Returns the method name as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single outbound API request.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the endpoint base, e.g. `/v11.0/me/messages`.
    pub path: String,
    /// Query parameters, in the order they will be encoded.
    pub query: Vec<(String, String)>,
    /// JSON body, if any.
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Creates a request with no query and no body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::Post, path).body(body)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Appends a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Sets the JSON body.
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Returns the value of the first query parameter named `key`.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Raw HTTP response as seen by the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        self.status / 100 == 2
    }

    /// Returns `true` if the body holds nothing but whitespace.
    pub fn is_empty(&self) -> bool {
        self.body.iter().all(u8::is_ascii_whitespace)
    }
}

/// Transport-specific API call mechanism.
///
/// Implementations send `request` to `base_url` joined with `request.path`,
/// encode `request.query` into the query string and, when a body is present,
/// send it as `application/json; charset=UTF-8`.
///
/// Any HTTP status is a successful call at this layer; only failures to get
/// a response at all are reported as errors.
#[async_trait]
pub trait ApiCaller: Send + Sync {
    async fn call(&self, base_url: &str, request: ApiRequest) -> TransportResult<ApiResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_builder() {
        let request = ApiRequest::post("/v11.0/me/messages", json!({"a": 1}))
            .query("platform", "instagram")
            .query("access_token", "token");

        assert_eq!(request.method, Method::Post);
        assert_eq!(request.path, "/v11.0/me/messages");
        assert_eq!(request.query_value("platform"), Some("instagram"));
        assert_eq!(request.query_value("access_token"), Some("token"));
        assert_eq!(request.query_value("fields"), None);
        assert_eq!(request.body, Some(json!({"a": 1})));
    }

    #[test]
    fn test_response_status() {
        assert!(ApiResponse::new(200, "{}").is_success());
        assert!(ApiResponse::new(204, "").is_success());
        assert!(!ApiResponse::new(400, "{}").is_success());
        assert!(!ApiResponse::new(302, "").is_success());

        assert!(ApiResponse::new(200, " \n").is_empty());
        assert!(!ApiResponse::new(200, "{}").is_empty());
    }

    struct StaticCaller;

    #[async_trait]
    impl ApiCaller for StaticCaller {
        async fn call(&self, base_url: &str, request: ApiRequest) -> TransportResult<ApiResponse> {
            Ok(ApiResponse::new(
                200,
                format!("{} {}{}", request.method, base_url, request.path),
            ))
        }
    }

    #[test]
    fn test_caller_object_safety() {
        let caller: Box<dyn ApiCaller> = Box::new(StaticCaller);
        let response =
            tokio_test::block_on(caller.call("https://graph.facebook.com", ApiRequest::get("/me")))
                .unwrap();
        assert_eq!(response.body, b"GET https://graph.facebook.com/me");
    }
}
