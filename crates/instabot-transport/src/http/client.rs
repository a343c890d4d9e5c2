//! reqwest-backed [`ApiCaller`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Client, ClientBuilder, Url};
use tracing::{debug, trace};

use instabot_core::{ApiCaller, ApiRequest, ApiResponse, Method, TransportError, TransportResult};

const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// [`ApiCaller`] that sends every request with a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpApiCaller {
    client: Client,
}

impl HttpApiCaller {
    /// Creates a caller whose requests time out after `timeout`, or never
    /// when `None`.
    pub fn new(timeout: Option<Duration>) -> TransportResult<Self> {
        let mut builder = ClientBuilder::new();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::InvalidRequest(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Wraps an existing `reqwest::Client` (custom proxy, TLS, pool, …).
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    fn build_url(base_url: &str, request: &ApiRequest) -> TransportResult<Url> {
        let joined = format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            request.path.trim_start_matches('/')
        );
        let mut url = Url::parse(&joined)
            .map_err(|e| TransportError::InvalidRequest(format!("invalid URL {joined}: {e}")))?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }
        Ok(url)
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_builder() {
        TransportError::InvalidRequest(err.to_string())
    } else {
        TransportError::Io(err.to_string())
    }
}

#[async_trait]
impl ApiCaller for HttpApiCaller {
    async fn call(&self, base_url: &str, request: ApiRequest) -> TransportResult<ApiResponse> {
        let url = Self::build_url(base_url, &request)?;

        // The query carries the access token, so only the path is logged.
        debug!(method = %request.method, path = %request.path, "Sending API request");

        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), url);

        if let Some(body) = &request.body {
            trace!(body = %body, "API request body");
            let bytes = serde_json::to_vec(body)
                .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
            builder = builder
                .header(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))
                .body(bytes);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(map_reqwest_error)?;

        debug!(path = %request.path, status = status, "API response received");
        trace!(body = %String::from_utf8_lossy(&body), "API response body");

        Ok(ApiResponse::new(status, body.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_joins_path_and_query() {
        let request = ApiRequest::get("/v11.0/me/messenger_profile")
            .query("fields", "ice_breakers")
            .query("platform", "instagram")
            .query("access_token", "tok");

        let url = HttpApiCaller::build_url("https://graph.facebook.com/", &request).unwrap();
        assert_eq!(
            url.as_str(),
            "https://graph.facebook.com/v11.0/me/messenger_profile?fields=ice_breakers&platform=instagram&access_token=tok"
        );
    }

    #[test]
    fn test_build_url_keeps_base_path() {
        let request = ApiRequest::get("/v11.0/123");
        let url = HttpApiCaller::build_url("http://localhost:8080/graph", &request).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/graph/v11.0/123");
    }

    #[test]
    fn test_build_url_rejects_garbage_base() {
        let request = ApiRequest::get("/v11.0/123");
        let err = HttpApiCaller::build_url("not a url", &request).unwrap_err();
        assert!(matches!(err, TransportError::InvalidRequest(_)));
    }

    #[test]
    fn test_method_mapping() {
        assert_eq!(to_reqwest_method(Method::Get), reqwest::Method::GET);
        assert_eq!(to_reqwest_method(Method::Delete), reqwest::Method::DELETE);
    }

    #[tokio::test]
    async fn test_new_builds_client() {
        assert!(HttpApiCaller::new(Some(Duration::from_secs(5))).is_ok());
        assert!(HttpApiCaller::new(None).is_ok());
    }
}
