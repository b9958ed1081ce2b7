//! REST client wrapper for the commerce API.
//!
//! The wrapper does three things and nothing else: attach bearer-token
//! authorization, pick JSON vs multipart encoding from the payload shape,
//! and normalize failure into a uniform `{status, message}` error. Callers
//! own retry and redirect policy (e.g., redirect to login on 401); nothing
//! is retried here.

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use url::Url;

/// Maximum number of body characters carried into an error message.
const ERROR_BODY_LIMIT: usize = 200;

/// Errors produced by the commerce API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never completed (DNS, connection refusal, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    /// A 2xx body could not be decoded into the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The path could not be joined onto the base URL.
    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// HTTP status carried by the error, if the server answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the failure is an authentication problem the caller should
    /// answer with a login redirect.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED.as_u16())
    }
}

/// Request payload, selecting the wire encoding.
pub enum RequestBody {
    /// No body.
    Empty,
    /// JSON-encoded body.
    Json(Value),
    /// Multipart form body (file uploads).
    Multipart(reqwest::multipart::Form),
}

/// Decoded 2xx response body.
#[derive(Debug)]
pub enum ApiBody {
    /// Body parsed as JSON.
    Json(Value),
    /// Non-JSON body returned verbatim.
    Text(String),
    /// Empty body (e.g., 204 No Content).
    Empty,
}

impl ApiBody {
    /// The JSON value, or `Null` for empty/non-JSON bodies.
    #[must_use]
    pub fn into_json(self) -> Value {
        match self {
            Self::Json(value) => value,
            Self::Text(_) | Self::Empty => Value::Null,
        }
    }
}

/// Client for the commerce REST API.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new client against the given base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL does not parse.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        // A trailing slash changes Url::join semantics; normalize it here.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        Ok(Self {
            client: reqwest::Client::new(),
            base_url: Url::parse(&normalized)?,
        })
    }

    /// The resolved URL for a relative API path.
    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Issue a request and normalize the outcome.
    ///
    /// 2xx resolves to a decoded [`ApiBody`]; any other status becomes
    /// [`ApiError::Status`] with a best-effort message pulled from the
    /// response body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] when the request never completes and
    /// [`ApiError::Status`] for non-2xx answers.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        token: Option<&str>,
    ) -> Result<ApiBody, ApiError> {
        let url = self.endpoint(path)?;
        self.execute(method, url, body, token).await
    }

    async fn execute(
        &self,
        method: Method,
        url: Url,
        body: RequestBody,
        token: Option<&str>,
    ) -> Result<ApiBody, ApiError> {
        let mut builder = self.client.request(method, url);

        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        builder = match body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(form) => builder.multipart(form),
        };

        let response = builder.send().await?;
        let status = response.status();
        // Body first, status second: failed bodies are still the best
        // diagnostic we get from this API.
        let text = response.text().await.unwrap_or_default();

        if !status.is_success() {
            let message = extract_message(status, &text);
            tracing::debug!(status = %status, message = %message, "commerce API error");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        if text.trim().is_empty() {
            return Ok(ApiBody::Empty);
        }

        match serde_json::from_str::<Value>(&text) {
            Ok(value) => Ok(ApiBody::Json(value)),
            Err(_) => Ok(ApiBody::Text(text)),
        }
    }

    /// GET a JSON resource and deserialize it.
    ///
    /// # Errors
    ///
    /// Fails on transport errors, non-2xx statuses, or a body that does not
    /// match `T`.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        let body = self
            .request(Method::GET, path, RequestBody::Empty, token)
            .await?;
        Ok(serde_json::from_value(body.into_json())?)
    }

    /// GET a paginated resource, threading `page`/`pageSize` (and an
    /// optional `search` filter) through the query string.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::get_json`].
    pub async fn get_paged<T: DeserializeOwned>(
        &self,
        path: &str,
        page: u32,
        page_size: u32,
        search: Option<&str>,
        token: Option<&str>,
    ) -> Result<super::types::Paged<T>, ApiError> {
        let mut url = self.endpoint(path)?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("pageSize", &page_size.to_string());
        if let Some(search) = search.filter(|s| !s.trim().is_empty()) {
            url.query_pairs_mut().append_pair("search", search);
        }
        let body = self
            .execute(Method::GET, url, RequestBody::Empty, token)
            .await?;
        Ok(serde_json::from_value(body.into_json())?)
    }

    /// POST a JSON payload and deserialize the response.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::get_json`].
    pub async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        payload: Value,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        let body = self
            .request(Method::POST, path, RequestBody::Json(payload), token)
            .await?;
        Ok(serde_json::from_value(body.into_json())?)
    }

    /// POST a JSON payload, ignoring the response body.
    ///
    /// # Errors
    ///
    /// Fails on transport errors or non-2xx statuses.
    pub async fn post(
        &self,
        path: &str,
        payload: Value,
        token: Option<&str>,
    ) -> Result<(), ApiError> {
        self.request(Method::POST, path, RequestBody::Json(payload), token)
            .await?;
        Ok(())
    }

    /// PUT a JSON payload, ignoring the response body.
    ///
    /// # Errors
    ///
    /// Fails on transport errors or non-2xx statuses.
    pub async fn put(
        &self,
        path: &str,
        payload: Value,
        token: Option<&str>,
    ) -> Result<(), ApiError> {
        self.request(Method::PUT, path, RequestBody::Json(payload), token)
            .await?;
        Ok(())
    }
}

/// Pull a human-readable message out of an error response body.
///
/// Tries the JSON fields this API is known to use (both casings), then the
/// raw text truncated, then the status line itself.
fn extract_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["message", "Message", "error", "Error", "title", "Title"] {
            if let Some(message) = value.get(key).and_then(Value::as_str)
                && !message.is_empty()
            {
                return message.to_string();
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!(
            "HTTP {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("error")
        )
    } else {
        trimmed.chars().take(ERROR_BODY_LIMIT).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn extract_message_prefers_json_fields() {
        let body = r#"{"message":"Out of stock"}"#;
        assert_eq!(
            extract_message(StatusCode::CONFLICT, body),
            "Out of stock"
        );

        let pascal = r#"{"Message":"Not found"}"#;
        assert_eq!(
            extract_message(StatusCode::NOT_FOUND, pascal),
            "Not found"
        );
    }

    #[test]
    fn extract_message_falls_back_to_text() {
        assert_eq!(
            extract_message(StatusCode::BAD_GATEWAY, "upstream exploded"),
            "upstream exploded"
        );
    }

    #[test]
    fn extract_message_falls_back_to_status_line() {
        assert_eq!(
            extract_message(StatusCode::SERVICE_UNAVAILABLE, "  "),
            "HTTP 503 Service Unavailable"
        );
    }

    #[test]
    fn extract_message_truncates_long_bodies() {
        let long = "x".repeat(1000);
        assert_eq!(
            extract_message(StatusCode::INTERNAL_SERVER_ERROR, &long).len(),
            ERROR_BODY_LIMIT
        );
    }

    #[test]
    fn endpoint_joins_relative_paths() {
        let client = ApiClient::new("https://api.example.com/v1").unwrap();
        let url = client.endpoint("/Category").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1/Category");
    }

    #[test]
    fn base_url_must_parse() {
        assert!(ApiClient::new("not a url").is_err());
    }

    #[tokio::test]
    async fn multipart_body_is_encoded_and_sent() {
        // Nothing listens on port 1, so the request must get as far as the
        // transport with the multipart encoding applied and fail there.
        let client = ApiClient::new("http://127.0.0.1:1").unwrap();
        let form = reqwest::multipart::Form::new().text("name", "kettle");
        let err = client
            .request(Method::POST, "Product", RequestBody::Multipart(form), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
