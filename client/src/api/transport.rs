//! HTTP transport seam.
//!
//! [`ValidationClient`](super::ValidationClient) talks to the server only
//! through [`Transport`], so the request/poll logic can be driven by a
//! scripted transport in tests. [`HttpTransport`] is the reqwest-backed one.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;

use crate::error::{ClientError, ClientResult};

/// Status code and raw body of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Only 200 counts as success for this API.
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Parse the body as JSON.
    pub fn json(&self) -> ClientResult<Value> {
        serde_json::from_str(&self.body).map_err(|_| ClientError::InvalidJson {
            status: self.status,
            body: self.body.clone(),
        })
    }
}

/// Minimal HTTP surface the client needs.
///
/// Implementations return every status code as a response; only failures to
/// get a response at all are errors.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST an already-encoded JSON body.
    async fn post_json(&self, url: &str, body: Vec<u8>) -> ClientResult<HttpResponse>;

    /// GET a URL.
    async fn get(&self, url: &str) -> ClientResult<HttpResponse>;
}

/// reqwest-backed transport.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured reqwest client (proxies, timeouts, ...).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, url: &str, body: Vec<u8>) -> ClientResult<HttpResponse> {
        tracing::debug!(url, bytes = body.len(), "POST");
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        read_response(response).await
    }

    async fn get(&self, url: &str) -> ClientResult<HttpResponse> {
        tracing::debug!(url, "GET");
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        read_response(response).await
    }
}

async fn read_response(response: reqwest::Response) -> ClientResult<HttpResponse> {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .map_err(|e| ClientError::Transport(e.to_string()))?;

    Ok(HttpResponse { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    #[test]
    fn test_non_json_body() {
        let response = HttpResponse::new(502, "<html>Bad Gateway</html>");
        let err = response.json().unwrap_err();
        assert!(matches!(err, ClientError::InvalidJson { status: 502, .. }));
        assert!(err.to_string().contains("Bad Gateway"));
    }

    #[tokio::test]
    async fn test_post_sends_json_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/validate")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({ "rows": [] })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": "abc123"}"#)
            .create_async()
            .await;

        let transport = HttpTransport::new();
        let url = format!("{}/v1/validate", server.url());
        let response = transport
            .post_json(&url, serde_json::to_vec(&json!({ "rows": [] })).unwrap())
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(response.is_ok());
        assert_eq!(response.json().unwrap()["id"], "abc123");
    }

    #[tokio::test]
    async fn test_get_returns_error_statuses_as_responses() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/validate/missing")
            .with_status(404)
            .with_body(r#"{"detail": "Task not found"}"#)
            .create_async()
            .await;

        let transport = HttpTransport::new();
        let response = transport
            .get(&format!("{}/v1/validate/missing", server.url()))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.status, 404);
        assert!(!response.is_ok());
    }

    #[tokio::test]
    async fn test_connection_failure_is_transport_error() {
        let transport = HttpTransport::new();
        let err = transport.get("http://127.0.0.1:1/health").await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }
}
