//! HTTP boundary for the GitHub v4 API and raw asset downloads

use serde_json::{Value, json};
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

pub const GITHUB_GRAPHQL_ENDPOINT: &str = "https://api.github.com/graphql";

#[derive(Debug, Error)]
pub enum TransportError {
    /// Statuses worth retrying: secondary rate limits and gateway hiccups.
    #[error("transient http status {0}")]
    Transient(u16),

    #[error("unexpected http status {0}")]
    Status(u16),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    InvalidResponse(String),
}

impl TransportError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, TransportError::Transient(_) | TransportError::Network(_))
    }
}

/// Executes one GraphQL query document against the API.
///
/// The cursor is passed as the `cursorPointer` variable; queries that do not
/// paginate ignore it.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait GraphQlTransport: Send + Sync {
    async fn query(&self, query: &str, cursor: Option<String>) -> Result<Value, TransportError>;
}

/// Fetches the body of a release asset over plain HTTP.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait HttpFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, TransportError>;
}

pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl HttpTransport {
    pub fn new(token: String) -> Self {
        Self::with_endpoint(GITHUB_GRAPHQL_ENDPOINT.to_string(), token)
    }

    pub fn with_endpoint(endpoint: String, token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            token,
        }
    }
}

fn check_status(status: reqwest::StatusCode) -> Result<(), TransportError> {
    if status.is_success() {
        return Ok(());
    }
    match status.as_u16() {
        code @ (403 | 429 | 502) => Err(TransportError::Transient(code)),
        code => Err(TransportError::Status(code)),
    }
}

#[async_trait::async_trait]
impl GraphQlTransport for HttpTransport {
    async fn query(&self, query: &str, cursor: Option<String>) -> Result<Value, TransportError> {
        let request = json!({
            "query": query,
            "variables": { "cursorPointer": cursor },
        });

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .header(reqwest::header::USER_AGENT, "jdk-index")
            .json(&request)
            .send()
            .await?;

        check_status(response.status())?;

        response
            .json()
            .await
            .map_err(|e| TransportError::InvalidResponse(e.to_string()))
    }
}

pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for ReqwestFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl HttpFetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<String, TransportError> {
        let response = self.client.get(url).send().await?;
        check_status(response.status())?;
        response
            .text()
            .await
            .map_err(|e| TransportError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn query_posts_the_document_with_the_cursor_variable() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_header("authorization", "Bearer test-token")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "variables": { "cursorPointer": "abc" }
            })))
            .with_status(200)
            .with_body(r#"{"data": {"ok": true}}"#)
            .create_async()
            .await;

        let transport = HttpTransport::with_endpoint(server.url(), "test-token".to_string());
        let value = transport
            .query("query { viewer { login } }", Some("abc".to_string()))
            .await
            .expect("query succeeds");

        assert_eq!(value["data"]["ok"], true);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn secondary_rate_limit_is_reported_as_transient() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(403)
            .create_async()
            .await;

        let transport = HttpTransport::with_endpoint(server.url(), "test-token".to_string());
        let error = transport
            .query("query {}", None)
            .await
            .expect_err("403 fails");

        assert!(matches!(error, TransportError::Transient(403)));
        assert!(error.is_retryable());
    }

    #[tokio::test]
    async fn client_errors_are_not_retryable() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(401)
            .create_async()
            .await;

        let transport = HttpTransport::with_endpoint(server.url(), "bad-token".to_string());
        let error = transport
            .query("query {}", None)
            .await
            .expect_err("401 fails");

        assert!(matches!(error, TransportError::Status(401)));
        assert!(!error.is_retryable());
    }

    #[tokio::test]
    async fn fetcher_returns_the_raw_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/checksum.sha256.txt")
            .with_status(200)
            .with_body("deadbeef  OpenJDK8U-jdk_x64_linux_hotspot_8u222b10.tar.gz")
            .create_async()
            .await;

        let fetcher = ReqwestFetcher::new();
        let body = fetcher
            .fetch(&format!("{}/checksum.sha256.txt", server.url()))
            .await
            .expect("fetch succeeds");

        assert!(body.starts_with("deadbeef"));
    }
}
