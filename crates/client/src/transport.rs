//! The single request/response exchange.
//!
//! The compiler serializes `{query, variables}` into one POST body and hands
//! it to an injected [`Transport`]. Exactly one exchange per call: no retry,
//! no backoff, no timeout. Reliability policy belongs to the embedding
//! application's transport, and every failure propagates to the caller
//! unmodified.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::TransportError;

/// JSON media type set on both `Content-Type` and `Accept`.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Wire-level request body.
///
/// `variables` is always serialized, `{}` when no argument was promoted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireRequest {
    pub query: String,
    pub variables: Map<String, Value>,
}

/// One HTTP exchange as handed to the injected transport.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: &'static str,
    pub headers: [(&'static str, &'static str); 2],
    pub body: String,
}

impl HttpRequest {
    /// The POST request carrying a serialized wire request.
    #[must_use]
    pub fn post(body: String) -> Self {
        Self {
            method: "POST",
            headers: [
                ("Content-Type", JSON_MEDIA_TYPE),
                ("Accept", JSON_MEDIA_TYPE),
            ],
            body,
        }
    }
}

/// The sole I/O boundary.
///
/// Implementations perform one exchange and return the raw response body;
/// they do not interpret status codes or retry. Supplied by the embedding
/// application — an HTTP client in production, an in-process fake in tests.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        endpoint: &str,
        request: HttpRequest,
    ) -> Result<Vec<u8>, TransportError>;
}

/// Stock transport over a shared `reqwest` client.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuse an existing client (connection pool, proxy, TLS config).
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        endpoint: &str,
        request: HttpRequest,
    ) -> Result<Vec<u8>, TransportError> {
        let method = reqwest::Method::from_bytes(request.method.as_bytes())
            .map_err(TransportError::request)?;
        let mut builder = self.client.request(method, endpoint);
        for (name, value) in request.headers {
            builder = builder.header(name, value);
        }
        let response = builder
            .body(request.body)
            .send()
            .await
            .map_err(TransportError::request)?;
        let bytes = response.bytes().await.map_err(TransportError::request)?;
        Ok(bytes.to_vec())
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_request_carries_json_media_type() {
        let request = HttpRequest::post("{}".to_string());
        assert_eq!(request.method, "POST");
        assert_eq!(
            request.headers,
            [
                ("Content-Type", "application/json"),
                ("Accept", "application/json"),
            ]
        );
    }

    #[test]
    fn wire_request_serializes_with_variables_always_present() {
        let request = WireRequest {
            query: "{ hello }".to_string(),
            variables: Map::new(),
        };
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"query":"{ hello }","variables":{}}"#
        );
    }

    #[tokio::test]
    async fn http_transport_posts_body_and_returns_raw_bytes() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/graphql")
            .match_header("content-type", JSON_MEDIA_TYPE)
            .match_header("accept", JSON_MEDIA_TYPE)
            .match_body(r#"{"query":"{ hello }","variables":{}}"#)
            .with_status(200)
            .with_header("content-type", JSON_MEDIA_TYPE)
            .with_body(r#"{"data":{"hello":"Hello world!"}}"#)
            .create_async()
            .await;

        let transport = HttpTransport::new();
        let endpoint = format!("{}/graphql", server.url());
        let body = r#"{"query":"{ hello }","variables":{}}"#.to_string();
        let bytes = transport
            .send(&endpoint, HttpRequest::post(body))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(bytes, br#"{"data":{"hello":"Hello world!"}}"#);
    }

    #[tokio::test]
    async fn http_transport_passes_non_json_bodies_through() {
        // Status handling and body interpretation are not the transport's
        // business; the caller fails later when parsing the envelope.
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/graphql")
            .with_status(500)
            .with_body("upstream exploded")
            .create_async()
            .await;

        let transport = HttpTransport::new();
        let endpoint = format!("{}/graphql", server.url());
        let bytes = transport
            .send(&endpoint, HttpRequest::post("{}".to_string()))
            .await
            .unwrap();
        assert_eq!(bytes, b"upstream exploded");
    }
}
