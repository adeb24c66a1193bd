//! Transport to the chat endpoint.

use crate::protocol::{ChatReply, ChatRequest};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

/// Something that answers chat turns.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Send one turn and wait for its reply.
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, BackendError>;
}

/// Chat endpoint reached over HTTP.
///
/// The client keeps a cookie store so the backend's session cookie is
/// replayed on every turn, the way a browser would.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    endpoint: String,
}

impl HttpBackend {
    /// Create a backend posting to `endpoint`.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, BackendError> {
        let client = Client::builder()
            .cookie_store(true)
            .build()
            .map_err(BackendError::Transport)?;
        Ok(Self::with_client(client, endpoint))
    }

    /// Create a backend with a preconfigured client.
    pub fn with_client(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// The endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, BackendError> {
        debug!(message = %request.message, endpoint = %self.endpoint, "sending turn");

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(BackendError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status(status));
        }

        let body = response.text().await.map_err(BackendError::Transport)?;
        serde_json::from_str(&body).map_err(BackendError::Decode)
    }
}

/// Errors that can occur while talking to the chat endpoint.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The request could not be sent or the body could not be read.
    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("HTTP error! Status: {0}")]
    Status(StatusCode),

    /// The reply body was not the expected JSON shape.
    #[error("Decode error: {0}")]
    Decode(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ReplyOption;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn backend_for(server: &MockServer) -> HttpBackend {
        HttpBackend::new(format!("{}/chatbot", server.uri())).unwrap()
    }

    #[tokio::test]
    async fn test_send_posts_json_and_decodes_reply() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chatbot"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({"message": "track"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": "Enter your tracking number",
                "options": [{"text": "Go back", "value": "reset"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reply = backend_for(&server)
            .send(&ChatRequest::text("track"))
            .await
            .unwrap();

        assert_eq!(reply.response, "Enter your tracking number");
        assert_eq!(
            reply.options,
            Some(vec![ReplyOption::new("Go back", "reset")])
        );
    }

    #[tokio::test]
    async fn test_non_success_status_is_error_regardless_of_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({"response": "looks fine"})),
            )
            .mount(&server)
            .await;

        let err = backend_for(&server)
            .send(&ChatRequest::text("hi"))
            .await
            .unwrap_err();

        assert!(matches!(err, BackendError::Status(s) if s == StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = backend_for(&server)
            .send(&ChatRequest::text("hi"))
            .await
            .unwrap_err();

        assert!(matches!(err, BackendError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        // Port 9 (discard) is not expected to have an HTTP listener.
        let backend = HttpBackend::new("http://127.0.0.1:9/chatbot").unwrap();
        let err = backend.send(&ChatRequest::text("hi")).await.unwrap_err();
        assert!(matches!(err, BackendError::Transport(_)));
    }

    #[tokio::test]
    async fn test_session_cookie_is_replayed() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(body_json(json!({"message": "find_by_pincode"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "session=abc123; Path=/")
                    .set_body_json(json!({"response": "Please enter the 6-digit pincode"})),
            )
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(header("cookie", "session=abc123"))
            .and(body_json(json!({"message": "110001"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"response": "Found 2 post offices"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let backend = backend_for(&server);
        backend
            .send(&ChatRequest::text("find_by_pincode"))
            .await
            .unwrap();
        let reply = backend.send(&ChatRequest::text("110001")).await.unwrap();
        assert_eq!(reply.response, "Found 2 post offices");
    }
}
