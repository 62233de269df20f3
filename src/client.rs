//! Chat backend client, API trait, and error types.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use thiserror::Error;
use tracing::{debug, warn};

use crate::http::{add_extra_headers, build_http_client};
use crate::model::{ChatHistoryEntry, ChatRequest, TitleRequest, TitleResponse};
use crate::options::ClientOptions;
use crate::sse::SseResponseExt;
use crate::stream::{dispatch_stream, StreamHandlers};

const CHAT_STREAM_PATH: &str = "/api/chat/stream";
const CHAT_HEALTH_PATH: &str = "/api/chat/health";
const CHAT_HISTORY_PATH: &str = "/api/chat/history";
const CHAT_TITLE_PATH: &str = "/api/chat/title";

/// Errors that can occur while talking to the chat backend.
#[derive(Error, Debug)]
pub enum ChatError {
    /// Transport failure: connect, mid-stream read, or body decode errors.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend rejected the request with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Client surface of the chat backend.
///
/// The streaming call is the core; the remaining endpoints are thin JSON
/// wrappers the UI layer treats as black boxes. A trait seam keeps callers
/// testable against a fake backend.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Send a chat message and stream the assistant response.
    ///
    /// Frames are dispatched to `handlers` in arrival order. Exactly one of
    /// the completion or error callbacks fires last; errors are additionally
    /// returned so callers without an error handler still observe failure.
    async fn stream_chat(
        &self,
        request: ChatRequest,
        handlers: StreamHandlers<'_>,
    ) -> Result<(), ChatError>;

    /// Generate a session title from a message.
    async fn generate_title(&self, request: TitleRequest) -> Result<TitleResponse, ChatError>;

    /// Fetch the stored history of a session.
    async fn history(&self, session_id: &str) -> Result<Vec<ChatHistoryEntry>, ChatError>;

    /// Whether the backend is reachable and healthy.
    async fn health(&self) -> bool;
}

/// HTTP client for the chat backend.
pub struct ChatClient {
    options: ClientOptions,
    http: reqwest::Client,
}

impl ChatClient {
    /// Create a client from the given options.
    pub fn new(options: ClientOptions) -> Result<Self, ChatError> {
        let http = build_http_client(&options)?;
        Ok(Self { options, http })
    }

    /// The options this client was built with.
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.options.base_url.trim_end_matches('/'), path)
    }
}

/// Turn a non-success response into a `Status` error carrying the body.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ChatError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ChatError::Status { status, body })
}

#[async_trait]
impl ChatApi for ChatClient {
    async fn stream_chat(
        &self,
        mut request: ChatRequest,
        handlers: StreamHandlers<'_>,
    ) -> Result<(), ChatError> {
        if request.user_id.is_none() {
            request.user_id = self.options.user_id.clone();
        }

        let mut req = self
            .http
            .post(self.url(CHAT_STREAM_PATH))
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "text/event-stream");
        req = add_extra_headers(req, &self.options.extra_headers);

        debug!(session_id = ?request.session_id, "starting chat stream");

        let response = match req.json(&request).send().await {
            Ok(response) => response,
            Err(error) => return Err(handlers.fail(error.into())),
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "chat stream request rejected");
            return Err(handlers.fail(ChatError::Status { status, body }));
        }

        dispatch_stream(response.sse_events(), handlers).await
    }

    async fn generate_title(&self, request: TitleRequest) -> Result<TitleResponse, ChatError> {
        let mut req = self
            .http
            .post(self.url(CHAT_TITLE_PATH))
            .header(CONTENT_TYPE, "application/json");
        req = add_extra_headers(req, &self.options.extra_headers);

        let response = check_status(req.json(&request).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn history(&self, session_id: &str) -> Result<Vec<ChatHistoryEntry>, ChatError> {
        let mut req = self
            .http
            .get(self.url(&format!("{CHAT_HISTORY_PATH}/{session_id}")));
        req = add_extra_headers(req, &self.options.extra_headers);

        let response = check_status(req.send().await?).await?;
        Ok(response.json().await?)
    }

    async fn health(&self) -> bool {
        match self.http.get(self.url(CHAT_HEALTH_PATH)).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sse::SseEvent;
    use std::sync::{Arc, Mutex};
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ChatClient {
        ChatClient::new(ClientOptions::new(server.uri())).unwrap()
    }

    #[tokio::test]
    async fn test_stream_chat_dispatches_chunks_events_and_completion() {
        let server = MockServer::start().await;
        let body = "data: Hel\n\ndata: lo\n\nevent: chat_end\ndata: sess-1\n\n";
        Mock::given(method("POST"))
            .and(path("/api/chat/stream"))
            .and(header("accept", "text/event-stream"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
            .mount(&server)
            .await;

        let answer = Arc::new(Mutex::new(String::new()));
        let events: Arc<Mutex<Vec<SseEvent>>> = Default::default();
        let completed = Arc::new(Mutex::new(false));

        let chunk_sink = Arc::clone(&answer);
        let event_sink = Arc::clone(&events);
        let done = Arc::clone(&completed);
        let handlers =
            StreamHandlers::new(move |chunk: &str| chunk_sink.lock().unwrap().push_str(chunk))
                .on_event(move |event: &SseEvent| event_sink.lock().unwrap().push(event.clone()))
                .on_complete(move || *done.lock().unwrap() = true);

        client_for(&server)
            .stream_chat(ChatRequest::new("hi"), handlers)
            .await
            .unwrap();

        assert_eq!(*answer.lock().unwrap(), "Hello");
        assert_eq!(
            *events.lock().unwrap(),
            vec![SseEvent {
                name: Some("chat_end".to_string()),
                data: "sess-1".to_string(),
            }]
        );
        assert!(*completed.lock().unwrap());
    }

    #[tokio::test]
    async fn test_stream_chat_applies_default_user_identity() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat/stream"))
            .and(body_json(serde_json::json!({
                "message": "hi",
                "userId": "student-7",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_raw("", "text/event-stream"))
            .expect(1)
            .mount(&server)
            .await;

        let client =
            ChatClient::new(ClientOptions::new(server.uri()).with_user_id("student-7")).unwrap();
        client
            .stream_chat(ChatRequest::new("hi"), StreamHandlers::new(|_| {}))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_stream_chat_rejection_fires_error_handler_and_returns() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat/stream"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let seen: Arc<Mutex<Vec<String>>> = Default::default();
        let errors = Arc::clone(&seen);
        let handlers = StreamHandlers::new(|_| panic!("no chunks on rejection"))
            .on_complete(|| panic!("no completion on rejection"))
            .on_error(move |error: &ChatError| errors.lock().unwrap().push(error.to_string()));

        let result = client_for(&server)
            .stream_chat(ChatRequest::new("hi"), handlers)
            .await;

        match result {
            Err(ChatError::Status { status, body }) => {
                assert_eq!(status, reqwest::StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body, "boom");
            }
            other => panic!("expected status error, got {other:?}"),
        }
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_generate_title() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat/title"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"title": "Recursion"})),
            )
            .mount(&server)
            .await;

        let title = client_for(&server)
            .generate_title(TitleRequest {
                message: "explain recursion".to_string(),
                session_id: None,
            })
            .await
            .unwrap();
        assert_eq!(title.title, "Recursion");
    }

    #[tokio::test]
    async fn test_history() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/chat/history/sess-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"role": "user", "content": "hi"},
                {"role": "assistant", "content": "hello", "createdAt": "2025-01-01T00:00:00Z"},
            ])))
            .mount(&server)
            .await;

        let history = client_for(&server).history("sess-1").await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].content, "hello");
    }

    #[tokio::test]
    async fn test_health() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/chat/health"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        assert!(client_for(&server).health().await);

        // Unreachable backend reads as unhealthy, not as an error.
        let client = ChatClient::new(ClientOptions::new("http://127.0.0.1:9")).unwrap();
        assert!(!client.health().await);
    }
}
