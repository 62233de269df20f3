//! Wire models for the chat backend: request bodies, companion-endpoint
//! DTOs, and the payload shapes carried by named stream events.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event name of the default assistant-text channel. A frame with no
/// `event:` line at all is routed the same way.
pub const MESSAGE_EVENT: &str = "message";

/// Event name signalling the chat session has finished.
pub const CHAT_END_EVENT: &str = "chat_end";

/// Event name carrying a generated report.
pub const REPORT_EVENT: &str = "report";

/// Event name signalling report generation failed server-side.
pub const REPORT_ERROR_EVENT: &str = "report_error";

/// Body of a streaming chat request.
///
/// Serializes to the backend's camelCase JSON; unset fields are omitted.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// The user's message text.
    pub message: String,

    /// Identity of the requesting user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Chat session this message belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl ChatRequest {
    /// Create a request carrying only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            user_id: None,
            session_id: None,
        }
    }

    /// Set the user identity.
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Set the session identifier.
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

/// Role of a stored chat message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One entry of a session's chat history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatHistoryEntry {
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Body of a title-generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleRequest {
    /// Message to derive a session title from.
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Response of the title-generation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleResponse {
    pub title: String,
}

/// Payload of a [`CHAT_END_EVENT`] frame.
///
/// The backend may send a bare session id or a JSON object wrapping one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatEndPayload {
    pub session_id: Option<String>,
}

impl ChatEndPayload {
    /// Interpret a `chat_end` payload string.
    pub fn parse(data: &str) -> Self {
        if let Ok(value) = serde_json::from_str::<Value>(data) {
            if let Some(id) = value.get("sessionId").and_then(Value::as_str) {
                return Self {
                    session_id: Some(id.to_string()),
                };
            }
        }
        let data = data.trim();
        Self {
            session_id: (!data.is_empty()).then(|| data.to_string()),
        }
    }
}

/// Payload of a [`REPORT_EVENT`] frame.
///
/// The backend sends either raw markdown text or a JSON object with a
/// `markdown` or `content` field; anything unparseable falls back to the
/// raw string so report text is never lost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPayload {
    pub markdown: String,
}

impl ReportPayload {
    /// Interpret a `report` payload string.
    pub fn parse(data: &str) -> Self {
        if let Ok(value) = serde_json::from_str::<Value>(data) {
            if let Some(text) = value
                .get("markdown")
                .or_else(|| value.get("content"))
                .and_then(Value::as_str)
            {
                return Self {
                    markdown: text.to_string(),
                };
            }
        }
        Self {
            markdown: data.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_serializes_camel_case() {
        let request = ChatRequest::new("hello")
            .with_user_id("student-1")
            .with_session_id("sess-9");

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "message": "hello",
                "userId": "student-1",
                "sessionId": "sess-9",
            })
        );
    }

    #[test]
    fn test_chat_request_omits_unset_fields() {
        let json = serde_json::to_value(ChatRequest::new("hi")).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "hi" }));
    }

    #[test]
    fn test_report_payload_from_json_markdown() {
        let payload = ReportPayload::parse(r##"{"markdown":"# Done"}"##);
        assert_eq!(payload.markdown, "# Done");
    }

    #[test]
    fn test_report_payload_from_json_content() {
        let payload = ReportPayload::parse(r#"{"content":"text body"}"#);
        assert_eq!(payload.markdown, "text body");
    }

    #[test]
    fn test_report_payload_raw_fallback() {
        let payload = ReportPayload::parse("# Plain markdown\n- item");
        assert_eq!(payload.markdown, "# Plain markdown\n- item");

        // JSON without the expected fields keeps the raw string too.
        let payload = ReportPayload::parse(r#"{"status":"ok"}"#);
        assert_eq!(payload.markdown, r#"{"status":"ok"}"#);
    }

    #[test]
    fn test_chat_end_payload() {
        let payload = ChatEndPayload::parse(r#"{"sessionId":"sess-3"}"#);
        assert_eq!(payload.session_id.as_deref(), Some("sess-3"));

        let payload = ChatEndPayload::parse("sess-4");
        assert_eq!(payload.session_id.as_deref(), Some("sess-4"));

        let payload = ChatEndPayload::parse("");
        assert_eq!(payload.session_id, None);
    }
}
