//! Backend API surface of the translation service
//!
//! The controller only talks to the service through [`TranslatorApi`], so tests can
//! swap in a scripted implementation. [`HttpApi`] is the reqwest-backed one.
//!
//! | Operation      | Request                                   | Success body                  |
//! |----------------|-------------------------------------------|-------------------------------|
//! | save config    | `POST /api/config` JSON                   | `{}`                          |
//! | list models    | `GET /api/models`                         | `{models: [{id}]}`            |
//! | upload         | `POST /upload` multipart                  | `{filename, message?}`        |
//! | history        | `GET /api/history?limit=&offset=`         | `{total, history: [...]}`     |
//! | download       | `GET /download/:filename`                 | file bytes                    |
//!
//! Failures carry `{error: string}` when the server has something to say.

pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

pub use http::HttpApi;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Non-2xx response. `message` is the body's `error` field when present.
    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or("no error details"))]
    Status { status: u16, message: Option<String> },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Server-supplied message of an HTTP error, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// Body of `POST /api/config`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigPayload {
    pub url: String,
    pub key: String,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModelDescriptor {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ModelsResponse {
    #[serde(default)]
    pub models: Vec<ModelDescriptor>,
}

/// Multipart fields of `POST /upload`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPayload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub api_url: String,
    pub api_key: String,
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadResponse {
    pub filename: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HistoryRecord {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub file_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub original_text: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub translated_text: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub translation_time: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(deserialize_with = "bool_or_int")]
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HistoryPage {
    pub total: u64,
    #[serde(default)]
    pub history: Vec<HistoryRecord>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// SQLite-backed services report booleans as 0/1.
fn bool_or_int<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(n) => n != 0,
    })
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Extract the `error` field from a JSON error body.
pub fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.trim().is_empty())
}

/// Backend capability used by the controller
#[async_trait]
pub trait TranslatorApi: Send + Sync {
    async fn save_config(&self, payload: &ConfigPayload) -> Result<(), ApiError>;

    async fn list_models(&self) -> Result<Vec<ModelDescriptor>, ApiError>;

    async fn upload(&self, payload: UploadPayload) -> Result<UploadResponse, ApiError>;

    async fn history(&self, limit: u32, offset: u64) -> Result<HistoryPage, ApiError>;

    async fn download(&self, filename: &str) -> Result<Vec<u8>, ApiError>;
}

/// Where submitted feedback goes. The service has no feedback endpoint.
pub trait FeedbackSink: Send + Sync {
    fn submit(&self, text: &str) -> Result<(), ApiError>;
}

/// Accepts feedback without sending it anywhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnwiredFeedback;

impl FeedbackSink for UnwiredFeedback {
    fn submit(&self, text: &str) -> Result<(), ApiError> {
        tracing::debug!(chars = text.chars().count(), "feedback accepted (no backend endpoint)");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_payload_omits_missing_model() {
        let payload = ConfigPayload {
            url: "http://x".to_string(),
            key: "k".to_string(),
            prompt: "p".to_string(),
            model: None,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json, serde_json::json!({"url": "http://x", "key": "k", "prompt": "p"}));
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(r#"{"error": "只支持Excel文件"}"#).as_deref(),
            Some("只支持Excel文件")
        );
        assert_eq!(error_message(r#"{"error": ""}"#), None);
        assert_eq!(error_message("<html>502 Bad Gateway</html>"), None);
        assert_eq!(error_message(r#"{"detail": "x"}"#), None);
    }

    #[test]
    fn test_history_record_accepts_sqlite_shapes() {
        let json = r#"{
            "total": 1,
            "history": [{
                "id": 7,
                "file_name": "a.xlsx",
                "original_text": "hello",
                "translated_text": null,
                "translation_time": "2024-03-01T10:20:30",
                "model": null,
                "success": 0
            }]
        }"#;
        let page: HistoryPage = serde_json::from_str(json).unwrap();
        let record = &page.history[0];
        assert_eq!(record.id, 7);
        assert_eq!(record.translated_text, "");
        assert_eq!(record.model, None);
        assert!(!record.success);
    }

    #[test]
    fn test_status_error_display() {
        let with_message = ApiError::Status {
            status: 400,
            message: Some("没有选择文件".to_string()),
        };
        assert_eq!(with_message.to_string(), "HTTP 400: 没有选择文件");
        assert_eq!(with_message.server_message(), Some("没有选择文件"));

        let bare = ApiError::Status {
            status: 502,
            message: None,
        };
        assert_eq!(bare.to_string(), "HTTP 502: no error details");
        assert_eq!(ApiError::Transport("refused".into()).server_message(), None);
    }
}
