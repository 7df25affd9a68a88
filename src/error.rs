use serde_json::Value;
use thiserror::Error;

/// Message returned when a field batch is requested without a page.
pub const PAGE_ID_REQUIRED: &str = "pageId es requerido";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Precondition failure. Raised before any request is issued.
    #[error("{0}")]
    Validation(String),

    /// The backend answered with a non-2xx status.
    #[error("Request failed with status code {status}")]
    Status { status: u16, body: Option<Value> },

    /// Connection, timeout or any other client-side failure.
    #[error("{0}")]
    Transport(String),

    #[error("request cancelled")]
    Cancelled,

    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response body was empty")]
    EmptyResponse,

    /// A reply arrived but did not have any shape the client understands.
    #[error("{0}")]
    UnexpectedResponse(String),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }

    /// Detail text carried by a structured error body.
    ///
    /// The backend reports `{ "error": ..., "detalle": ... }` from its own views
    /// and `{ "detail": ... }` from framework-level rejections. Both parts are
    /// joined when present. Plain-text bodies yield `None`.
    pub fn detail_text(&self) -> Option<String> {
        let ApiError::Status { body: Some(Value::Object(map)), .. } = self else {
            return None;
        };

        let pick = |key: &str| {
            map.get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
        };

        let headline = pick("error");
        let detail = pick("detalle").or_else(|| pick("detail"));

        match (headline, detail) {
            (Some(h), Some(d)) => Some(format!("{} - {}", h, d)),
            (Some(h), None) => Some(h.to_string()),
            (None, Some(d)) => Some(d.to_string()),
            (None, None) => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            return ApiError::Status { status: status.as_u16(), body: None };
        }
        ApiError::Transport(e.to_string())
    }
}

/// Turns a single record's error into the message stored in a failure entry.
pub fn failure_message(err: &ApiError) -> String {
    match (err, err.detail_text()) {
        (ApiError::Status { status, .. }, Some(detail)) => format!("Error {}: {}", status, detail),
        _ => err.to_string(),
    }
}

