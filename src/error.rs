//! Error types for backend requests.

use thiserror::Error;

/// Everything that can go wrong while talking to the chat backend.
///
/// None of these are fatal to the widget: each one is collapsed into a single
/// error entry via [`ChatError::reason`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// The request never produced a response (connection refused, reset, ...).
    #[error("{0}")]
    Transport(String),

    /// The backend answered with a non-2xx status.
    #[error("{}", status_reason(.status, .detail))]
    Status {
        /// HTTP status code.
        status: u16,
        /// `detail` field of the JSON error body, when the body had one.
        detail: Option<String>,
    },

    /// The response body was not the JSON we expected.
    #[error("invalid response body: {0}")]
    Decode(String),

    /// The configured base URL could not be parsed.
    #[error("invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ChatError {
    /// Human-readable text shown to the user for this failure.
    pub fn reason(&self) -> String {
        self.to_string()
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ChatError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ChatError::Decode(err.to_string())
        } else {
            ChatError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        ChatError::Decode(err.to_string())
    }
}

fn status_reason(status: &u16, detail: &Option<String>) -> String {
    match detail {
        Some(detail) if !detail.is_empty() => detail.clone(),
        _ => format!("HTTP error! status: {status}"),
    }
}

/// Result alias for backend operations.
pub type ChatResult<T> = std::result::Result<T, ChatError>;
