//! Client error type
//!
//! Every failure of a collection operation falls in one of two user-facing
//! categories: the request never produced a usable answer (transport or
//! malformed body), or the server answered with a non-2xx status and a free
//! text explanation.

use gridkeeper_schema::OperationType;
use thiserror::Error;

/// Message shown for every transport-level failure
pub const NETWORK_ERROR_MESSAGE: &str = "Network error - please try again.";

/// Errors of the remote collection client
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never completed (connection refused, reset, DNS, ...)
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-2xx status
    #[error("Server rejected request ({status}): {body}")]
    Rejected { status: u16, body: String },

    /// A 2xx response whose body is not what the operation returns
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// The entity type has no endpoint for the operation
    #[error("Operation '{}' is not available for this entity type", .0.display_name())]
    Unsupported(OperationType),

    /// An endpoint template does not resolve to a valid URL
    #[error("Invalid endpoint URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    /// No collection registered for an option source
    #[error("No collection registered for '{0}'")]
    UnknownSource(String),
}

impl ClientError {
    /// Create a rejection from status and body
    pub fn rejected(status: u16, body: impl Into<String>) -> Self {
        ClientError::Rejected {
            status,
            body: body.into(),
        }
    }

    pub(crate) fn invalid_url(url: impl Into<String>, message: impl ToString) -> Self {
        ClientError::InvalidUrl {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Whether the failure happened below HTTP semantics
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_) | ClientError::Malformed(_))
    }

    /// HTTP status of a rejection
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Text to show to the operator
    ///
    /// Transport failures collapse to a generic retry hint; rejections carry
    /// the server's own explanation.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Transport(_) | ClientError::Malformed(_) => {
                NETWORK_ERROR_MESSAGE.to_string()
            }
            ClientError::Rejected { status, body } => {
                if body.trim().is_empty() {
                    format!("Server returned status {}", status)
                } else {
                    body.clone()
                }
            }
            other => other.to_string(),
        }
    }
}

/// Result type alias using ClientError
pub type ClientResult<T> = Result<T, ClientError>;

// ============================================================================
// Tests
// ============================================================================
