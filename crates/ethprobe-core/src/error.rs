//! Probe error taxonomy.

use thiserror::Error;

use crate::request::JsonRpcError;

/// Broad class of a [`ProbeError`], used to decide retry and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The endpoint could not be reached or did not answer in time.
    Transport,
    /// The endpoint answered but rejected or mis-answered the call.
    Protocol,
    /// The result did not have the expected shape.
    Format,
}

impl std::fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport => write!(f, "transport"),
            Self::Protocol => write!(f, "protocol"),
            Self::Format => write!(f, "format"),
        }
    }
}

/// A JSON-RPC result (or one of its fields) had an unexpected shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field}: {reason}")]
pub struct FormatError {
    pub field: String,
    pub reason: String,
}

impl FormatError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Re-label the error with the field that was being extracted.
    pub fn in_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }
}

/// Errors that can occur while probing a node.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// HTTP request failed (connection refused, DNS failure, non-2xx status).
    #[error("HTTP error: {0}")]
    Http(String),

    /// Request timed out after the configured duration.
    #[error("Request timed out after {ms}ms")]
    Timeout { ms: u64 },

    /// JSON-RPC error envelope returned by the node.
    #[error("RPC error {}: {}", .0.code, .0.message)]
    Rpc(JsonRpcError),

    /// Response body was not a JSON-RPC envelope.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Request could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Result had an unexpected shape.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Every attempt failed; `last` is the final attempt's error.
    #[error("failed after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: Box<ProbeError> },
}

impl ProbeError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Http(_) | Self::Timeout { .. } => ErrorClass::Transport,
            Self::Rpc(_) | Self::Malformed(_) | Self::Serialization(_) => ErrorClass::Protocol,
            Self::Format(_) => ErrorClass::Format,
            Self::Exhausted { last, .. } => last.class(),
        }
    }

    /// Returns `true` if this error is transient and the call may be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Timeout { .. })
    }
}
