//! Unified client error types for WebRepo.
//!
//! All crates map their internal errors into [`ClientError`] for consistent
//! propagation through the ? operator.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The remote answered with a non-success status outside the tolerated
    /// not-found cases.
    Remote,
    /// The request could not be sent or the connection failed mid-flight.
    Transport,
    /// The response body was malformed or did not match the expected shape.
    Decode,
    /// The operation was cancelled by the caller's cancellation signal.
    Cancelled,
    /// A configuration error occurred (bad base URL, unreadable file, etc.).
    Configuration,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote => write!(f, "REMOTE"),
            Self::Transport => write!(f, "TRANSPORT"),
            Self::Decode => write!(f, "DECODE"),
            Self::Cancelled => write!(f, "CANCELLED"),
            Self::Configuration => write!(f, "CONFIGURATION"),
        }
    }
}

/// The unified client error used throughout WebRepo.
///
/// Crate-specific errors are mapped into `ClientError` using `From` impls
/// or explicit `.map_err()` calls. Remote failures carry the HTTP status
/// code they were escalated from.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct ClientError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// The HTTP status code, for errors escalated from a remote response.
    pub status: Option<u16>,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ClientError {
    /// Create a new client error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            source: None,
        }
    }

    /// Create a new client error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            source: Some(Box::new(source)),
        }
    }

    /// Create a remote-failure error carrying the escalated HTTP status.
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Remote,
            message: message.into(),
            status: Some(status),
            source: None,
        }
    }

    /// Create a cancellation error.
    pub fn cancelled() -> Self {
        Self::new(ErrorKind::Cancelled, "operation cancelled by caller")
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }
}

impl Clone for ClientError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            status: self.status,
            source: None,
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Decode,
            format!("JSON decode error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for ClientError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
