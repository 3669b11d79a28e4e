//! Application error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation. Upstream
//! failures are tagged with the operation that produced them so every message
//! reads `"<operation> request failed: <reason>"`.

use thiserror::Error;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for the FeedMob MCP server.
#[derive(Error, Debug)]
pub enum Error {
    /// Upstream rejected the key/token pair (HTTP 401).
    #[error("{operation} request failed: Unauthorized (Invalid API Key or Token)")]
    Unauthorized { operation: &'static str },

    /// Upstream rejected the request parameters (HTTP 400).
    #[error("{operation} request failed: Bad Request")]
    BadRequest { operation: &'static str },

    /// Upstream resource not found (HTTP 404).
    #[error("{operation} request failed: Not Found")]
    NotFound { operation: &'static str },

    /// Any other non-success upstream status.
    #[error("{operation} request failed: HTTP {status}")]
    Upstream { operation: &'static str, status: u16 },

    /// No usable status: timeout, connection refused, DNS failure.
    #[error("{operation} request failed: {reason}")]
    Transport {
        operation: &'static str,
        reason: String,
    },

    /// Caller-supplied arguments violate a business rule. Raised before any
    /// network attempt.
    #[error("{operation} validation failed: {message}")]
    Validation {
        operation: &'static str,
        message: String,
    },

    /// Tool name not present in the catalog.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// Startup-time misconfiguration (fatal).
    #[error("configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization errors.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Classification of an [`Error`], independent of its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Unauthorized,
    BadRequest,
    NotFound,
    UpstreamOther(u16),
    TransportFailure,
    ValidationFailure,
    UnknownTool,
    Config,
    Internal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Unauthorized { .. } => ErrorKind::Unauthorized,
            Error::BadRequest { .. } => ErrorKind::BadRequest,
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::Upstream { status, .. } => ErrorKind::UpstreamOther(*status),
            Error::Transport { .. } => ErrorKind::TransportFailure,
            Error::Validation { .. } => ErrorKind::ValidationFailure,
            Error::UnknownTool(_) => ErrorKind::UnknownTool,
            Error::Config(_) => ErrorKind::Config,
            Error::Serialization(_) | Error::Io(_) => ErrorKind::Internal,
        }
    }

    /// Stable code used in structured log fields.
    pub fn code(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Unauthorized => "UNAUTHORIZED",
            ErrorKind::BadRequest => "BAD_REQUEST",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::UpstreamOther(_) => "UPSTREAM_ERROR",
            ErrorKind::TransportFailure => "TRANSPORT_FAILURE",
            ErrorKind::ValidationFailure => "INVALID_ARGUMENT",
            ErrorKind::UnknownTool => "UNKNOWN_TOOL",
            ErrorKind::Config => "CONFIG",
            ErrorKind::Internal => "INTERNAL",
        }
    }

    /// Operation the error belongs to, when it came from an upstream call.
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            Error::Unauthorized { operation }
            | Error::BadRequest { operation }
            | Error::NotFound { operation }
            | Error::Upstream { operation, .. }
            | Error::Transport { operation, .. }
            | Error::Validation { operation, .. } => Some(*operation),
            _ => None,
        }
    }
}

// Convenience constructors
impl Error {
    pub fn validation(operation: &'static str, msg: impl Into<String>) -> Self {
        Self::Validation {
            operation,
            message: msg.into(),
        }
    }

    pub fn transport(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::Transport {
            operation,
            reason: reason.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
