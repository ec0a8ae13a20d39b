//! Error types module
//!
//! Every client operation fails with a `ClientError`. The variants mirror the
//! failure modes of the orchestration layer: a missing credential, an expired
//! deadline, a non-success HTTP status, caller-side validation and a response
//! that does not match the expected schema.
//!
//! A failed indexing trigger after a successful upload is not an error; it is
//! reported on the upload outcome instead.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like timeouts
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata describing how an error should be presented to a caller.
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "HTTP_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether reissuing the same call may succeed
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the caller
    fn suggested_action(&self) -> Option<&'static str>;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(
        "No API key found. Set THURGOOD_API_KEY or CASEDEV_API_KEY, store an \"api\" auth record, \
         or set provider.casedev.options.apiKey"
    )]
    MissingCredential,

    #[error("Request timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    #[error("API request failed with status {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Unexpected response shape: {0}")]
    Schema(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        ClientError::Validation(message.into())
    }

    pub fn schema(message: impl Into<String>) -> Self {
        ClientError::Schema(message.into())
    }

    /// HTTP status for `Http` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<validator::ValidationErrors> for ClientError {
    fn from(err: validator::ValidationErrors) -> Self {
        ClientError::Validation(err.to_string())
    }
}

/// Static metadata for each variant: (error_code, recoverable, suggested_action, log_level).
fn client_error_static_metadata(
    err: &ClientError,
) -> (&'static str, bool, Option<&'static str>, LogLevel) {
    match err {
        ClientError::MissingCredential => (
            "AUTH_ERROR",
            false,
            Some("Configure an API key and retry"),
            LogLevel::Warn,
        ),
        ClientError::Timeout { .. } => (
            "TIMEOUT",
            true,
            Some("Reissue the call, possibly with a longer timeout"),
            LogLevel::Warn,
        ),
        ClientError::Http { status, .. } if *status >= 500 || *status == 429 => (
            "HTTP_ERROR",
            true,
            Some("Retry after a short delay"),
            LogLevel::Error,
        ),
        ClientError::Http { status: 401, .. } | ClientError::Http { status: 403, .. } => (
            "HTTP_ERROR",
            false,
            Some("Check that the API key is valid for this resource"),
            LogLevel::Warn,
        ),
        ClientError::Http { .. } => (
            "HTTP_ERROR",
            false,
            Some("Check request parameters and try again"),
            LogLevel::Warn,
        ),
        ClientError::Validation(_) => (
            "VALIDATION_ERROR",
            false,
            Some("Check request parameters and try again"),
            LogLevel::Debug,
        ),
        ClientError::Schema(_) => (
            "SCHEMA_ERROR",
            false,
            Some("The backend returned an unexpected payload; report it if this persists"),
            LogLevel::Error,
        ),
        ClientError::Network(_) => (
            "NETWORK_ERROR",
            true,
            Some("Check connectivity to the API endpoint and retry"),
            LogLevel::Warn,
        ),
        ClientError::Io(_) => (
            "IO_ERROR",
            false,
            Some("Check the local file path and permissions"),
            LogLevel::Warn,
        ),
    }
}

impl ErrorMetadata for ClientError {
    fn error_code(&self) -> &'static str {
        client_error_static_metadata(self).0
    }

    fn is_recoverable(&self) -> bool {
        client_error_static_metadata(self).1
    }

    fn suggested_action(&self) -> Option<&'static str> {
        client_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        client_error_static_metadata(self).3
    }
}
