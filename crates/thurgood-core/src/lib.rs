//! Thurgood Core Library
//!
//! Domain models, error types and configuration shared by the API client,
//! the MCP server and the CLI.

pub mod config;
pub mod error;
pub mod mime;
pub mod models;

// Re-export commonly used types
pub use config::{ClientConfig, ProviderOptions, DEFAULT_BASE_URL, PROVIDER_ID};
pub use error::{ClientError, ClientResult, ErrorMetadata, LogLevel};
pub use mime::content_type_for;
