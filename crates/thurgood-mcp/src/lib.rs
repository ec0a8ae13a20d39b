//! Thurgood MCP Server
//!
//! Model Context Protocol server that exposes the case.dev legal-AI API
//! as tools for AI assistants (Claude Desktop, Cursor, etc.)

pub mod server;
pub mod tools;

pub use server::ThurgoodService;
pub use thurgood_client::ApiClient;
