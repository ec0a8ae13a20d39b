//! Data models for the client
//!
//! Request and response types for each backend service, organized by domain.

mod format;
mod job;
mod ocr;
mod research;
mod search;
mod transcription;
mod upload;
mod vault;

pub use format::*;
pub use job::*;
pub use ocr::*;
pub use research::*;
pub use search::*;
pub use transcription::*;
pub use upload::*;
pub use vault::*;
