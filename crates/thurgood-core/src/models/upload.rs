use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::time::{Duration, Instant};
use validator::Validate;

/// Request for a presigned write slot (`POST /vault/{id}/upload`)
#[derive(Debug, Clone, Serialize, Validate)]
pub struct UploadSlotRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Filename must be between 1 and 255 characters"
    ))]
    pub filename: String,
    #[serde(rename = "contentType")]
    pub content_type: String,
    #[serde(rename = "sizeBytes")]
    pub size_bytes: u64,
    pub auto_index: bool,
}

/// Write slot issued by the backend.
///
/// Single-use. The upload URL stops being valid `expires_in_seconds` after
/// the slot was issued.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSession {
    #[serde(alias = "object_id")]
    pub object_id: String,
    #[serde(alias = "upload_url")]
    pub upload_url: String,
    #[serde(
        default,
        alias = "expiresIn",
        alias = "expires_in",
        alias = "expires_in_seconds"
    )]
    pub expires_in_seconds: Option<u64>,
    #[serde(default, alias = "s3Key", alias = "s3_key", alias = "storage_key")]
    pub storage_key: Option<String>,
    #[serde(default, alias = "auto_index")]
    pub auto_index: Option<bool>,
    #[serde(default, alias = "next_step")]
    pub next_step: Option<serde_json::Value>,
    #[serde(skip, default = "Instant::now")]
    issued_at: Instant,
}

impl UploadSession {
    pub fn has_next_step(&self) -> bool {
        self.next_step.as_ref().is_some_and(|step| !step.is_null())
    }

    pub fn issued_at(&self) -> Instant {
        self.issued_at
    }

    pub fn expires_at(&self) -> Option<Instant> {
        self.expires_in_seconds
            .map(|secs| self.issued_at + Duration::from_secs(secs))
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.expires_at().is_some_and(|deadline| now >= deadline)
    }
}

/// Outcome of the indexing trigger that follows a successful transfer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum IngestionTrigger {
    #[serde(rename = "started")]
    Started,
    #[serde(rename = "skipped")]
    Skipped,
    #[serde(rename = "failed to start")]
    FailedToStart,
}

impl Display for IngestionTrigger {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            IngestionTrigger::Started => write!(f, "started"),
            IngestionTrigger::Skipped => write!(f, "skipped"),
            IngestionTrigger::FailedToStart => write!(f, "failed to start"),
        }
    }
}

/// Result of a completed upload. The object is stored whenever this is returned,
/// even if `ingestion` is `FailedToStart`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadOutcome {
    pub object_id: String,
    pub filename: String,
    pub content_type: String,
    pub size_bytes: u64,
    pub auto_index: bool,
    pub ingestion: IngestionTrigger,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingestion_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_key: Option<String>,
}

/// `POST /vault/{id}/ingest/{objectId}` response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestResponse {
    #[serde(default, alias = "object_id")]
    pub object_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
