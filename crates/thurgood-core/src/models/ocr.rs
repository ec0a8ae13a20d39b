use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;
use std::str::FromStr;
use validator::Validate;

use super::job::{Job, JobPhase, JobRecord, JobStatus};
use crate::error::ClientError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OcrStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl Display for OcrStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            OcrStatus::Pending => write!(f, "pending"),
            OcrStatus::Processing => write!(f, "processing"),
            OcrStatus::Completed => write!(f, "completed"),
            OcrStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for OcrStatus {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OcrStatus::Pending),
            "processing" => Ok(OcrStatus::Processing),
            "completed" => Ok(OcrStatus::Completed),
            "failed" => Ok(OcrStatus::Failed),
            _ => Err(ClientError::validation(format!("Invalid OCR status: {}", s))),
        }
    }
}

impl JobStatus for OcrStatus {
    fn initial() -> Self {
        OcrStatus::Pending
    }

    fn phase(&self) -> JobPhase {
        match self {
            OcrStatus::Pending => JobPhase::Waiting,
            OcrStatus::Processing => JobPhase::Running,
            OcrStatus::Completed => JobPhase::Succeeded,
            OcrStatus::Failed => JobPhase::Failed,
        }
    }
}

/// `POST /ocr/v1/process` body
#[derive(Debug, Clone, Serialize, Validate)]
pub struct OcrRequest {
    #[validate(length(min = 1, message = "document_url must not be empty"))]
    pub document_url: String,
    /// OCR engine hint, backend default when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<serde_json::Value>,
}

/// OCR job snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrJob {
    #[serde(flatten)]
    pub record: JobRecord<OcrStatus>,
    #[serde(default, alias = "pageCount", skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, alias = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "completedAt", skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Job for OcrJob {
    type Status = OcrStatus;

    fn record(&self) -> &JobRecord<OcrStatus> {
        &self.record
    }
}

/// Result formats offered by `GET /ocr/v1/{id}/download/{format}`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OcrFormat {
    Text,
    Json,
    Pdf,
}

impl OcrFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OcrFormat::Text => "text",
            OcrFormat::Json => "json",
            OcrFormat::Pdf => "pdf",
        }
    }

    /// Binary formats cannot be returned inline and must be written to disk.
    pub fn requires_save_target(&self) -> bool {
        matches!(self, OcrFormat::Pdf)
    }
}

impl Display for OcrFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for OcrFormat {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OcrFormat::Text),
            "json" => Ok(OcrFormat::Json),
            "pdf" => Ok(OcrFormat::Pdf),
            _ => Err(ClientError::validation(format!(
                "Invalid OCR format: {} (expected text, json or pdf)",
                s
            ))),
        }
    }
}

/// Downloaded OCR result
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OcrDownload {
    Text { text: String },
    Json { document: serde_json::Value },
    Saved {
        format: OcrFormat,
        path: PathBuf,
        size_bytes: u64,
    },
}
