use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use validator::Validate;

use crate::error::ClientError;

/// Request body for `POST /vault`
#[derive(Debug, Clone, Serialize, Validate)]
pub struct CreateVaultRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Vault name must be between 1 and 255 characters"
    ))]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vault {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "object_count")]
    pub object_count: Option<u64>,
    #[serde(default, alias = "total_bytes")]
    pub total_bytes: Option<u64>,
    #[serde(default, alias = "created_at")]
    pub created_at: Option<DateTime<Utc>>,
}

/// `GET /vault` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultList {
    #[serde(alias = "items")]
    pub vaults: Vec<Vault>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// Ingestion status of a stored object.
///
/// Moves strictly forward: `pending -> processing -> completed | failed`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum IngestionStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl IngestionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, IngestionStatus::Completed | IngestionStatus::Failed)
    }

    /// Whether `next` is the immediate successor of this status.
    pub fn can_transition_to(&self, next: IngestionStatus) -> bool {
        matches!(
            (self, next),
            (IngestionStatus::Pending, IngestionStatus::Processing)
                | (IngestionStatus::Processing, IngestionStatus::Completed)
                | (IngestionStatus::Processing, IngestionStatus::Failed)
        )
    }
}

impl Display for IngestionStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            IngestionStatus::Pending => write!(f, "pending"),
            IngestionStatus::Processing => write!(f, "processing"),
            IngestionStatus::Completed => write!(f, "completed"),
            IngestionStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for IngestionStatus {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(IngestionStatus::Pending),
            "processing" => Ok(IngestionStatus::Processing),
            "completed" => Ok(IngestionStatus::Completed),
            "failed" => Ok(IngestionStatus::Failed),
            _ => Err(ClientError::validation(format!(
                "Invalid ingestion status: {}",
                s
            ))),
        }
    }
}

/// A document stored in a vault.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultObject {
    pub id: String,
    pub filename: String,
    #[serde(alias = "content_type")]
    pub content_type: String,
    #[serde(alias = "size_bytes")]
    pub size_bytes: u64,
    #[serde(alias = "ingestion_status")]
    pub ingestion_status: IngestionStatus,
    #[serde(default, alias = "page_count")]
    pub page_count: Option<u32>,
    #[serde(default, alias = "text_length")]
    pub text_length: Option<u64>,
    #[serde(default, alias = "chunk_count")]
    pub chunk_count: Option<u64>,
    #[serde(default, alias = "vector_count")]
    pub vector_count: Option<u64>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(alias = "created_at")]
    pub created_at: DateTime<Utc>,
    #[serde(default, alias = "ingestion_completed_at")]
    pub ingestion_completed_at: Option<DateTime<Utc>>,
}

/// `GET /vault/{id}/objects` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectList {
    #[serde(alias = "items")]
    pub objects: Vec<VaultObject>,
    #[serde(default)]
    pub count: Option<u64>,
}

/// Extracted text of a stored object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectText {
    #[serde(default, alias = "object_id")]
    pub object_id: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    pub text: String,
    #[serde(default, alias = "text_length")]
    pub text_length: Option<u64>,
}
