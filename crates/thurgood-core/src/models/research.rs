use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use std::time::Duration;
use validator::Validate;

use crate::error::ClientError;

/// Research depth. Deeper models do more backend work and get a longer deadline.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ResearchModel {
    Fast,
    #[default]
    Normal,
    Pro,
}

impl ResearchModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResearchModel::Fast => "fast",
            ResearchModel::Normal => "normal",
            ResearchModel::Pro => "pro",
        }
    }

    pub fn timeout_ms(&self) -> u64 {
        match self {
            ResearchModel::Fast => 60_000,
            ResearchModel::Normal => 180_000,
            ResearchModel::Pro => 360_000,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms())
    }
}

impl Display for ResearchModel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResearchModel {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fast" | "shallow" => Ok(ResearchModel::Fast),
            "normal" | "balanced" => Ok(ResearchModel::Normal),
            "pro" | "deep" => Ok(ResearchModel::Pro),
            _ => Err(ClientError::validation(format!(
                "Invalid research model: {} (expected fast, normal or pro)",
                s
            ))),
        }
    }
}

/// `POST /search/v1/research` body
#[derive(Debug, Clone, Serialize, Validate)]
pub struct ResearchRequest {
    #[validate(length(min = 1, message = "Research instructions must not be empty"))]
    pub instructions: String,
    pub model: ResearchModel,
}

/// Research report: a small known core plus whatever sections the backend adds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchReport {
    #[serde(default, alias = "researchId", skip_serializing_if = "Option::is_none")]
    pub research_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sources: Vec<Value>,
    /// Remaining sections in the order the backend sent them
    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl ResearchReport {
    pub fn sections(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.additional.iter().map(|(k, v)| (k.as_str(), v))
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default())
}
