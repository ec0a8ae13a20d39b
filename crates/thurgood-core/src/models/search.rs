//! Vault search: query model and result normalization.
//!
//! The backend answers each search method with its own shape: ranked chunks
//! scored by a hybrid or plain score, an aggregate `response` text for the
//! graph methods, an optional `sources` list, and method-specific extras. All of
//! them are folded into [`SearchOutcome`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use validator::Validate;

use crate::error::ClientError;

pub const MIN_TOP_K: u32 = 1;
pub const MAX_TOP_K: u32 = 100;
pub const DEFAULT_TOP_K: u32 = 10;

#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SearchMethod {
    #[default]
    Hybrid,
    Fast,
    Global,
    Entity,
    Local,
    Vector,
    Graph,
}

impl SearchMethod {
    pub const ALL: [SearchMethod; 7] = [
        SearchMethod::Hybrid,
        SearchMethod::Fast,
        SearchMethod::Global,
        SearchMethod::Entity,
        SearchMethod::Local,
        SearchMethod::Vector,
        SearchMethod::Graph,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMethod::Hybrid => "hybrid",
            SearchMethod::Fast => "fast",
            SearchMethod::Global => "global",
            SearchMethod::Entity => "entity",
            SearchMethod::Local => "local",
            SearchMethod::Vector => "vector",
            SearchMethod::Graph => "graph",
        }
    }
}

impl Display for SearchMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchMethod {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        SearchMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| {
                ClientError::validation(format!(
                    "Invalid search method: {} (expected one of hybrid, fast, global, entity, local, vector, graph)",
                    s
                ))
            })
    }
}

/// Clamp a caller-supplied result count into `[MIN_TOP_K, MAX_TOP_K]`.
pub fn clamp_top_k(requested: Option<i64>) -> u32 {
    match requested {
        Some(k) => k.clamp(MIN_TOP_K as i64, MAX_TOP_K as i64) as u32,
        None => DEFAULT_TOP_K,
    }
}

/// Display confidence as a whole percentage, preferring the hybrid score.
/// Negative scores display as 0.
pub fn display_confidence(hybrid_score: Option<f64>, score: Option<f64>) -> i64 {
    (100.0 * hybrid_score.or(score).unwrap_or(0.0).max(0.0)).round() as i64
}

#[derive(Debug, Clone, Validate)]
pub struct SearchQuery {
    #[validate(length(min = 1, message = "vault_id must not be empty"))]
    pub vault_id: String,
    #[validate(length(min = 1, message = "Search query must not be empty"))]
    pub text: String,
    pub method: Option<SearchMethod>,
    pub top_k: Option<i64>,
    /// Restrict results to a single object
    pub object_id: Option<String>,
}

impl SearchQuery {
    pub fn new(vault_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            vault_id: vault_id.into(),
            text: text.into(),
            method: None,
            top_k: None,
            object_id: None,
        }
    }

    pub fn method(mut self, method: SearchMethod) -> Self {
        self.method = Some(method);
        self
    }

    pub fn top_k(mut self, top_k: i64) -> Self {
        self.top_k = Some(top_k);
        self
    }

    pub fn object_id(mut self, object_id: impl Into<String>) -> Self {
        self.object_id = Some(object_id.into());
        self
    }

    pub fn effective_method(&self) -> SearchMethod {
        self.method.unwrap_or_default()
    }

    /// Body for `POST /vault/{id}/search`.
    pub fn request_body(&self) -> SearchRequestBody {
        let filters = self
            .object_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| SearchFilters {
                object_id: id.to_string(),
            });

        SearchRequestBody {
            query: self.text.clone(),
            method: self.effective_method(),
            top_k: clamp_top_k(self.top_k),
            filters,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchRequestBody {
    pub query: String,
    pub method: SearchMethod,
    #[serde(rename = "topK")]
    pub top_k: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<SearchFilters>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchFilters {
    pub object_id: String,
}

/// Search response as returned by the backend, before normalization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSearchResponse {
    #[serde(default, alias = "results")]
    pub chunks: Vec<RawChunk>,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub sources: Option<Vec<Value>>,
    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawChunk {
    #[serde(default, alias = "content")]
    pub text: String,
    #[serde(default, alias = "objectId")]
    pub object_id: Option<String>,
    #[serde(default, alias = "chunkIndex")]
    pub chunk_index: Option<u64>,
    #[serde(default, alias = "hybridScore")]
    pub hybrid_score: Option<f64>,
    #[serde(default)]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchChunk {
    pub text: String,
    pub object_id: Option<String>,
    pub chunk_index: Option<u64>,
    pub score: f64,
    pub confidence: i64,
}

impl From<RawChunk> for SearchChunk {
    fn from(raw: RawChunk) -> Self {
        SearchChunk {
            score: raw.hybrid_score.or(raw.score).unwrap_or(0.0),
            confidence: display_confidence(raw.hybrid_score, raw.score),
            text: raw.text,
            object_id: raw.object_id,
            chunk_index: raw.chunk_index,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub method: SearchMethod,
    pub query: String,
    /// In backend order
    pub chunks: Vec<SearchChunk>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<Value>>,
    /// Method-specific sections, in the order the backend sent them
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub additional: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SearchOutcome {
    NoResults { method: SearchMethod, query: String },
    Results(SearchResult),
}

impl SearchOutcome {
    pub fn is_empty(&self) -> bool {
        matches!(self, SearchOutcome::NoResults { .. })
    }
}

impl RawSearchResponse {
    /// Fold the backend payload into the normalized result contract.
    pub fn normalize(self, method: SearchMethod, query: &str) -> SearchOutcome {
        let response = self.response.filter(|r| !r.trim().is_empty());

        if self.chunks.is_empty() && response.is_none() {
            return SearchOutcome::NoResults {
                method,
                query: query.to_string(),
            };
        }

        let mut additional = self.additional;
        additional.remove("method");
        additional.remove("query");

        SearchOutcome::Results(SearchResult {
            method,
            query: query.to_string(),
            chunks: self.chunks.into_iter().map(SearchChunk::from).collect(),
            response,
            sources: self.sources,
            additional,
        })
    }
}
