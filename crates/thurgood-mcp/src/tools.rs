//! MCP tool request types with JSON Schema for AI parameter generation

use schemars::JsonSchema;
use serde::Deserialize;
use thurgood_core::models::{InputFormat, OcrFormat, OutputFormat, ResearchModel, SearchMethod};

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct VaultCreateRequest {
    #[schemars(description = "Name of the vault, e.g. the matter or case name")]
    pub name: String,
    #[schemars(description = "Optional description of the vault's contents")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct VaultUploadRequest {
    #[schemars(description = "ID of the vault to upload into")]
    pub vault_id: String,
    #[schemars(description = "Local path of the file to upload")]
    pub file_path: String,
    #[schemars(description = "Index the document for search after upload (default true)")]
    pub auto_index: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct VaultObjectsRequest {
    #[schemars(description = "ID of the vault")]
    pub vault_id: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct VaultObjectRequest {
    #[schemars(description = "ID of the vault")]
    pub vault_id: String,
    #[schemars(description = "ID of the object within the vault")]
    pub object_id: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct VaultDownloadRequest {
    #[schemars(description = "ID of the vault")]
    pub vault_id: String,
    #[schemars(description = "ID of the object within the vault")]
    pub object_id: String,
    #[schemars(
        description = "Local path to save the file to. Without it, only text content is returned"
    )]
    pub save_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct VaultSearchRequest {
    #[schemars(description = "ID of the vault to search")]
    pub vault_id: String,
    #[schemars(description = "Natural-language search query")]
    pub query: String,
    #[schemars(description = "Retrieval method (default hybrid)")]
    pub method: Option<SearchMethodParam>,
    #[schemars(description = "Number of results, clamped to 1-100 (default 10)")]
    pub top_k: Option<i64>,
    #[schemars(description = "Restrict results to a single object")]
    pub object_id: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SearchMethodParam {
    Hybrid,
    Fast,
    Global,
    Entity,
    Local,
    Vector,
    Graph,
}

impl From<SearchMethodParam> for SearchMethod {
    fn from(param: SearchMethodParam) -> Self {
        match param {
            SearchMethodParam::Hybrid => SearchMethod::Hybrid,
            SearchMethodParam::Fast => SearchMethod::Fast,
            SearchMethodParam::Global => SearchMethod::Global,
            SearchMethodParam::Entity => SearchMethod::Entity,
            SearchMethodParam::Local => SearchMethod::Local,
            SearchMethodParam::Vector => SearchMethod::Vector,
            SearchMethodParam::Graph => SearchMethod::Graph,
        }
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct OcrProcessRequest {
    #[schemars(description = "Publicly reachable URL of the document to OCR")]
    pub document_url: String,
    #[schemars(description = "OCR engine hint (backend default when omitted)")]
    pub engine: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct JobStatusRequest {
    #[schemars(description = "Job ID returned when the job was submitted")]
    pub job_id: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct OcrDownloadRequest {
    #[schemars(description = "OCR job ID")]
    pub job_id: String,
    #[schemars(description = "Result format")]
    pub format: OcrFormatParam,
    #[schemars(description = "Local path to save the result to (required for pdf)")]
    pub save_path: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OcrFormatParam {
    Text,
    Json,
    Pdf,
}

impl From<OcrFormatParam> for OcrFormat {
    fn from(param: OcrFormatParam) -> Self {
        match param {
            OcrFormatParam::Text => OcrFormat::Text,
            OcrFormatParam::Json => OcrFormat::Json,
            OcrFormatParam::Pdf => OcrFormat::Pdf,
        }
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TranscribeRequest {
    #[schemars(description = "Vault ID holding the audio (use with object_id)")]
    pub vault_id: Option<String>,
    #[schemars(description = "Object ID of the audio in the vault (use with vault_id)")]
    pub object_id: Option<String>,
    #[schemars(description = "Public audio URL (instead of vault_id/object_id)")]
    pub audio_url: Option<String>,
    #[schemars(description = "Label speakers in the transcript")]
    pub speaker_labels: Option<bool>,
    #[schemars(description = "Language code, e.g. en_us")]
    pub language_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ResearchRequest {
    #[schemars(description = "What to research")]
    pub instructions: String,
    #[schemars(description = "Research depth: fast, normal (default) or pro")]
    pub model: Option<ResearchModelParam>,
}

#[derive(Debug, Clone, Copy, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResearchModelParam {
    Fast,
    Normal,
    Pro,
}

impl From<ResearchModelParam> for ResearchModel {
    fn from(param: ResearchModelParam) -> Self {
        match param {
            ResearchModelParam::Fast => ResearchModel::Fast,
            ResearchModelParam::Normal => ResearchModel::Normal,
            ResearchModelParam::Pro => ResearchModel::Pro,
        }
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FormatDocumentRequest {
    #[schemars(description = "Document content to format")]
    pub content: String,
    #[schemars(description = "Input format: md (default), json or text")]
    pub input_format: Option<InputFormatParam>,
    #[schemars(description = "Output format: pdf (default), docx or html_preview")]
    pub output_format: Option<OutputFormatParam>,
    #[schemars(description = "Local path to save the rendered document to")]
    pub save_path: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum InputFormatParam {
    Md,
    Json,
    Text,
}

impl From<InputFormatParam> for InputFormat {
    fn from(param: InputFormatParam) -> Self {
        match param {
            InputFormatParam::Md => InputFormat::Md,
            InputFormatParam::Json => InputFormat::Json,
            InputFormatParam::Text => InputFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormatParam {
    Pdf,
    Docx,
    HtmlPreview,
}

impl From<OutputFormatParam> for OutputFormat {
    fn from(param: OutputFormatParam) -> Self {
        match param {
            OutputFormatParam::Pdf => OutputFormat::Pdf,
            OutputFormatParam::Docx => OutputFormat::Docx,
            OutputFormatParam::HtmlPreview => OutputFormat::HtmlPreview,
        }
    }
}
