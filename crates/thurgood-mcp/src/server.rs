//! MCP server using rmcp SDK
//!
//! Exposes the case.dev client operations as MCP tools over stdio.

use crate::tools::*;
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::tool::Parameters;
use rmcp::model::*;
use rmcp::{tool, tool_handler, tool_router, ServerHandler};
use serde::Serialize;
use std::borrow::Cow;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thurgood_client::ApiClient;
use thurgood_core::models::{
    status_line, FormatRequest, Job, JobPhase, OcrRequest, SearchOutcome, SearchQuery,
    TranscriptionJob, TranscriptionRequest, TranscriptionSource,
};
use thurgood_core::{ClientError, ErrorMetadata, LogLevel};

fn text_content(s: impl Into<String>) -> Content {
    Content {
        raw: RawContent::Text(RawTextContent { text: s.into() }),
        annotations: None,
    }
}

/// Caller mistakes are invalid params, everything else an internal error.
fn tool_error(err: ClientError) -> ErrorData {
    let code = match err {
        ClientError::Validation(_) => ErrorCode(-32602),
        _ => ErrorCode(-32603),
    };

    match err.log_level() {
        LogLevel::Debug => tracing::debug!(error = %err, "Tool call rejected"),
        LogLevel::Warn => tracing::warn!(error = %err, "Tool call failed"),
        LogLevel::Error => tracing::error!(error = %err, "Tool call failed"),
    }

    ErrorData {
        code,
        message: Cow::from(err.to_string()),
        data: Some(serde_json::json!({
            "error_code": err.error_code(),
            "recoverable": err.is_recoverable(),
            "suggested_action": err.suggested_action(),
        })),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ErrorData> {
    serde_json::to_string_pretty(value).map_err(|e| ErrorData {
        code: ErrorCode(-32603),
        message: Cow::from(e.to_string()),
        data: None,
    })
}

fn success(text: String) -> Result<CallToolResult, ErrorData> {
    Ok(CallToolResult::success(vec![text_content(text)]))
}

fn optional_path(path: Option<&str>) -> Option<PathBuf> {
    path.map(str::trim).filter(|p| !p.is_empty()).map(PathBuf::from)
}

pub(crate) fn render_search(outcome: &SearchOutcome) -> Result<String, ErrorData> {
    match outcome {
        SearchOutcome::NoResults { method, query } => Ok(format!(
            "No results found for \"{}\" using {} search.",
            query, method
        )),
        SearchOutcome::Results(result) => to_json(result),
    }
}

pub(crate) fn render_job<J: Job>(job: &J) -> Result<String, ErrorData> {
    Ok(format!("{}\n{}", status_line(job), to_json(job)?))
}

pub(crate) fn render_transcription(job: &TranscriptionJob) -> Result<String, ErrorData> {
    if job.phase() != JobPhase::Succeeded {
        return render_job(job);
    }
    let transcript = job
        .transcript_text()
        .unwrap_or_else(|| "No transcript content.".to_string());
    Ok(format!("{}\n\n{}", status_line(job), transcript))
}

#[derive(Debug, Clone)]
pub struct ThurgoodService {
    api_client: Arc<ApiClient>,
    tool_router: ToolRouter<ThurgoodService>,
}

#[tool_router]
impl ThurgoodService {
    pub fn new(api_client: ApiClient) -> Self {
        Self {
            api_client: Arc::new(api_client),
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Create a vault for storing and searching case documents")]
    async fn vault_create(
        &self,
        Parameters(req): Parameters<VaultCreateRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let vault = self
            .api_client
            .create_vault(&req.name, req.description.as_deref())
            .await
            .map_err(tool_error)?;
        success(to_json(&vault)?)
    }

    #[tool(description = "List all vaults")]
    async fn vault_list(&self) -> Result<CallToolResult, ErrorData> {
        let vaults = self.api_client.list_vaults().await.map_err(tool_error)?;
        success(to_json(&vaults)?)
    }

    #[tool(
        description = "Upload a local file into a vault and (by default) start indexing it for search"
    )]
    async fn vault_upload(
        &self,
        Parameters(req): Parameters<VaultUploadRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let outcome = self
            .api_client
            .upload_file(
                &req.vault_id,
                Path::new(&req.file_path),
                req.auto_index.unwrap_or(true),
            )
            .await
            .map_err(tool_error)?;
        success(to_json(&outcome)?)
    }

    #[tool(description = "List the objects stored in a vault with their ingestion status")]
    async fn vault_objects(
        &self,
        Parameters(req): Parameters<VaultObjectsRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let objects = self
            .api_client
            .list_objects(&req.vault_id)
            .await
            .map_err(tool_error)?;
        success(to_json(&objects)?)
    }

    #[tool(description = "Get the extracted text of an indexed vault object")]
    async fn vault_object_text(
        &self,
        Parameters(req): Parameters<VaultObjectRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let text = self
            .api_client
            .object_text(&req.vault_id, &req.object_id)
            .await
            .map_err(tool_error)?;
        success(text.text)
    }

    #[tool(description = "Download a vault object, returning text content or saving it to a path")]
    async fn vault_download(
        &self,
        Parameters(req): Parameters<VaultDownloadRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        if let Some(path) = optional_path(req.save_path.as_deref()) {
            let size_bytes = self
                .api_client
                .save_object(&req.vault_id, &req.object_id, &path)
                .await
                .map_err(tool_error)?;
            return success(to_json(&serde_json::json!({
                "object_id": req.object_id,
                "path": path,
                "size_bytes": size_bytes,
            }))?);
        }

        let bytes = self
            .api_client
            .download_object(&req.vault_id, &req.object_id)
            .await
            .map_err(tool_error)?;
        match String::from_utf8(bytes.to_vec()) {
            Ok(text) => success(text),
            Err(_) => Err(tool_error(ClientError::validation(
                "Object is binary; provide save_path to download it",
            ))),
        }
    }

    #[tool(
        description = "Search a vault. Methods: hybrid (default), fast, global, entity, local, vector, graph"
    )]
    async fn vault_search(
        &self,
        Parameters(req): Parameters<VaultSearchRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let mut query = SearchQuery::new(req.vault_id, req.query);
        query.method = req.method.map(Into::into);
        query.top_k = req.top_k;
        query.object_id = req.object_id;

        let outcome = self.api_client.search(&query).await.map_err(tool_error)?;
        success(render_search(&outcome)?)
    }

    #[tool(description = "Submit a document URL for OCR. Returns a job ID to poll with ocr_status")]
    async fn ocr_process(
        &self,
        Parameters(req): Parameters<OcrProcessRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let job = self
            .api_client
            .submit_ocr(&OcrRequest {
                document_url: req.document_url,
                engine: req.engine,
                features: None,
            })
            .await
            .map_err(tool_error)?;
        success(render_job(&job)?)
    }

    #[tool(description = "Check the status of an OCR job")]
    async fn ocr_status(
        &self,
        Parameters(req): Parameters<JobStatusRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let job = self
            .api_client
            .ocr_status(&req.job_id)
            .await
            .map_err(tool_error)?;
        success(render_job(&job)?)
    }

    #[tool(description = "Download a completed OCR result as text, json or pdf (pdf needs save_path)")]
    async fn ocr_download(
        &self,
        Parameters(req): Parameters<OcrDownloadRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let save_to = optional_path(req.save_path.as_deref());
        let download = self
            .api_client
            .download_ocr(&req.job_id, req.format.into(), save_to.as_deref())
            .await
            .map_err(tool_error)?;
        success(to_json(&download)?)
    }

    #[tool(
        description = "Transcribe audio from a vault object (vault_id + object_id) or a public audio_url"
    )]
    async fn transcribe(
        &self,
        Parameters(req): Parameters<TranscribeRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let source = TranscriptionSource::from_parts(req.vault_id, req.object_id, req.audio_url)
            .map_err(tool_error)?;
        let mut request = TranscriptionRequest::new(source);
        request.speaker_labels = req.speaker_labels.unwrap_or(false);
        request.language_code = req.language_code;

        let job = self
            .api_client
            .submit_transcription(&request)
            .await
            .map_err(tool_error)?;
        success(render_job(&job)?)
    }

    #[tool(description = "Check a transcription job; returns the transcript once completed")]
    async fn transcription_status(
        &self,
        Parameters(req): Parameters<JobStatusRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let job = self
            .api_client
            .transcription_status(&req.job_id)
            .await
            .map_err(tool_error)?;
        success(render_transcription(&job)?)
    }

    #[tool(description = "Run legal research. Models: fast, normal (default), pro")]
    async fn research(
        &self,
        Parameters(req): Parameters<ResearchRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let model = req.model.map(Into::into).unwrap_or_default();
        let report = self
            .api_client
            .research(&req.instructions, model)
            .await
            .map_err(tool_error)?;
        success(to_json(&report)?)
    }

    #[tool(description = "Format content into a pdf, docx or html_preview document")]
    async fn format_document(
        &self,
        Parameters(req): Parameters<FormatDocumentRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let request = FormatRequest {
            content: req.content,
            input_format: req.input_format.map(Into::into).unwrap_or_default(),
            output_format: req.output_format.map(Into::into).unwrap_or_default(),
            options: None,
        };
        let save_to = optional_path(req.save_path.as_deref());
        let document = self
            .api_client
            .format_document(&request, save_to.as_deref())
            .await
            .map_err(tool_error)?;
        success(to_json(&document)?)
    }
}

#[tool_handler]
impl ServerHandler for ThurgoodService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "thurgood-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
            },
            instructions: Some(
                "Thurgood: case.dev vaults (create, upload, list, search, download), OCR and \
                 transcription jobs, legal research and document formatting. Set THURGOOD_API_KEY \
                 or CASEDEV_API_KEY."
                    .to_string(),
            ),
        }
    }
}
