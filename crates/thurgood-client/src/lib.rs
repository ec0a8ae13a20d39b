//! HTTP client for the case.dev legal-AI API.
//!
//! `ApiClient` is an explicit service instance built from a [`ClientConfig`]
//! and a [`CredentialResolver`]. Every backend call goes through
//! [`ApiClient::execute`], which resolves the API key, applies bearer auth,
//! enforces the per-request deadline and decodes the response into the
//! requested shape. Domain methods (vault uploads, OCR and transcription
//! jobs, search, research, formatting) live in the submodules.

pub mod credentials;
pub mod format;
pub mod jobs;
pub mod ocr;
pub mod research;
pub mod search;
pub mod transcription;
pub mod vault;

use anyhow::Context;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::borrow::Cow;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub use credentials::{
    AuthFileCredential, ConfigCredential, Credential, CredentialResolver, CredentialSource,
    EnvCredential,
};
pub use jobs::{JobKind, Ocr, Transcription};
pub use thurgood_core::{ClientConfig, ClientError, ClientResult};

/// How a successful response body is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    Json,
    Text,
    Bytes,
}

/// Decoded response body.
#[derive(Debug, Clone)]
pub enum ResponseBody {
    Json(serde_json::Value),
    Text(String),
    Bytes(Bytes),
}

impl ResponseBody {
    pub fn into_json(self) -> ClientResult<serde_json::Value> {
        match self {
            ResponseBody::Json(value) => Ok(value),
            _ => Err(ClientError::schema("expected a JSON response body")),
        }
    }

    pub fn into_text(self) -> ClientResult<String> {
        match self {
            ResponseBody::Text(text) => Ok(text),
            _ => Err(ClientError::schema("expected a text response body")),
        }
    }

    pub fn into_bytes(self) -> ClientResult<Bytes> {
        match self {
            ResponseBody::Bytes(bytes) => Ok(bytes),
            _ => Err(ClientError::schema("expected a binary response body")),
        }
    }

    /// Raw bytes of the body whatever its shape, for writing to disk.
    pub fn into_vec(self) -> ClientResult<Vec<u8>> {
        match self {
            ResponseBody::Json(value) => serde_json::to_vec_pretty(&value)
                .map_err(|e| ClientError::schema(format!("Failed to encode JSON: {}", e))),
            ResponseBody::Text(text) => Ok(text.into_bytes()),
            ResponseBody::Bytes(bytes) => Ok(bytes.to_vec()),
        }
    }
}

/// One authenticated exchange with the backend.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    method: Method,
    path: String,
    body: Option<serde_json::Value>,
    headers: Vec<(String, String)>,
    timeout: Option<Duration>,
    shape: ResponseShape,
}

impl RequestSpec {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            headers: Vec::new(),
            timeout: None,
            shape: ResponseShape::Json,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn json_body<B: Serialize + ?Sized>(mut self, body: &B) -> ClientResult<Self> {
        let value = serde_json::to_value(body).map_err(|e| {
            ClientError::validation(format!("Failed to serialize request body: {}", e))
        })?;
        self.body = Some(value);
        Ok(self)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Override the client's default deadline for this call.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn expect(mut self, shape: ResponseShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn shape(&self) -> ResponseShape {
        self.shape
    }

    fn overrides_content_type(&self) -> bool {
        self.headers
            .iter()
            .any(|(name, _)| name.eq_ignore_ascii_case(CONTENT_TYPE.as_str()))
    }
}

/// HTTP client for the case.dev API.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    credentials: Arc<CredentialResolver>,
    request_timeout: Duration,
    transfer_timeout: Duration,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, credentials: CredentialResolver) -> anyhow::Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .user_agent(concat!("thurgood/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials: Arc::new(credentials),
            request_timeout: Duration::from_millis(config.request_timeout_ms),
            transfer_timeout: Duration::from_millis(config.transfer_timeout_ms),
        })
    }

    /// Client with the standard credential chain (environment, auth file, config).
    pub fn from_config(config: &ClientConfig) -> anyhow::Result<Self> {
        Self::new(config, CredentialResolver::standard(config))
    }

    /// Create client from environment: see [`ClientConfig::from_env`].
    pub fn from_env() -> anyhow::Result<Self> {
        let config = ClientConfig::from_env()?;
        Self::from_config(&config)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Perform one authenticated exchange and decode the body as `spec` asks.
    pub async fn execute(&self, spec: RequestSpec) -> ClientResult<ResponseBody> {
        // The auth file is read with blocking I/O on every request.
        let resolver = Arc::clone(&self.credentials);
        let credential = tokio::task::spawn_blocking(move || resolver.resolve())
            .await
            .ok()
            .flatten()
            .ok_or(ClientError::MissingCredential)?;

        let timeout = spec.timeout.unwrap_or(self.request_timeout);
        let url = self.build_url(&spec.path);

        let mut request = self
            .client
            .request(spec.method.clone(), &url)
            .bearer_auth(credential.expose());

        if !spec.overrides_content_type() {
            request = request.header(CONTENT_TYPE, "application/json");
        }
        for (name, value) in &spec.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &spec.body {
            let encoded = serde_json::to_vec(body).map_err(|e| {
                ClientError::validation(format!("Failed to serialize request body: {}", e))
            })?;
            request = request.body(encoded);
        }

        let started = Instant::now();
        let deadline = tokio::time::Instant::now() + timeout;
        let shape = spec.shape;
        let method = &spec.method;
        let path = spec.path.as_str();
        let result = async {
            let response = with_deadline(deadline, timeout, async move {
                request.send().await.map_err(network_error)
            })
            .await?;
            tracing::debug!(
                method = %method,
                path = %path,
                status = response.status().as_u16(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "API response received"
            );
            let response = ensure_success(response, deadline).await?;
            with_deadline(deadline, timeout, decode(response, shape)).await
        }
        .await;

        if let Err(err) = &result {
            tracing::debug!(
                method = %spec.method,
                path = %spec.path,
                elapsed_ms = started.elapsed().as_millis() as u64,
                error = %err,
                "API request failed"
            );
        }

        result
    }

    /// Execute and decode a JSON body into `T`, failing with `Schema` on mismatch.
    pub async fn execute_json<T: DeserializeOwned>(&self, spec: RequestSpec) -> ClientResult<T> {
        let spec = spec.expect(ResponseShape::Json);
        let path = spec.path.clone();
        let value = self.execute(spec).await?.into_json()?;
        serde_json::from_value(value)
            .map_err(|e| ClientError::schema(format!("{} returned an unexpected payload: {}", path, e)))
    }

    /// Transfer bytes to a presigned storage URL. No bearer header is sent.
    pub async fn put_blob(&self, url: &str, content_type: &str, data: Vec<u8>) -> ClientResult<()> {
        let request = self
            .client
            .put(url)
            .header(CONTENT_TYPE, content_type)
            .body(data);

        let timeout = self.transfer_timeout;
        let deadline = tokio::time::Instant::now() + timeout;
        let response = with_deadline(deadline, timeout, async move {
            request.send().await.map_err(network_error)
        })
        .await?;
        ensure_success(response, deadline).await?;
        Ok(())
    }
}

/// Run `step` until `deadline`. Dropping the future on expiry aborts the
/// in-flight request. `timeout` is the configured value reported on expiry.
async fn with_deadline<T, F>(
    deadline: tokio::time::Instant,
    timeout: Duration,
    step: F,
) -> ClientResult<T>
where
    F: Future<Output = ClientResult<T>>,
{
    match tokio::time::timeout_at(deadline, step).await {
        Ok(result) => result,
        Err(_) => Err(ClientError::Timeout {
            timeout_ms: timeout.as_millis() as u64,
        }),
    }
}

/// Turn a non-success status into `Http`. The error body is read best-effort
/// until `deadline`; a body that stalls or fails comes back empty and the
/// status is kept.
async fn ensure_success(
    response: Response,
    deadline: tokio::time::Instant,
) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = match tokio::time::timeout_at(deadline, response.text()).await {
        Ok(Ok(body)) => body,
        _ => String::new(),
    };
    Err(ClientError::Http {
        status: status.as_u16(),
        body,
    })
}

async fn decode(response: Response, shape: ResponseShape) -> ClientResult<ResponseBody> {
    match shape {
        ResponseShape::Json => {
            let raw = response.bytes().await.map_err(network_error)?;
            let value = serde_json::from_slice(&raw)
                .map_err(|e| ClientError::schema(format!("Failed to parse response as JSON: {}", e)))?;
            Ok(ResponseBody::Json(value))
        }
        ResponseShape::Text => Ok(ResponseBody::Text(
            response.text().await.map_err(network_error)?,
        )),
        ResponseShape::Bytes => Ok(ResponseBody::Bytes(
            response.bytes().await.map_err(network_error)?,
        )),
    }
}

fn network_error(err: reqwest::Error) -> ClientError {
    ClientError::Network(err.to_string())
}

/// Percent-encode one path segment (ids supplied by callers).
pub(crate) fn segment(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}

pub(crate) fn require(name: &str, value: &str) -> ClientResult<()> {
    if value.trim().is_empty() {
        return Err(ClientError::validation(format!("{} must not be empty", name)));
    }
    Ok(())
}

/// Write downloaded bytes, creating parent directories as needed.
pub(crate) async fn write_file(path: &Path, data: &[u8]) -> ClientResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, data).await?;
    Ok(())
}

// Re-export domain types for convenience.
pub use thurgood_core::models::{
    FormattedDocument, IngestionTrigger, ObjectList, ObjectText, OcrDownload, OcrFormat, OcrJob,
    ResearchModel, ResearchReport, SearchMethod, SearchOutcome, SearchQuery, TranscriptionJob,
    UploadOutcome, Vault, VaultList,
};
