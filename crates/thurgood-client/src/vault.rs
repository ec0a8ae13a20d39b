//! Vault management and the upload pipeline.
//!
//! An upload is three calls: request a presigned slot, PUT the bytes to the
//! slot URL, then (optionally) start indexing. A failed transfer aborts the
//! pipeline. A failed indexing trigger does not, because the bytes are
//! already stored.

use bytes::Bytes;
use std::path::{Component, Path};
use std::time::Instant;
use thurgood_core::content_type_for;
use thurgood_core::models::{
    CreateVaultRequest, IngestResponse, IngestionTrigger, ObjectList, ObjectText, UploadOutcome,
    UploadSession, UploadSlotRequest, Vault, VaultList,
};
use thurgood_core::{ClientError, ClientResult};
use validator::Validate;

use crate::{require, segment, write_file, ApiClient, RequestSpec, ResponseShape};

impl ApiClient {
    pub async fn create_vault(&self, name: &str, description: Option<&str>) -> ClientResult<Vault> {
        let request = CreateVaultRequest {
            name: name.trim().to_string(),
            description: description.map(str::to_string),
        };
        request.validate()?;

        self.execute_json(RequestSpec::post("/vault").json_body(&request)?)
            .await
    }

    pub async fn list_vaults(&self) -> ClientResult<VaultList> {
        self.execute_json(RequestSpec::get("/vault")).await
    }

    pub async fn list_objects(&self, vault_id: &str) -> ClientResult<ObjectList> {
        require("vault_id", vault_id)?;
        self.execute_json(RequestSpec::get(format!("/vault/{}/objects", segment(vault_id))))
            .await
    }

    /// Extracted text of an indexed object.
    pub async fn object_text(&self, vault_id: &str, object_id: &str) -> ClientResult<ObjectText> {
        require("vault_id", vault_id)?;
        require("object_id", object_id)?;
        self.execute_json(RequestSpec::get(format!(
            "/vault/{}/objects/{}/text",
            segment(vault_id),
            segment(object_id)
        )))
        .await
    }

    /// Original bytes of a stored object.
    pub async fn download_object(&self, vault_id: &str, object_id: &str) -> ClientResult<Bytes> {
        require("vault_id", vault_id)?;
        require("object_id", object_id)?;
        self.execute(
            RequestSpec::get(format!(
                "/vault/{}/objects/{}/download",
                segment(vault_id),
                segment(object_id)
            ))
            .expect(ResponseShape::Bytes),
        )
        .await?
        .into_bytes()
    }

    /// Download an object to `path`, returning the number of bytes written.
    pub async fn save_object(
        &self,
        vault_id: &str,
        object_id: &str,
        path: &Path,
    ) -> ClientResult<u64> {
        let data = self.download_object(vault_id, object_id).await?;
        write_file(path, &data).await?;
        Ok(data.len() as u64)
    }

    /// Ask the backend for a presigned write slot.
    pub async fn request_upload_slot(
        &self,
        vault_id: &str,
        request: &UploadSlotRequest,
    ) -> ClientResult<UploadSession> {
        require("vault_id", vault_id)?;
        request.validate()?;
        self.execute_json(
            RequestSpec::post(format!("/vault/{}/upload", segment(vault_id))).json_body(request)?,
        )
        .await
    }

    /// Start indexing a stored object.
    pub async fn trigger_ingestion(
        &self,
        vault_id: &str,
        object_id: &str,
    ) -> ClientResult<IngestResponse> {
        self.execute_json(RequestSpec::post(format!(
            "/vault/{}/ingest/{}",
            segment(vault_id),
            segment(object_id)
        )))
        .await
    }

    /// Upload a local file into a vault.
    pub async fn upload_file(
        &self,
        vault_id: &str,
        path: &Path,
        auto_index: bool,
    ) -> ClientResult<UploadOutcome> {
        if path.components().any(|c| c == Component::ParentDir) {
            return Err(ClientError::validation(format!(
                "Path must not contain '..': {}",
                path.display()
            )));
        }

        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                ClientError::validation(format!("Path has no file name: {}", path.display()))
            })?
            .to_string();

        let data = tokio::fs::read(path).await?;
        self.upload_bytes(vault_id, &filename, data, auto_index)
            .await
    }

    /// Run the slot, transfer and indexing steps for in-memory content.
    pub async fn upload_bytes(
        &self,
        vault_id: &str,
        filename: &str,
        data: Vec<u8>,
        auto_index: bool,
    ) -> ClientResult<UploadOutcome> {
        let content_type = content_type_for(filename);
        let size_bytes = data.len() as u64;
        let slot = UploadSlotRequest {
            filename: filename.to_string(),
            content_type: content_type.to_string(),
            size_bytes,
            auto_index,
        };

        let session = self.request_upload_slot(vault_id, &slot).await?;
        tracing::info!(
            vault_id = %vault_id,
            object_id = %session.object_id,
            size_bytes,
            "Upload slot issued"
        );

        if session.is_expired_at(Instant::now()) {
            return Err(ClientError::validation(format!(
                "Upload slot for {} expired before the transfer started",
                session.object_id
            )));
        }

        self.put_blob(&session.upload_url, content_type, data).await?;
        tracing::debug!(object_id = %session.object_id, "Object bytes transferred");

        let (ingestion, ingestion_error) = self.start_ingestion(vault_id, &session, auto_index).await;

        Ok(UploadOutcome {
            object_id: session.object_id,
            filename: filename.to_string(),
            content_type: content_type.to_string(),
            size_bytes,
            auto_index,
            ingestion,
            ingestion_error,
            storage_key: session.storage_key,
        })
    }

    async fn start_ingestion(
        &self,
        vault_id: &str,
        session: &UploadSession,
        auto_index: bool,
    ) -> (IngestionTrigger, Option<String>) {
        if !auto_index || !session.has_next_step() {
            return (IngestionTrigger::Skipped, None);
        }

        match self.trigger_ingestion(vault_id, &session.object_id).await {
            Ok(_) => (IngestionTrigger::Started, None),
            Err(e) => {
                tracing::warn!(
                    object_id = %session.object_id,
                    error = %e,
                    "Object stored but ingestion failed to start"
                );
                (IngestionTrigger::FailedToStart, Some(e.to_string()))
            }
        }
    }
}
