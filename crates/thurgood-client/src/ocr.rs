use std::path::Path;
use thurgood_core::models::{OcrDownload, OcrFormat, OcrJob, OcrRequest};
use thurgood_core::{ClientError, ClientResult};
use validator::Validate;

use crate::jobs::Ocr;
use crate::{require, segment, write_file, ApiClient, RequestSpec, ResponseBody, ResponseShape};

impl ApiClient {
    /// Submit a document for OCR. Returns the job in its initial state.
    pub async fn submit_ocr(&self, request: &OcrRequest) -> ClientResult<OcrJob> {
        request.validate()?;
        let job: OcrJob = self
            .execute_json(RequestSpec::post("/ocr/v1/process").json_body(request)?)
            .await?;
        tracing::info!(job_id = %job.record.id, "OCR job submitted");
        Ok(job)
    }

    pub async fn ocr_status(&self, job_id: &str) -> ClientResult<OcrJob> {
        self.poll_job::<Ocr>(job_id).await
    }

    /// Download an OCR result.
    ///
    /// Text and JSON come back inline unless `save_to` is given. PDF output
    /// must be saved, and asking for it without a path fails before any
    /// request is made.
    pub async fn download_ocr(
        &self,
        job_id: &str,
        format: OcrFormat,
        save_to: Option<&Path>,
    ) -> ClientResult<OcrDownload> {
        require("job_id", job_id)?;
        if format.requires_save_target() && save_to.is_none() {
            return Err(ClientError::validation(format!(
                "OCR {} output is binary; provide a path to save it to",
                format
            )));
        }

        // Saved results are written exactly as the backend sent them.
        let shape = match (format, save_to) {
            (_, Some(_)) | (OcrFormat::Pdf, None) => ResponseShape::Bytes,
            (OcrFormat::Text, None) => ResponseShape::Text,
            (OcrFormat::Json, None) => ResponseShape::Json,
        };
        let body = self
            .execute(
                RequestSpec::get(format!(
                    "/ocr/v1/{}/download/{}",
                    segment(job_id),
                    format.as_str()
                ))
                .expect(shape),
            )
            .await?;

        if let Some(path) = save_to {
            let data = body.into_vec()?;
            write_file(path, &data).await?;
            return Ok(OcrDownload::Saved {
                format,
                path: path.to_path_buf(),
                size_bytes: data.len() as u64,
            });
        }

        match body {
            ResponseBody::Text(text) => Ok(OcrDownload::Text { text }),
            ResponseBody::Json(document) => Ok(OcrDownload::Json { document }),
            ResponseBody::Bytes(_) => Err(ClientError::validation(
                "Binary OCR output requires a save path",
            )),
        }
    }
}
