//! Polling for asynchronous backend jobs.
//!
//! A poll is a plain read: it never resubmits the job or changes it, so the
//! same id can be polled any number of times.

use thurgood_core::models::{Job, OcrJob, TranscriptionJob};
use thurgood_core::ClientResult;

use crate::{require, segment, ApiClient, RequestSpec};

/// A kind of asynchronous job the backend runs.
pub trait JobKind {
    type Snapshot: Job;

    const LABEL: &'static str;

    fn status_path(job_id: &str) -> String;
}

/// Document OCR (`/ocr/v1`).
#[derive(Debug, Clone, Copy)]
pub struct Ocr;

impl JobKind for Ocr {
    type Snapshot = OcrJob;

    const LABEL: &'static str = "ocr";

    fn status_path(job_id: &str) -> String {
        format!("/ocr/v1/{}", segment(job_id))
    }
}

/// Audio transcription (`/voice/transcription`).
#[derive(Debug, Clone, Copy)]
pub struct Transcription;

impl JobKind for Transcription {
    type Snapshot = TranscriptionJob;

    const LABEL: &'static str = "transcription";

    fn status_path(job_id: &str) -> String {
        format!("/voice/transcription/{}", segment(job_id))
    }
}

impl ApiClient {
    /// Fetch the current snapshot of a job.
    pub async fn poll_job<K: JobKind>(&self, job_id: &str) -> ClientResult<K::Snapshot> {
        require("job_id", job_id)?;
        let snapshot: K::Snapshot = self
            .execute_json(RequestSpec::get(K::status_path(job_id)))
            .await?;

        tracing::debug!(
            kind = K::LABEL,
            job_id = %job_id,
            status = %snapshot.status(),
            "Polled job"
        );
        Ok(snapshot)
    }
}
