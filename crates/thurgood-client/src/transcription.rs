use thurgood_core::models::{TranscriptionJob, TranscriptionRequest};
use thurgood_core::ClientResult;

use crate::jobs::Transcription;
use crate::{ApiClient, RequestSpec};

impl ApiClient {
    /// Start transcribing audio from a vault object or a public URL.
    ///
    /// Build the request with [`TranscriptionSource::from_parts`] to get the
    /// missing / conflicting source checks before anything is sent.
    ///
    /// [`TranscriptionSource::from_parts`]: thurgood_core::models::TranscriptionSource::from_parts
    pub async fn submit_transcription(
        &self,
        request: &TranscriptionRequest,
    ) -> ClientResult<TranscriptionJob> {
        let job: TranscriptionJob = self
            .execute_json(RequestSpec::post("/voice/transcription").json_body(request)?)
            .await?;
        tracing::info!(job_id = %job.record.id, "Transcription job submitted");
        Ok(job)
    }

    pub async fn transcription_status(&self, job_id: &str) -> ClientResult<TranscriptionJob> {
        self.poll_job::<Transcription>(job_id).await
    }
}
