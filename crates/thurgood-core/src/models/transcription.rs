use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use super::job::{Job, JobPhase, JobRecord, JobStatus};
use crate::error::{ClientError, ClientResult};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptionStatus {
    Queued,
    Processing,
    Completed,
    Error,
}

impl Display for TranscriptionStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            TranscriptionStatus::Queued => write!(f, "queued"),
            TranscriptionStatus::Processing => write!(f, "processing"),
            TranscriptionStatus::Completed => write!(f, "completed"),
            TranscriptionStatus::Error => write!(f, "error"),
        }
    }
}

impl FromStr for TranscriptionStatus {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queued" => Ok(TranscriptionStatus::Queued),
            "processing" => Ok(TranscriptionStatus::Processing),
            "completed" => Ok(TranscriptionStatus::Completed),
            "error" => Ok(TranscriptionStatus::Error),
            _ => Err(ClientError::validation(format!(
                "Invalid transcription status: {}",
                s
            ))),
        }
    }
}

impl JobStatus for TranscriptionStatus {
    fn initial() -> Self {
        TranscriptionStatus::Queued
    }

    fn phase(&self) -> JobPhase {
        match self {
            TranscriptionStatus::Queued => JobPhase::Waiting,
            TranscriptionStatus::Processing => JobPhase::Running,
            TranscriptionStatus::Completed => JobPhase::Succeeded,
            TranscriptionStatus::Error => JobPhase::Failed,
        }
    }
}

/// Where the audio to transcribe comes from. The two modes are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TranscriptionSource {
    Vault { vault_id: String, object_id: String },
    Url { audio_url: String },
}

impl TranscriptionSource {
    /// Pick the entry mode from loosely supplied parameters.
    ///
    /// Exactly one of the vault pair (`vault_id` + `object_id`) or `audio_url`
    /// must be present. Blank strings count as absent.
    pub fn from_parts(
        vault_id: Option<String>,
        object_id: Option<String>,
        audio_url: Option<String>,
    ) -> ClientResult<Self> {
        let present = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        match (present(vault_id), present(object_id), present(audio_url)) {
            (Some(vault_id), Some(object_id), None) => {
                Ok(TranscriptionSource::Vault { vault_id, object_id })
            }
            (None, None, Some(audio_url)) => Ok(TranscriptionSource::Url { audio_url }),
            (None, None, None) => Err(ClientError::validation(
                "Provide either vault_id and object_id (vault mode) or audio_url (direct mode)",
            )),
            (_, _, Some(_)) => Err(ClientError::validation(
                "vault_id/object_id and audio_url are mutually exclusive; supply only one mode",
            )),
            _ => Err(ClientError::validation(
                "vault_id and object_id must be supplied together",
            )),
        }
    }
}

/// `POST /voice/transcription` body
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptionRequest {
    #[serde(flatten)]
    pub source: TranscriptionSource,
    /// Request diarization (per-speaker utterances)
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub speaker_labels: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
}

impl TranscriptionRequest {
    pub fn new(source: TranscriptionSource) -> Self {
        Self {
            source,
            speaker_labels: false,
            language_code: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    pub text: String,
    pub start: f64,
    pub end: f64,
    pub speaker: String,
}

/// Transcription job snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionJob {
    #[serde(flatten)]
    pub record: JobRecord<TranscriptionStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utterances: Option<Vec<Utterance>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, alias = "audioDuration", skip_serializing_if = "Option::is_none")]
    pub audio_duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Transcript content of a completed job
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transcript<'a> {
    Diarized(&'a [Utterance]),
    Flat(&'a str),
    /// Neither text nor utterances were returned
    Empty,
}

impl TranscriptionJob {
    pub fn transcript(&self) -> Transcript<'_> {
        if let Some(utterances) = self.utterances.as_deref().filter(|u| !u.is_empty()) {
            return Transcript::Diarized(utterances);
        }
        match self.text.as_deref().filter(|t| !t.trim().is_empty()) {
            Some(text) => Transcript::Flat(text),
            None => Transcript::Empty,
        }
    }

    /// Transcript rendered as plain text, one line per utterance when diarized.
    pub fn transcript_text(&self) -> Option<String> {
        match self.transcript() {
            Transcript::Diarized(utterances) => Some(
                utterances
                    .iter()
                    .map(|u| format!("Speaker {}: {}", u.speaker, u.text))
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            Transcript::Flat(text) => Some(text.to_string()),
            Transcript::Empty => None,
        }
    }
}

impl Job for TranscriptionJob {
    type Status = TranscriptionStatus;

    fn record(&self) -> &JobRecord<TranscriptionStatus> {
        &self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_source_requires_exactly_one_mode() {
        let vault = TranscriptionSource::from_parts(
            Some("v_1".to_string()),
            Some("obj_1".to_string()),
            None,
        )
        .unwrap();
        assert!(matches!(vault, TranscriptionSource::Vault { .. }));

        let url =
            TranscriptionSource::from_parts(None, None, Some("https://a/b.mp3".to_string()))
                .unwrap();
        assert!(matches!(url, TranscriptionSource::Url { .. }));

        let none = TranscriptionSource::from_parts(None, None, None).unwrap_err();
        assert!(matches!(none, ClientError::Validation(_)));

        let both = TranscriptionSource::from_parts(
            Some("v_1".to_string()),
            Some("obj_1".to_string()),
            Some("https://a/b.mp3".to_string()),
        )
        .unwrap_err();
        assert!(both.to_string().contains("mutually exclusive"));

        let half = TranscriptionSource::from_parts(Some("v_1".to_string()), None, None)
            .unwrap_err();
        assert!(half.to_string().contains("together"));

        let blank =
            TranscriptionSource::from_parts(Some(" ".to_string()), None, Some(String::new()));
        assert!(blank.is_err());
    }

    #[test]
    fn test_request_body_shape() {
        let mut request = TranscriptionRequest::new(TranscriptionSource::Vault {
            vault_id: "v_1".to_string(),
            object_id: "obj_1".to_string(),
        });
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "vault_id": "v_1", "object_id": "obj_1" })
        );

        request.speaker_labels = true;
        request.source = TranscriptionSource::Url {
            audio_url: "https://a/b.mp3".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "audio_url": "https://a/b.mp3", "speaker_labels": true })
        );
    }

    #[test]
    fn test_transcript_prefers_utterances() {
        let job: TranscriptionJob = serde_json::from_value(json!({
            "id": "tr_1",
            "status": "completed",
            "text": "Hello. Objection.",
            "utterances": [
                {"text": "Hello.", "start": 0, "end": 900, "speaker": "A"},
                {"text": "Objection.", "start": 1000, "end": 1800, "speaker": "B"}
            ]
        }))
        .unwrap();
        assert!(matches!(job.transcript(), Transcript::Diarized(u) if u.len() == 2));
        assert_eq!(
            job.transcript_text().unwrap(),
            "Speaker A: Hello.\nSpeaker B: Objection."
        );
    }

    #[test]
    fn test_transcript_absent_is_empty_not_error() {
        let job: TranscriptionJob =
            serde_json::from_value(json!({ "id": "tr_2", "status": "completed" })).unwrap();
        assert_eq!(job.transcript(), Transcript::Empty);
        assert!(job.transcript_text().is_none());

        let queued: TranscriptionJob = serde_json::from_value(json!({ "id": "tr_3" })).unwrap();
        assert_eq!(queued.status(), TranscriptionStatus::Queued);
        assert_eq!(queued.phase(), JobPhase::Waiting);
    }

    #[test]
    fn test_error_status_is_terminal_failure() {
        assert_eq!(TranscriptionStatus::Error.phase(), JobPhase::Failed);
        assert!(TranscriptionStatus::Error.is_terminal());
        assert_eq!(
            "error".parse::<TranscriptionStatus>().unwrap(),
            TranscriptionStatus::Error
        );
    }
}
