//! Kind-agnostic view of asynchronous backend jobs (OCR, transcription).

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Coarse lifecycle phase shared by every job kind.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum JobPhase {
    Waiting,
    Running,
    Succeeded,
    Failed,
}

impl JobPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobPhase::Succeeded | JobPhase::Failed)
    }

    /// Display symbol for status lines. Presentation only.
    pub fn symbol(&self) -> &'static str {
        match self {
            JobPhase::Waiting => "⏳",
            JobPhase::Running => "🔄",
            JobPhase::Succeeded => "✅",
            JobPhase::Failed => "❌",
        }
    }
}

/// Status enum of one job kind.
pub trait JobStatus:
    Copy + Eq + Display + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Status a freshly submitted job starts in.
    fn initial() -> Self;

    fn phase(&self) -> JobPhase;

    fn is_terminal(&self) -> bool {
        self.phase().is_terminal()
    }
}

/// Fields every job snapshot carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "S: JobStatus"))]
pub struct JobRecord<S> {
    #[serde(alias = "jobId", alias = "job_id")]
    pub id: String,
    #[serde(default = "S::initial")]
    pub status: S,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A polled job snapshot with its kind-specific payload.
pub trait Job: Serialize + DeserializeOwned + Send {
    type Status: JobStatus;

    fn record(&self) -> &JobRecord<Self::Status>;

    fn id(&self) -> &str {
        &self.record().id
    }

    fn status(&self) -> Self::Status {
        self.record().status
    }

    fn phase(&self) -> JobPhase {
        self.record().status.phase()
    }
}

/// One-line summary: symbol, id and backend status, plus progress if known.
pub fn status_line<J: Job>(job: &J) -> String {
    let record = job.record();
    let mut line = format!("{} {} {}", job.phase().symbol(), record.id, record.status);
    if let Some(progress) = record.progress {
        line.push_str(&format!(" ({:.0}%)", progress));
    }
    line
}
