//! Domain types mirroring the shorts service's JSON wire format.
//!
//! [`ShortJob`] is a snapshot of a server-owned record; the client never
//! mutates one, it only replaces its local copy with a fresher fetch.
//! Status parsing is deliberately permissive: the service may grow new
//! intermediate statuses, and anything unrecognised must be treated as
//! "still running" rather than rejected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Payload for a short generation request.
///
/// Field-level validation (URL shape, positive duration) happens in the
/// caller before a request is constructed; the client submits it as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Source video URL on YouTube.
    pub youtube_url: String,
    /// Desired length of the short in seconds. Always > 0.
    pub duration: u32,
    /// Offset into the source video in seconds. Omitted when `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f64>,
}

impl GenerationRequest {
    /// Build a request with no start offset.
    pub fn new(youtube_url: impl Into<String>, duration: u32) -> Self {
        Self {
            youtube_url: youtube_url.into(),
            duration,
            start_time: None,
        }
    }
}

/// Processing status of a [`ShortJob`].
///
/// `Other` captures any status string this client does not know about.
/// Unknown statuses are non-terminal by contract: the poll loop keeps
/// going until the service reports `completed` or `failed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Other(String),
}

impl JobStatus {
    /// Whether polling should stop at this status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// The wire representation of this status.
    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Other(s) => s,
        }
    }
}

impl From<String> for JobStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "pending" => JobStatus::Pending,
            "processing" => JobStatus::Processing,
            "completed" => JobStatus::Completed,
            "failed" => JobStatus::Failed,
            _ => JobStatus::Other(value),
        }
    }
}

impl From<JobStatus> for String {
    fn from(value: JobStatus) -> Self {
        value.as_str().to_string()
    }
}

impl Default for JobStatus {
    /// A job whose status is missing from the payload counts as pending,
    /// which keeps the poll loop alive.
    fn default() -> Self {
        JobStatus::Pending
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Server-side record of one short generation job.
///
/// Matches the service's serializer output:
/// `{id, youtube_url, duration, start_time, status, error_message, file,
/// file_url, created_at, updated_at}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortJob {
    /// Server-assigned job ID, used for status polling.
    pub id: i64,
    pub youtube_url: String,
    /// Length of the short in seconds.
    pub duration: f64,
    /// Offset into the source video in seconds.
    #[serde(default)]
    pub start_time: f64,
    #[serde(default)]
    pub status: JobStatus,
    /// Human-readable failure reason; empty unless the job failed.
    #[serde(default)]
    pub error_message: String,
    /// Relative storage path of the rendered file, if any.
    #[serde(default)]
    pub file: Option<String>,
    /// Absolute URL of the rendered file, if any.
    #[serde(default)]
    pub file_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Externally visible state of the generation controller.
///
/// Presentation code renders exactly this tuple; it is replaced wholesale
/// on every controller transition.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ControllerState {
    /// Most recently fetched job snapshot, if any.
    pub job: Option<ShortJob>,
    /// Whether a submission or poll loop is in flight.
    pub is_loading: bool,
    /// User-facing failure message, if the last submission failed.
    pub error: Option<String>,
}
