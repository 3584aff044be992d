use std::fmt;

use mg_core::ArtifactFormat;
use serde_json::Value;

/// Response fields that may carry the id of a newly created job, in the
/// order they are tried. Different deployments of the service disagree.
pub const JOB_ID_FIELDS: [&str; 3] = ["task_id", "result", "id"];

/// Identifier of one in-flight generation job.
///
/// Not `Clone`: a handle belongs to the submission that produced it and
/// the polling loop consumes it.
#[derive(Debug, PartialEq, Eq)]
pub struct JobHandle(String);

impl JobHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// First non-empty id among [`JOB_ID_FIELDS`]; numeric ids are kept as their decimal text.
pub(crate) fn extract_job_id(body: &Value) -> Option<String> {
    JOB_ID_FIELDS
        .iter()
        .filter_map(|field| match body.get(*field)? {
            Value::String(id) => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        })
        .find(|id| !id.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobPhase {
    Pending,
    Running,
    Succeeded,
    Failed,
}

impl JobPhase {
    /// Map the service's free-form status string onto a phase.
    pub fn from_service(status: &str) -> Self {
        match status.trim().to_ascii_lowercase().as_str() {
            "completed" | "finished" | "succeeded" => Self::Succeeded,
            "failed" | "error" => Self::Failed,
            "pending" | "queued" => Self::Pending,
            _ => Self::Running,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

/// One snapshot of a job, as reported by a single poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobStatus {
    pub phase: JobPhase,
    pub progress: u8,
    pub result_location: Option<String>,
}

impl JobStatus {
    pub fn from_response(body: &Value, format: ArtifactFormat) -> Self {
        let phase = JobPhase::from_service(
            body.get("status").and_then(Value::as_str).unwrap_or("pending"),
        );
        let progress = body.get("progress").map(parse_percent).unwrap_or(0);

        let result_location = match phase {
            JobPhase::Succeeded => body
                .get("model_urls")
                .and_then(|urls| urls.get(format.result_key()))
                .and_then(Value::as_str)
                .filter(|url| !url.is_empty())
                .map(str::to_string),
            _ => None,
        };

        Self {
            phase,
            progress,
            result_location,
        }
    }
}

fn parse_percent(value: &Value) -> u8 {
    let raw = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    raw.filter(|p| p.is_finite())
        .map(|p| p.round().clamp(0.0, 100.0) as u8)
        .unwrap_or(0)
}
