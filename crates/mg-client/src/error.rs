use std::time::Duration;

use thiserror::Error;

use crate::transport::TransportError;

pub type Result<T> = std::result::Result<T, GenerationError>;

/// Failure of a single exchange with the generation service
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Malformed response body: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("No job identifier in response (looked for {tried})")]
    MissingJobId { tried: String },
}

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] TransportError),

    #[error("Failed to send image: {0}")]
    Submission(#[source] RequestError),

    #[error("Failed to check progress: {0}")]
    Poll(#[source] RequestError),

    #[error("Model generation failed for job {job_id}")]
    JobFailed { job_id: String },

    #[error("Job {job_id} finished without a download URL")]
    MissingResultUrl { job_id: String },

    #[error("Failed to retrieve model file: {0}")]
    Fetch(#[source] RequestError),

    #[error("Job {job_id} still unfinished after {polls} polls ({elapsed:?})")]
    TimedOut {
        job_id: String,
        polls: u32,
        elapsed: Duration,
    },

    #[error("Job {job_id} was cancelled")]
    Cancelled { job_id: String },

    #[error("Failed to encode image: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Core(#[from] mg_core::error::Error),
}
