//! Client for an image-to-3D generation service.
//!
//! Submits an uploaded image, polls the resulting job until it reaches a
//! terminal phase and fetches the finished mesh. Each step blocks the calling
//! thread; see [`GenerationJobPoller`].

pub mod artifact;
pub mod config;
pub mod error;
pub mod job;
pub mod poller;
pub mod request;
pub mod transport;

pub use artifact::{DownloadableFile, MeshArtifact};
pub use config::GeneratorConfig;
pub use error::{GenerationError, RequestError, Result};
pub use job::{JobHandle, JobPhase, JobStatus};
pub use poller::GenerationJobPoller;
pub use request::GenerationRequest;
pub use tokio_util::sync::CancellationToken;
