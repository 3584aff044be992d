use std::thread;
use std::time::{Duration, Instant};

use log::{debug, error, info, warn};
use mg_core::progress::ProgressTracker;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::artifact::MeshArtifact;
use crate::config::GeneratorConfig;
use crate::error::{GenerationError, RequestError, Result};
use crate::job::{JOB_ID_FIELDS, JobHandle, JobPhase, JobStatus, extract_job_id};
use crate::request::GenerationRequest;
use crate::transport::{HttpTransport, Transport};

/// Longest uninterrupted sleep between cancellation checks
const SLEEP_SLICE: Duration = Duration::from_millis(100);

/// Drives one image-to-3D job from submission to a fetched artifact.
///
/// Every call blocks the current thread. Run it on a worker thread when the
/// caller needs to stay responsive.
pub struct GenerationJobPoller<T = HttpTransport> {
    transport: T,
    config: GeneratorConfig,
}

impl GenerationJobPoller<HttpTransport> {
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        let transport =
            HttpTransport::new(config.request_timeout).map_err(GenerationError::Client)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> GenerationJobPoller<T> {
    pub fn with_transport(config: GeneratorConfig, transport: T) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Encode `image` with the configured options and submit it.
    pub fn submit(&self, image: &[u8]) -> Result<JobHandle> {
        let request = GenerationRequest::from_image_bytes(image, self.config.options)?;
        self.submit_request(&request)
    }

    pub fn submit_request(&self, request: &GenerationRequest) -> Result<JobHandle> {
        let handle = self
            .try_submit(request)
            .map_err(GenerationError::Submission)?;

        info!("Job {handle} accepted");
        Ok(handle)
    }

    fn try_submit(
        &self,
        request: &GenerationRequest,
    ) -> std::result::Result<JobHandle, RequestError> {
        let url = self.config.submit_url();
        let body = serde_json::to_value(request)?;

        info!("Sending image to {url}");
        let response = self.transport.post_json(&url, &self.config.api_key, &body)?;

        if !matches!(response.status, 200 | 202) {
            return Err(RequestError::Status {
                status: response.status,
                body: response.text(),
            });
        }

        let json: Value = serde_json::from_slice(&response.body)?;
        let id = extract_job_id(&json).ok_or_else(|| RequestError::MissingJobId {
            tried: JOB_ID_FIELDS.join(", "),
        })?;

        Ok(JobHandle::new(id))
    }

    /// Ask the service for the current state of `handle`. One request, no retry.
    pub fn poll(&self, handle: &JobHandle) -> Result<JobStatus> {
        self.try_poll(handle).map_err(GenerationError::Poll)
    }

    fn try_poll(&self, handle: &JobHandle) -> std::result::Result<JobStatus, RequestError> {
        let response = self
            .transport
            .get(&self.config.status_url(handle), Some(&self.config.api_key))?;

        if !response.is_success() {
            return Err(RequestError::Status {
                status: response.status,
                body: response.text(),
            });
        }

        let json: Value = serde_json::from_slice(&response.body)?;
        Ok(JobStatus::from_response(&json, self.config.format))
    }

    /// Download the finished mesh. The URL is pre-signed, so no credential is sent.
    pub fn fetch_artifact(&self, handle: &JobHandle, url: &str) -> Result<MeshArtifact> {
        let response = self
            .transport
            .get(url, None)
            .map_err(|e| GenerationError::Fetch(e.into()))?;

        if !response.is_success() {
            return Err(GenerationError::Fetch(RequestError::Status {
                status: response.status,
                body: response.text(),
            }));
        }

        info!("Fetched {} bytes for job {handle}", response.body.len());
        Ok(MeshArtifact::new(
            handle.as_str(),
            url,
            self.config.format,
            response.body,
        ))
    }

    /// Poll `handle` until it finishes, then fetch the artifact.
    ///
    /// `on_progress` receives a non-decreasing sequence of percentages; 100 is
    /// delivered once, and only when the job succeeded with a download URL.
    /// The loop ends with [`GenerationError::TimedOut`] once `max_wait` (or
    /// `max_polls`) is exhausted, and with [`GenerationError::Cancelled`] as
    /// soon as `cancel` fires.
    pub fn drive_to_completion(
        &self,
        handle: JobHandle,
        mut on_progress: impl FnMut(u8),
        cancel: &CancellationToken,
    ) -> Result<MeshArtifact> {
        let span = tracing::info_span!("drive_to_completion", job_id = %handle);
        let _enter = span.enter();

        let started = Instant::now();
        // `None` when max_wait is too large to land on the clock
        let deadline = started.checked_add(self.config.max_wait);
        let mut tracker = ProgressTracker::new();
        let mut polls: u32 = 0;

        loop {
            if cancel.is_cancelled() {
                warn!("Job {handle} cancelled after {polls} polls");
                return Err(GenerationError::Cancelled {
                    job_id: handle.to_string(),
                });
            }

            // The first poll always goes out; later ones only inside the bound.
            if polls > 0 && self.is_exhausted(polls, started) {
                return Err(self.timed_out(&handle, polls, started));
            }

            let status = self.poll(&handle)?;
            polls += 1;
            debug!("Job {handle}: {:?} at {}%", status.phase, status.progress);

            match status.phase {
                JobPhase::Succeeded => {
                    let Some(url) = status.result_location else {
                        error!("Job {handle} succeeded but returned no download URL");
                        return Err(GenerationError::MissingResultUrl {
                            job_id: handle.to_string(),
                        });
                    };

                    if let Some(percent) = tracker.finish() {
                        on_progress(percent);
                    }
                    info!("Job {handle} finished after {polls} polls");
                    return self.fetch_artifact(&handle, &url);
                }
                JobPhase::Failed => {
                    error!("Job {handle} reported failure");
                    return Err(GenerationError::JobFailed {
                        job_id: handle.to_string(),
                    });
                }
                JobPhase::Pending | JobPhase::Running => {
                    on_progress(tracker.observe(status.progress));
                }
            }

            if self.is_exhausted(polls, started) {
                return Err(self.timed_out(&handle, polls, started));
            }

            self.wait(deadline, cancel);
        }
    }

    /// Submit `image` and drive the resulting job to completion.
    pub fn run(
        &self,
        image: &[u8],
        on_progress: impl FnMut(u8),
        cancel: &CancellationToken,
    ) -> Result<MeshArtifact> {
        let handle = self.submit(image)?;
        self.drive_to_completion(handle, on_progress, cancel)
    }

    fn is_exhausted(&self, polls: u32, started: Instant) -> bool {
        let out_of_polls = self.config.max_polls.is_some_and(|max| polls >= max);
        out_of_polls || started.elapsed() >= self.config.max_wait
    }

    fn timed_out(&self, handle: &JobHandle, polls: u32, started: Instant) -> GenerationError {
        warn!("Giving up on job {handle} after {polls} polls");
        GenerationError::TimedOut {
            job_id: handle.to_string(),
            polls,
            elapsed: started.elapsed(),
        }
    }

    /// Sleep one poll interval, cut short by `give_up_at` or cancellation.
    fn wait(&self, give_up_at: Option<Instant>, cancel: &CancellationToken) {
        let next_poll = Instant::now() + self.config.poll_interval;
        let deadline = give_up_at.map_or(next_poll, |limit| limit.min(next_poll));
        while !cancel.is_cancelled() {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            thread::sleep((deadline - now).min(SLEEP_SLICE));
        }
    }
}
