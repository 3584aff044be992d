use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread::{self, JoinHandle};

use chrono::{DateTime, Utc};
use mg_client::transport::Transport;
use mg_client::{CancellationToken, GenerationJobPoller, MeshArtifact};

use crate::error::AppError;

pub enum WorkerCommand {
    Generate { image: Vec<u8> },
    Shutdown,
}

pub enum WorkerResponse {
    Success(GenerationOutcome),
    Error(String),
    Progress(u8),
    Status(String),
}

/// A finished job and when it ran
pub struct GenerationOutcome {
    pub artifact: MeshArtifact,
    pub submitted_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

/// Runs the blocking poller on its own thread so the caller can keep
/// drawing progress. One job at a time.
pub struct GenerationWorker {
    command_tx: Sender<WorkerCommand>,
    response_rx: Receiver<WorkerResponse>,
    cancel: CancellationToken,
    thread_handle: Option<JoinHandle<()>>,
}

impl GenerationWorker {
    pub fn new<T>(poller: GenerationJobPoller<T>) -> Self
    where
        T: Transport + Send + 'static,
    {
        let (cmd_tx, cmd_rx) = channel::<WorkerCommand>();
        let (resp_tx, resp_rx) = channel::<WorkerResponse>();
        let cancel = CancellationToken::new();

        let thread_handle = thread::spawn({
            let cancel = cancel.clone();
            move || {
                loop {
                    match cmd_rx.recv() {
                        Ok(WorkerCommand::Generate { image }) => {
                            run_job(&poller, &image, &resp_tx, &cancel);
                        }
                        Ok(WorkerCommand::Shutdown) => {
                            break;
                        }
                        Err(_) => {
                            break;
                        }
                    }
                }
            }
        });

        Self {
            command_tx: cmd_tx,
            response_rx: resp_rx,
            cancel,
            thread_handle: Some(thread_handle),
        }
    }

    pub fn send_image(&self, image: Vec<u8>) -> Result<(), AppError> {
        self.command_tx
            .send(WorkerCommand::Generate { image })
            .map_err(|_| AppError::WorkerGone)
    }

    /// Block until the worker reports something. `None` once the worker is gone.
    pub fn recv_response(&self) -> Option<WorkerResponse> {
        self.response_rx.recv().ok()
    }

    /// Stop the running job at its next cancellation check.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn shutdown(&mut self) {
        self.cancel();
        let _ = self.command_tx.send(WorkerCommand::Shutdown);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for GenerationWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_job<T: Transport>(
    poller: &GenerationJobPoller<T>,
    image: &[u8],
    resp_tx: &Sender<WorkerResponse>,
    cancel: &CancellationToken,
) {
    let _ = resp_tx.send(WorkerResponse::Status(
        "Sending image to the generation service...".into(),
    ));
    let submitted_at = Utc::now();

    let handle = match poller.submit(image) {
        Ok(handle) => handle,
        Err(e) => {
            let _ = resp_tx.send(WorkerResponse::Error(e.to_string()));
            return;
        }
    };

    let _ = resp_tx.send(WorkerResponse::Status(format!("Generating 3D model (job {handle})...")));

    let result = poller.drive_to_completion(
        handle,
        |percent| {
            let _ = resp_tx.send(WorkerResponse::Progress(percent));
        },
        cancel,
    );

    match result {
        Ok(artifact) => {
            let _ = resp_tx.send(WorkerResponse::Status(format!(
                "Downloaded {} bytes from {}",
                artifact.len(),
                artifact.source_url()
            )));
            let _ = resp_tx.send(WorkerResponse::Success(GenerationOutcome {
                artifact,
                submitted_at,
                completed_at: Utc::now(),
            }));
        }
        Err(e) => {
            let _ = resp_tx.send(WorkerResponse::Error(e.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::io::Cursor;
    use std::sync::Mutex;
    use std::time::Duration;

    use image::{DynamicImage, ImageFormat, RgbImage};
    use mg_client::GeneratorConfig;
    use mg_client::transport::{HttpResponse, TransportError};
    use serde_json::{Value, json};

    use super::*;

    /// Answers requests from a fixed queue; once empty, every job stays running.
    struct CannedTransport {
        responses: Mutex<VecDeque<HttpResponse>>,
    }

    impl CannedTransport {
        fn new(responses: Vec<HttpResponse>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
            }
        }

        fn next(&self) -> Result<HttpResponse, TransportError> {
            Ok(self.responses.lock().unwrap().pop_front().unwrap_or_else(|| {
                json_response(json!({ "status": "IN_PROGRESS", "progress": 5 }))
            }))
        }
    }

    impl Transport for CannedTransport {
        fn post_json(
            &self,
            _url: &str,
            _bearer: &str,
            _body: &Value,
        ) -> Result<HttpResponse, TransportError> {
            self.next()
        }

        fn get(&self, _url: &str, _bearer: Option<&str>) -> Result<HttpResponse, TransportError> {
            self.next()
        }
    }

    fn json_response(body: Value) -> HttpResponse {
        HttpResponse {
            status: 200,
            body: serde_json::to_vec(&body).unwrap(),
        }
    }

    fn jpeg() -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::new(4, 4))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
            .unwrap();
        bytes
    }

    fn worker(responses: Vec<HttpResponse>, poll_interval: Duration) -> GenerationWorker {
        let mut config = GeneratorConfig::new("key");
        config.poll_interval = poll_interval;
        GenerationWorker::new(GenerationJobPoller::with_transport(
            config,
            CannedTransport::new(responses),
        ))
    }

    #[test]
    fn test_reports_progress_then_success() {
        let worker = worker(
            vec![
                json_response(json!({ "task_id": "job-1" })),
                json_response(json!({ "status": "IN_PROGRESS", "progress": 40 })),
                json_response(json!({
                    "status": "SUCCEEDED",
                    "progress": 100,
                    "model_urls": { "glb": "https://x/model.glb" }
                })),
                HttpResponse { status: 200, body: vec![1; 32] },
            ],
            Duration::ZERO,
        );
        worker.send_image(jpeg()).unwrap();

        let mut progress = Vec::new();
        let outcome = loop {
            match worker.recv_response().expect("worker alive") {
                WorkerResponse::Progress(p) => progress.push(p),
                WorkerResponse::Status(_) => {}
                WorkerResponse::Success(outcome) => break outcome,
                WorkerResponse::Error(e) => panic!("unexpected error: {e}"),
            }
        };

        assert_eq!(progress, vec![40, 100]);
        assert_eq!(outcome.artifact.job_id(), "job-1");
        assert_eq!(outcome.artifact.len(), 32);
        assert!(outcome.completed_at >= outcome.submitted_at);
    }

    #[test]
    fn test_submission_error_is_forwarded() {
        let worker = worker(
            vec![HttpResponse { status: 500, body: b"down".to_vec() }],
            Duration::ZERO,
        );
        worker.send_image(jpeg()).unwrap();

        let error = loop {
            match worker.recv_response().expect("worker alive") {
                WorkerResponse::Error(e) => break e,
                WorkerResponse::Success(_) => panic!("job should not succeed"),
                _ => {}
            }
        };
        assert!(error.contains("500"));
    }

    #[test]
    fn test_cancel_stops_a_running_job() {
        let worker = worker(
            vec![json_response(json!({ "task_id": "job-2" }))],
            Duration::from_secs(60),
        );
        worker.send_image(jpeg()).unwrap();

        let error = loop {
            match worker.recv_response().expect("worker alive") {
                WorkerResponse::Progress(_) => worker.cancel(),
                WorkerResponse::Error(e) => break e,
                WorkerResponse::Success(_) => panic!("job should not succeed"),
                WorkerResponse::Status(_) => {}
            }
        };
        assert!(error.contains("cancelled"));
    }
}
