use std::fmt;
use std::time::Duration;

use mg_core::{ArtifactFormat, GenerationOptions};

use crate::job::JobHandle;

pub const DEFAULT_API_BASE: &str = "https://api.meshy.ai";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(15 * 60);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const IMAGE_TO_3D_PATH: &str = "/openapi/v1/image-to-3d";

/// Everything the poller needs to talk to the service.
///
/// The credential is passed in explicitly; the poller never reads the
/// process environment itself.
#[derive(Clone)]
pub struct GeneratorConfig {
    pub api_key: String,
    pub api_base: String,
    pub options: GenerationOptions,
    pub format: ArtifactFormat,
    pub poll_interval: Duration,
    /// Total time a job may stay unfinished before polling gives up
    pub max_wait: Duration,
    /// Optional cap on the number of status requests per job
    pub max_polls: Option<u32>,
    pub request_timeout: Duration,
}

impl GeneratorConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            options: GenerationOptions::default(),
            format: ArtifactFormat::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_wait: DEFAULT_MAX_WAIT,
            max_polls: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn submit_url(&self) -> String {
        format!("{}{}", self.api_base.trim_end_matches('/'), IMAGE_TO_3D_PATH)
    }

    pub fn status_url(&self, handle: &JobHandle) -> String {
        format!("{}/{}", self.submit_url(), handle)
    }
}

impl fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("options", &self.options)
            .field("format", &self.format)
            .field("poll_interval", &self.poll_interval)
            .field("max_wait", &self.max_wait)
            .field("max_polls", &self.max_polls)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_urls() {
        let mut config = GeneratorConfig::new("key");
        config.api_base = "http://localhost:9000/".to_string();

        assert_eq!(config.submit_url(), "http://localhost:9000/openapi/v1/image-to-3d");
        assert_eq!(
            config.status_url(&JobHandle::new("job-123")),
            "http://localhost:9000/openapi/v1/image-to-3d/job-123"
        );
    }

    #[test]
    fn test_debug_hides_key() {
        let config = GeneratorConfig::new("msy_secret");
        let printed = format!("{config:?}");
        assert!(!printed.contains("msy_secret"));
        assert!(printed.contains("api.meshy.ai"));
    }
}
