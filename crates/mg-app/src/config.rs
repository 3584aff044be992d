use std::time::Duration;

use anyhow::Context;
use log::info;
use mg_client::GeneratorConfig;

use crate::cli::Args;
use crate::error::AppError;

pub const API_KEY_VAR: &str = "MESHY_API_KEY";
pub const API_BASE_VAR: &str = "MESHY_API_BASE";
pub const POLL_INTERVAL_VAR: &str = "MESHGEN_POLL_INTERVAL_SECS";
pub const MAX_WAIT_VAR: &str = "MESHGEN_MAX_WAIT_SECS";
pub const REQUEST_TIMEOUT_VAR: &str = "MESHGEN_REQUEST_TIMEOUT_SECS";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub generator: GeneratorConfig,
}

impl AppConfig {
    /// Read `.env` (if present) and the process environment.
    pub fn load() -> anyhow::Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => info!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(e).context("Failed to read .env file"),
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let api_key = lookup(API_KEY_VAR)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(AppError::MissingApiKey(API_KEY_VAR))?;

        let mut generator = GeneratorConfig::new(api_key);
        if let Some(base) = lookup(API_BASE_VAR).filter(|b| !b.trim().is_empty()) {
            generator.api_base = base.trim().to_string();
        }
        if let Some(interval) = seconds(&lookup, POLL_INTERVAL_VAR)? {
            generator.poll_interval = interval;
        }
        if let Some(max_wait) = seconds(&lookup, MAX_WAIT_VAR)? {
            generator.max_wait = max_wait;
        }
        if let Some(timeout) = seconds(&lookup, REQUEST_TIMEOUT_VAR)? {
            generator.request_timeout = timeout;
        }

        Ok(Self { generator })
    }

    /// Command-line flags win over the environment.
    pub fn with_overrides(mut self, args: &Args) -> Self {
        let generator = &mut self.generator;
        if let Some(secs) = args.poll_interval {
            generator.poll_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = args.max_wait {
            generator.max_wait = Duration::from_secs(secs);
        }
        if args.max_polls.is_some() {
            generator.max_polls = args.max_polls;
        }
        generator.options.enable_pbr &= !args.no_pbr;
        generator.options.should_remesh &= !args.no_remesh;
        generator.options.should_texture &= !args.no_texture;
        self
    }
}

fn seconds(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> anyhow::Result<Option<Duration>> {
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .with_context(|| format!("{key} must be a whole number of seconds, got '{raw}'"))
        })
        .transpose()
}
