use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use mg_core::GenerationOptions;
use serde::{Deserialize, Serialize};

/// Sidecar describing one finished generation, written next to its outputs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationRecord {
    pub job_id: String,
    pub source_image: String,
    pub options: GenerationOptions,
    pub result_url: String,
    pub artifact_bytes: usize,
    pub vertices: Option<usize>,
    pub faces: Option<usize>,
    pub submitted_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub outputs: Vec<PathBuf>,
}

pub const RECORD_FILE_NAME: &str = "3d_model.job.json";

impl GenerationRecord {
    pub fn write_into(&self, dir: &Path) -> anyhow::Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(RECORD_FILE_NAME);
        fs::write(&path, serde_json::to_string_pretty(self)?)?;
        Ok(path)
    }
}
