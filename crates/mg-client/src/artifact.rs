use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use mg_core::ArtifactFormat;
use mg_core::mesh::Mesh;
use mg_core::scene::{ScenePlotter, render_scene};

use crate::error::Result;

/// Raw mesh file produced by a finished job.
///
/// The two presentations are independent: callers may save the file,
/// render it, or both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshArtifact {
    job_id: String,
    source_url: String,
    format: ArtifactFormat,
    bytes: Vec<u8>,
}

impl MeshArtifact {
    pub fn new(
        job_id: impl Into<String>,
        source_url: impl Into<String>,
        format: ArtifactFormat,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            job_id: job_id.into(),
            source_url: source_url.into(),
            format,
            bytes,
        }
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn format(&self) -> ArtifactFormat {
        self.format
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_downloadable_file(&self) -> DownloadableFile<'_> {
        DownloadableFile {
            file_name: self.format.default_file_name(),
            mime: self.format.mime(),
            data: &self.bytes,
        }
    }

    /// Decode the mesh and draw it with `plotter`; empty meshes are refused.
    pub fn as_renderable_scene<P: ScenePlotter>(&self, plotter: &mut P) -> Result<P::Output> {
        Ok(render_scene(&self.bytes, plotter)?)
    }

    pub fn decode_mesh(&self) -> Result<Mesh> {
        Ok(Mesh::from_glb(&self.bytes)?)
    }
}

/// The artifact as a file the user can save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadableFile<'a> {
    pub file_name: String,
    pub mime: &'static str,
    pub data: &'a [u8],
}

impl DownloadableFile<'_> {
    /// Write the file into `dir`, creating it if needed.
    pub fn save_into(&self, dir: &Path) -> io::Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        fs::write(&path, self.data)?;
        Ok(path)
    }
}
