use serde::{Deserialize, Serialize};

/// Flags forwarded verbatim to the image-to-3D service with every submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationOptions {
    pub enable_pbr: bool,
    pub should_remesh: bool,
    pub should_texture: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            enable_pbr: true,
            should_remesh: true,
            should_texture: true,
        }
    }
}

/// Mesh file format produced by a finished generation job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArtifactFormat {
    #[default]
    Glb,
}

impl ArtifactFormat {
    /// Key under the status response's `model_urls` object
    pub fn result_key(&self) -> &'static str {
        match self {
            Self::Glb => "glb",
        }
    }

    /// File extension without the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Glb => "glb",
        }
    }

    /// MIME type used when offering the file for download
    pub fn mime(&self) -> &'static str {
        match self {
            Self::Glb => "model/gltf-binary",
        }
    }

    /// File name offered to the user when saving the artifact
    pub fn default_file_name(&self) -> String {
        format!("3d_model.{}", self.extension())
    }
}
