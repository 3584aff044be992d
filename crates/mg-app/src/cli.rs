use std::path::{Path, PathBuf};

use argh::FromArgs;

use crate::error::AppError;

const SUPPORTED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Convert a 2D image into a 3D model.
#[derive(FromArgs, Debug)]
pub struct Args {
    /// image to convert (PNG or JPEG)
    #[argh(positional)]
    pub image: PathBuf,

    /// directory for generated files
    #[argh(option, default = "PathBuf::from(\"outputs\")")]
    pub out_dir: PathBuf,

    /// save the generated .glb file
    #[argh(switch)]
    pub download: bool,

    /// write an interactive HTML preview of the model
    #[argh(switch)]
    pub preview: bool,

    /// seconds between status checks
    #[argh(option)]
    pub poll_interval: Option<u64>,

    /// give up when the job is not done after this many seconds
    #[argh(option)]
    pub max_wait: Option<u64>,

    /// give up after this many status checks
    #[argh(option)]
    pub max_polls: Option<u32>,

    /// do not request physically based rendering textures
    #[argh(switch)]
    pub no_pbr: bool,

    /// do not ask the service to remesh the model
    #[argh(switch)]
    pub no_remesh: bool,

    /// do not ask the service to texture the model
    #[argh(switch)]
    pub no_texture: bool,
}

/// Which terminal presentations to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Presentations {
    pub download: bool,
    pub preview: bool,
}

impl Args {
    /// Download only when neither presentation was asked for.
    pub fn presentations(&self) -> Presentations {
        Presentations {
            download: self.download || !self.preview,
            preview: self.preview,
        }
    }
}

/// Reject anything the uploader would not accept before touching the network.
pub fn check_upload(path: &Path) -> Result<(), AppError> {
    let supported = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));

    if supported {
        Ok(())
    } else {
        Err(AppError::UnsupportedImage(path.display().to_string()))
    }
}
