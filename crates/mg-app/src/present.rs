use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use log::{info, warn};
use mg_client::{GeneratorConfig, MeshArtifact};
use mg_core::scene::PlotlyPlotter;

use crate::cli::Args;
use crate::record::GenerationRecord;
use crate::worker::GenerationOutcome;

const PREVIEW_HTML: &str = "3d_model.html";
const PREVIEW_JSON: &str = "3d_model.plotly.json";

/// Log what was uploaded, the terminal stand-in for an image preview.
pub fn describe_upload(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    let image = image::load_from_memory(bytes)
        .with_context(|| format!("{} is not a readable image", path.display()))?;

    info!(
        "Uploaded 2D image {} ({}x{}, {:?})",
        path.display(),
        image.width(),
        image.height(),
        image.color()
    );
    Ok(())
}

/// Produce the presentations asked for on the command line, then the job record.
pub fn present(
    args: &Args,
    generator: &GeneratorConfig,
    outcome: &GenerationOutcome,
) -> anyhow::Result<()> {
    let artifact = &outcome.artifact;
    let wanted = args.presentations();
    let mut outputs = Vec::new();

    if wanted.download {
        let file = artifact.as_downloadable_file();
        let path = file
            .save_into(&args.out_dir)
            .with_context(|| format!("Failed to save {}", file.file_name))?;
        info!("Saved 3D model ({}) to {}", file.mime, path.display());
        outputs.push(path);
    }

    let preview = if wanted.preview {
        write_preview(args, artifact).map(|paths| outputs.extend(paths))
    } else {
        Ok(())
    };

    let mesh = match artifact.decode_mesh() {
        Ok(mesh) => {
            if let Some(bounds) = mesh.bounds() {
                info!(
                    "Model has {} vertices and {} faces, size {:?} centered at {:?}",
                    mesh.vertex_count(),
                    mesh.face_count(),
                    bounds.size(),
                    bounds.center()
                );
            }
            Some(mesh)
        }
        Err(e) => {
            warn!("Could not inspect the downloaded model: {e}");
            None
        }
    };

    let record = GenerationRecord {
        job_id: artifact.job_id().to_string(),
        source_image: args.image.display().to_string(),
        options: generator.options,
        result_url: artifact.source_url().to_string(),
        artifact_bytes: artifact.len(),
        vertices: mesh.as_ref().map(|m| m.vertex_count()),
        faces: mesh.as_ref().map(|m| m.face_count()),
        submitted_at: outcome.submitted_at,
        completed_at: outcome.completed_at,
        outputs,
    };
    let record_path = record.write_into(&args.out_dir)?;
    info!("Wrote job record to {}", record_path.display());

    preview
}

fn write_preview(args: &Args, artifact: &MeshArtifact) -> anyhow::Result<Vec<PathBuf>> {
    let figure = artifact
        .as_renderable_scene(&mut PlotlyPlotter::default())
        .context("Failed to visualize 3D model")?;

    let title = args
        .image
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "3D model".to_string());

    fs::create_dir_all(&args.out_dir)?;
    let html = args.out_dir.join(PREVIEW_HTML);
    fs::write(&html, figure.to_html(&title)?)?;
    let json = args.out_dir.join(PREVIEW_JSON);
    fs::write(&json, figure.to_json()?)?;

    info!("Wrote interactive preview to {}", html.display());
    Ok(vec![html, json])
}
