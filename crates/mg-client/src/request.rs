use std::io::Cursor;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::{ColorType, DynamicImage, ImageFormat};
use mg_core::GenerationOptions;
use serde::Serialize;

/// Body of one image-to-3D submission.
///
/// Built once per upload and never modified afterwards.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GenerationRequest {
    image_url: String,
    #[serde(flatten)]
    options: GenerationOptions,
}

impl GenerationRequest {
    /// Decode an uploaded PNG/JPEG and re-encode it as a JPEG data URI.
    pub fn from_image_bytes(bytes: &[u8], options: GenerationOptions) -> image::ImageResult<Self> {
        let image = jpeg_compatible(image::load_from_memory(bytes)?);

        let mut jpeg = Vec::new();
        image.write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg)?;

        Ok(Self {
            image_url: format!("data:image/jpeg;base64,{}", STANDARD.encode(&jpeg)),
            options,
        })
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    pub fn options(&self) -> GenerationOptions {
        self.options
    }
}

/// JPEG has no alpha channel and only 8-bit luma or RGB.
fn jpeg_compatible(image: DynamicImage) -> DynamicImage {
    match image.color() {
        ColorType::L8 | ColorType::Rgb8 => image,
        _ => DynamicImage::ImageRgb8(image.to_rgb8()),
    }
}
