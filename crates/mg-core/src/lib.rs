mod bounding_box;
pub mod error;
pub mod mesh;
pub mod progress;
pub mod scene;
mod model_types;
#[cfg(test)]
mod test_support;

pub use bounding_box::BoundingBox;
pub use model_types::{ArtifactFormat, GenerationOptions};
