use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to decode mesh: {0}")]
    MeshDecode(#[from] gltf::Error),

    #[error("The 3D model is empty or invalid ({vertices} vertices, {faces} faces)")]
    EmptyMesh { vertices: usize, faces: usize },

    #[error("Triangle index {index} is out of range for a primitive with {vertices} vertices")]
    IndexOutOfRange { index: u32, vertices: u32 },

    #[error("Mesh has more vertices than 32-bit indices can address")]
    TooManyVertices,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
