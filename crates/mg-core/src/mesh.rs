use glam::{Mat4, Vec3};
use gltf::buffer::Source;
use gltf::mesh::Mode;
use log::debug;

use crate::bounding_box::BoundingBox;
use crate::error::{Error, Result};

/// Triangle mesh flattened out of a glTF scene, node transforms applied
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub faces: Vec<[u32; 3]>,
}

impl Mesh {
    /// Decode a binary glTF (`.glb`) file.
    ///
    /// Walks the default scene (or the first one, or every mesh when the file
    /// has no scenes) and collects the triangle primitives. Only the embedded
    /// BIN chunk is read; primitives backed by external buffers are skipped.
    pub fn from_glb(bytes: &[u8]) -> Result<Self> {
        let gltf = gltf::Gltf::from_slice(bytes)?;
        let blob = gltf.blob.as_deref();
        let document = &gltf.document;

        let mut mesh = Mesh::default();
        match document.default_scene().or_else(|| document.scenes().next()) {
            Some(scene) => {
                for node in scene.nodes() {
                    mesh.append_node(&node, Mat4::IDENTITY, blob)?;
                }
            }
            None => {
                for source in document.meshes() {
                    mesh.append_mesh(&source, Mat4::IDENTITY, blob)?;
                }
            }
        }

        debug!(
            "Decoded mesh with {} vertices and {} faces",
            mesh.vertex_count(),
            mesh.face_count()
        );
        Ok(mesh)
    }

    fn append_node(
        &mut self,
        node: &gltf::Node<'_>,
        parent: Mat4,
        blob: Option<&[u8]>,
    ) -> Result<()> {
        let transform = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

        if let Some(source) = node.mesh() {
            self.append_mesh(&source, transform, blob)?;
        }
        for child in node.children() {
            self.append_node(&child, transform, blob)?;
        }
        Ok(())
    }

    fn append_mesh(
        &mut self,
        source: &gltf::Mesh<'_>,
        transform: Mat4,
        blob: Option<&[u8]>,
    ) -> Result<()> {
        for primitive in source.primitives() {
            if primitive.mode() != Mode::Triangles {
                debug!("Skipping {:?} primitive", primitive.mode());
                continue;
            }

            let reader = primitive.reader(move |buffer| match buffer.source() {
                Source::Bin => blob,
                Source::Uri(_) => None,
            });
            let Some(positions) = reader.read_positions() else {
                continue;
            };

            let base = u32::try_from(self.positions.len()).map_err(|_| Error::TooManyVertices)?;
            self.positions
                .extend(positions.map(|p| transform.transform_point3(Vec3::from(p))));
            let total = u32::try_from(self.positions.len()).map_err(|_| Error::TooManyVertices)?;
            let added = total - base;

            match reader.read_indices() {
                Some(indices) => {
                    let indices: Vec<u32> = indices.into_u32().collect();
                    for tri in indices.chunks_exact(3) {
                        let mut face = [0; 3];
                        for (slot, &index) in face.iter_mut().zip(tri) {
                            if index >= added {
                                return Err(Error::IndexOutOfRange {
                                    index,
                                    vertices: added,
                                });
                            }
                            // index < added, so this stays below `total`
                            *slot = base + index;
                        }
                        self.faces.push(face);
                    }
                }
                None => {
                    self.faces.extend(
                        (0..added / 3).map(|f| [base + 3 * f, base + 3 * f + 1, base + 3 * f + 2]),
                    );
                }
            }
        }
        Ok(())
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() || self.faces.is_empty()
    }

    /// Fails with [`Error::EmptyMesh`] when there is nothing to draw.
    pub fn ensure_not_empty(&self) -> Result<()> {
        if self.is_empty() {
            return Err(Error::EmptyMesh {
                vertices: self.vertex_count(),
                faces: self.face_count(),
            });
        }
        Ok(())
    }

    pub fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(&self.positions)
    }
}
