//! Small `.glb` files for unit tests.

use std::borrow::Cow;

use gltf::binary::{Glb, Header};

pub(crate) fn glb(json: &str, bin: &[u8]) -> Vec<u8> {
    let glb = Glb {
        // `to_vec` writes its own header, so only the shape matters here.
        header: Header {
            magic: *b"glTF",
            version: 2,
            length: 0,
        },
        json: Cow::Borrowed(json.as_bytes()),
        bin: (!bin.is_empty()).then_some(Cow::Borrowed(bin)),
    };
    glb.to_vec().expect("in-memory glb")
}

fn triangle_bin() -> Vec<u8> {
    let positions: [f32; 9] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    let indices: [u16; 3] = [0, 1, 2];

    let mut bin = Vec::new();
    for p in positions {
        bin.extend_from_slice(&p.to_le_bytes());
    }
    for i in indices {
        bin.extend_from_slice(&i.to_le_bytes());
    }
    bin
}

/// One indexed triangle in the XY plane under a translated node.
pub(crate) fn triangle_glb(translation: [f32; 3]) -> Vec<u8> {
    let json = format!(
        r#"{{
  "asset": {{"version": "2.0"}},
  "buffers": [{{"byteLength": 42}}],
  "bufferViews": [
    {{"buffer": 0, "byteOffset": 0, "byteLength": 36}},
    {{"buffer": 0, "byteOffset": 36, "byteLength": 6}}
  ],
  "accessors": [
    {{"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
      "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]}},
    {{"bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR"}}
  ],
  "meshes": [{{"primitives": [{{"attributes": {{"POSITION": 0}}, "indices": 1}}]}}],
  "nodes": [{{"mesh": 0, "translation": [{}, {}, {}]}}],
  "scenes": [{{"nodes": [0]}}],
  "scene": 0
}}"#,
        translation[0], translation[1], translation[2]
    );
    glb(&json, &triangle_bin())
}

/// Three vertices drawn as a point cloud: geometry, but no faces.
pub(crate) fn points_glb() -> Vec<u8> {
    let json = r#"{
  "asset": {"version": "2.0"},
  "buffers": [{"byteLength": 36}],
  "bufferViews": [{"buffer": 0, "byteOffset": 0, "byteLength": 36}],
  "accessors": [
    {"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
     "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]}
  ],
  "meshes": [{"primitives": [{"attributes": {"POSITION": 0}, "mode": 0}]}],
  "nodes": [{"mesh": 0}],
  "scenes": [{"nodes": [0]}],
  "scene": 0
}"#;
    glb(json, &triangle_bin()[..36])
}

/// A valid file whose only scene is empty.
pub(crate) fn empty_glb() -> Vec<u8> {
    glb(
        r#"{"asset": {"version": "2.0"}, "scenes": [{"nodes": []}], "scene": 0}"#,
        &[],
    )
}

/// Three triangle-mode vertices whose index list is too short for a face.
pub(crate) fn faceless_triangle_glb() -> Vec<u8> {
    let json = r#"{
  "asset": {"version": "2.0"},
  "buffers": [{"byteLength": 40}],
  "bufferViews": [
    {"buffer": 0, "byteOffset": 0, "byteLength": 36},
    {"buffer": 0, "byteOffset": 36, "byteLength": 4}
  ],
  "accessors": [
    {"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
     "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]},
    {"bufferView": 1, "componentType": 5123, "count": 2, "type": "SCALAR"}
  ],
  "meshes": [{"primitives": [{"attributes": {"POSITION": 0}, "indices": 1}]}],
  "nodes": [{"mesh": 0}],
  "scenes": [{"nodes": [0]}],
  "scene": 0
}"#;
    glb(json, &triangle_bin()[..40])
}

/// One triangle with 32-bit `indices`, its mesh instanced by two nodes.
pub(crate) fn shared_triangle_glb(indices: [u32; 3]) -> Vec<u8> {
    let mut bin = triangle_bin()[..36].to_vec();
    for i in indices {
        bin.extend_from_slice(&i.to_le_bytes());
    }

    let json = r#"{
  "asset": {"version": "2.0"},
  "buffers": [{"byteLength": 48}],
  "bufferViews": [
    {"buffer": 0, "byteOffset": 0, "byteLength": 36},
    {"buffer": 0, "byteOffset": 36, "byteLength": 12}
  ],
  "accessors": [
    {"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
     "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]},
    {"bufferView": 1, "componentType": 5125, "count": 3, "type": "SCALAR"}
  ],
  "meshes": [{"primitives": [{"attributes": {"POSITION": 0}, "indices": 1}]}],
  "nodes": [{"mesh": 0}, {"mesh": 0, "translation": [0.0, 0.0, 1.0]}],
  "scenes": [{"nodes": [0, 1]}],
  "scene": 0
}"#;
    glb(json, &bin)
}
