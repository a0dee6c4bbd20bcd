//! Programmatic glTF documents for integration tests.

#![allow(dead_code)]

use serde_json::{Value, json};

/// Accumulates binary data and JSON objects for one single-buffer document.
#[derive(Default)]
pub struct GltfBuilder {
    bin: Vec<u8>,
    views: Vec<Value>,
    accessors: Vec<Value>,
    meshes: Vec<Value>,
    nodes: Vec<Value>,
    scenes: Vec<Value>,
}

impl GltfBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push_view(&mut self, bytes: &[u8], stride: Option<usize>) -> usize {
        let mut view = json!({
            "buffer": 0,
            "byteOffset": self.bin.len(),
            "byteLength": bytes.len(),
        });
        if let Some(stride) = stride {
            view["byteStride"] = json!(stride);
        }
        self.bin.extend_from_slice(bytes);
        while self.bin.len() % 4 != 0 {
            self.bin.push(0);
        }
        self.views.push(view);
        self.views.len() - 1
    }

    pub fn accessor(&mut self, accessor: Value) -> usize {
        self.accessors.push(accessor);
        self.accessors.len() - 1
    }

    fn float_accessor<const N: usize>(&mut self, data: &[[f32; N]], ty: &str) -> usize {
        let bytes: Vec<u8> = data.iter().flatten().flat_map(|f| f.to_le_bytes()).collect();
        let view = self.push_view(&bytes, None);
        self.accessor(json!({
            "bufferView": view,
            "componentType": 5126,
            "count": data.len(),
            "type": ty,
        }))
    }

    pub fn positions(&mut self, data: &[[f32; 3]]) -> usize {
        self.float_accessor(data, "VEC3")
    }

    pub fn normals(&mut self, data: &[[f32; 3]]) -> usize {
        self.float_accessor(data, "VEC3")
    }

    pub fn tex_coords(&mut self, data: &[[f32; 2]]) -> usize {
        self.float_accessor(data, "VEC2")
    }

    pub fn indices(&mut self, data: &[u16]) -> usize {
        let bytes: Vec<u8> = data.iter().flat_map(|i| i.to_le_bytes()).collect();
        let view = self.push_view(&bytes, None);
        self.accessor(json!({
            "bufferView": view,
            "componentType": 5123,
            "count": data.len(),
            "type": "SCALAR",
        }))
    }

    pub fn indices_u32(&mut self, data: &[u32]) -> usize {
        let bytes: Vec<u8> = data.iter().flat_map(|i| i.to_le_bytes()).collect();
        let view = self.push_view(&bytes, None);
        self.accessor(json!({
            "bufferView": view,
            "componentType": 5125,
            "count": data.len(),
            "type": "SCALAR",
        }))
    }

    /// Positions and normals sharing one bufferView with a 24-byte stride.
    /// Returns the (POSITION, NORMAL) accessor indices.
    pub fn interleaved(&mut self, positions: &[[f32; 3]], normals: &[[f32; 3]]) -> (usize, usize) {
        let mut bytes = Vec::new();
        for (p, n) in positions.iter().zip(normals) {
            for f in p.iter().chain(n) {
                bytes.extend_from_slice(&f.to_le_bytes());
            }
        }
        let view = self.push_view(&bytes, Some(24));
        let pos = self.accessor(json!({
            "bufferView": view,
            "componentType": 5126,
            "count": positions.len(),
            "type": "VEC3",
        }));
        let norm = self.accessor(json!({
            "bufferView": view,
            "byteOffset": 12,
            "componentType": 5126,
            "count": normals.len(),
            "type": "VEC3",
        }));
        (pos, norm)
    }

    pub fn mesh(&mut self, primitives: Vec<Value>) -> usize {
        self.meshes.push(json!({ "primitives": primitives }));
        self.meshes.len() - 1
    }

    pub fn node(&mut self, node: Value) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn scene(&mut self, nodes: &[usize]) -> usize {
        self.scenes.push(json!({ "nodes": nodes }));
        self.scenes.len() - 1
    }

    pub fn bin(&self) -> &[u8] {
        &self.bin
    }

    /// Document JSON. With `uri` the buffer is external, otherwise it is the
    /// GLB binary chunk.
    pub fn json(&self, uri: Option<&str>) -> Value {
        let mut buffer = json!({ "byteLength": self.bin.len() });
        if let Some(uri) = uri {
            buffer["uri"] = json!(uri);
        }
        json!({
            "asset": { "version": "2.0" },
            "buffers": [buffer],
            "bufferViews": self.views,
            "accessors": self.accessors,
            "meshes": self.meshes,
            "nodes": self.nodes,
            "scenes": self.scenes,
            "scene": 0,
        })
    }

    pub fn to_glb(&self) -> Vec<u8> {
        assemble_glb(&self.json(None), &self.bin)
    }
}

/// GLB container: 12-byte header, JSON chunk padded with spaces, BIN chunk
/// padded with zeros.
pub fn assemble_glb(root: &Value, buffer_data: &[u8]) -> Vec<u8> {
    let json_bytes = serde_json::to_vec(root).expect("serialize glTF JSON");

    let json_padding = (4 - (json_bytes.len() % 4)) % 4;
    let json_chunk_length = json_bytes.len() + json_padding;
    let buffer_padding = (4 - (buffer_data.len() % 4)) % 4;
    let buffer_chunk_length = buffer_data.len() + buffer_padding;
    let total_length = 12 + 8 + json_chunk_length + 8 + buffer_chunk_length;

    let mut glb = Vec::with_capacity(total_length);
    glb.extend_from_slice(b"glTF");
    glb.extend_from_slice(&2u32.to_le_bytes());
    glb.extend_from_slice(&(total_length as u32).to_le_bytes());

    glb.extend_from_slice(&(json_chunk_length as u32).to_le_bytes());
    glb.extend_from_slice(&0x4E4F534Au32.to_le_bytes()); // "JSON"
    glb.extend_from_slice(&json_bytes);
    glb.extend(std::iter::repeat_n(0x20u8, json_padding));

    glb.extend_from_slice(&(buffer_chunk_length as u32).to_le_bytes());
    glb.extend_from_slice(&0x004E4942u32.to_le_bytes()); // "BIN\0"
    glb.extend_from_slice(buffer_data);
    glb.extend(std::iter::repeat_n(0u8, buffer_padding));

    glb
}

pub fn primitive(attributes: Value, indices: usize) -> Value {
    json!({ "attributes": attributes, "indices": indices })
}

pub const TRIANGLE: [[f32; 3]; 3] = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];

/// Axis-aligned cube spanning -1..1 with one vertex per corner.
pub fn unit_cube() -> (Vec<[f32; 3]>, Vec<u16>) {
    let mut positions = Vec::new();
    for x in [-1.0, 1.0] {
        for y in [-1.0, 1.0] {
            for z in [-1.0, 1.0] {
                positions.push([x, y, z]);
            }
        }
    }
    let indices = vec![
        0, 1, 3, 0, 3, 2, // -x
        4, 6, 7, 4, 7, 5, // +x
        0, 4, 5, 0, 5, 1, // -y
        2, 3, 7, 2, 7, 6, // +y
        0, 2, 6, 0, 6, 4, // -z
        1, 5, 7, 1, 7, 3, // +z
    ];
    (positions, indices)
}

/// The glTF tutorial's minimal triangle with an embedded base64 buffer:
/// u16 indices [0, 1, 2] then three VEC3 positions at byte 8.
pub const MINIMAL_TRIANGLE_GLTF: &str = r#"{
  "scene": 0,
  "scenes": [{ "nodes": [0] }],
  "nodes": [{ "mesh": 0 }],
  "meshes": [{ "primitives": [{ "attributes": { "POSITION": 1 }, "indices": 0 }] }],
  "buffers": [{
    "uri": "data:application/octet-stream;base64,AAABAAIAAAAAAAAAAAAAAAAAAAAAAIA/AAAAAAAAAAAAAAAAAACAPwAAAAA=",
    "byteLength": 44
  }],
  "bufferViews": [
    { "buffer": 0, "byteOffset": 0, "byteLength": 6, "target": 34963 },
    { "buffer": 0, "byteOffset": 8, "byteLength": 36, "target": 34962 }
  ],
  "accessors": [
    { "bufferView": 0, "byteOffset": 0, "componentType": 5123, "count": 3, "type": "SCALAR", "max": [2], "min": [0] },
    { "bufferView": 1, "byteOffset": 0, "componentType": 5126, "count": 3, "type": "VEC3", "max": [1.0, 1.0, 0.0], "min": [0.0, 0.0, 0.0] }
  ],
  "asset": { "version": "2.0" }
}"#;
