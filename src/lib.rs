//! glTF 2.0 mesh import.
//!
//! Reads a `.gltf` or `.glb` document and flattens every mesh primitive
//! reachable from the default scene into engine mesh buffers: positions,
//! normals and texcoords converted to a left-handed, -Z-forward space, and
//! 16-bit triangle indices with winding flipped to match.

use std::path::Path;

use tracing::info;

mod accessor;
mod assemble;
mod buffer;
mod loader;
mod mapping;
mod mesh;
mod options;
mod scene;
mod transform;

pub use accessor::{AccessorResolver, ResolvedAccessor};
pub use assemble::VertexAssembler;
pub use buffer::BufferOffset;
pub use loader::{GltfMeshLoader, MeshLoader, has_file_extension};
pub use mesh::{BoundingBox, Mesh, MeshBuffer, Vertex};
pub use options::{HierarchyMode, ImportOptions, RotationMode};
pub use scene::SceneWalker;
pub use transform::NodeTransform;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("input is empty")]
    EmptyInput,
    #[error("failed to parse glTF: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("document has no scenes")]
    NoScenes,
    #[error("scene {0} not found")]
    BadScene(usize),
    #[error("node {0} not found")]
    BadNode(usize),
    #[error("node {0} is reachable more than once")]
    NodeReused(usize),
    #[error("node hierarchy deeper than {0} levels")]
    HierarchyTooDeep(usize),
    #[error("mesh {0} not found")]
    BadMesh(usize),
    #[error("primitive {primitive} not found in mesh {mesh}")]
    BadPrimitive { mesh: usize, primitive: usize },
    #[error("accessor {0} not found")]
    BadAccessor(usize),
    #[error("accessor {0} has an unknown component type or element type")]
    InvalidAccessorType(usize),
    #[error("accessor {0} has no bufferView (sparse accessors are not supported)")]
    NoBufferView(usize),
    #[error("bufferView {0} not found")]
    BadBufferView(usize),
    #[error("buffer index {0} not found")]
    BadBuffer(usize),
    #[error("bufferView {view} stride {stride} is smaller than its {element_size}-byte elements")]
    InvalidStride {
        view: usize,
        stride: usize,
        element_size: usize,
    },
    #[error("accessor {accessor} declares {count} elements, limit is {limit}")]
    TooManyElements {
        accessor: usize,
        count: usize,
        limit: usize,
    },
    #[error("read of {len} bytes at offset {offset} exceeds buffer of {size} bytes")]
    OutOfBounds { offset: usize, len: usize, size: usize },
    #[error("attribute mapping missing POSITION accessor")]
    NoPositionAccessor,
    #[error("indices accessor missing for TRIANGLES primitive")]
    NoIndicesAccessor,
    #[error("unsupported primitive mode (only TRIANGLES supported)")]
    UnsupportedMode,
    #[error("accessor {accessor} has an unsupported layout for {semantic}")]
    UnsupportedLayout { accessor: usize, semantic: String },
    #[error("{semantic} has {found} elements, POSITION has {expected}")]
    AttributeCountMismatch {
        semantic: String,
        expected: usize,
        found: usize,
    },
    #[error("index value {value} out of range for {vertex_count} vertices")]
    IndexOutOfRange { value: u32, vertex_count: usize },
    #[error("index value {0} does not fit in 16 bits")]
    IndexOverflow(u32),
}

/// Imports a self-contained glTF document (embedded or GLB buffers only).
pub fn import_gltf(data: &[u8], options: &ImportOptions) -> Result<Mesh, ImportError> {
    import_gltf_with_base(data, None, options)
}

/// Imports a glTF document, resolving external buffer URIs against `base`.
pub fn import_gltf_with_base(
    data: &[u8],
    base: Option<&Path>,
    options: &ImportOptions,
) -> Result<Mesh, ImportError> {
    if data.is_empty() {
        return Err(ImportError::EmptyInput);
    }

    // No validation pass: every index is checked where it is looked up.
    let gltf::Gltf { document, blob } = gltf::Gltf::from_slice_without_validation(data)?;
    let buffers = gltf::import_buffers(&document, base, blob)?;
    let root = document.into_json();

    let resolver = AccessorResolver::new(&root, &buffers, options.max_element_count);
    let assembler = VertexAssembler::new(&root, resolver, options);
    let walker = SceneWalker::new(&root, &assembler, options);

    let mut mesh = Mesh::new();
    walker.walk(&mut mesh)?;
    mesh.finalize();

    info!(
        buffers = mesh.buffer_count(),
        vertices = mesh.buffers().iter().map(MeshBuffer::vertex_count).sum::<usize>(),
        "imported glTF mesh"
    );
    return Ok(mesh);
}
