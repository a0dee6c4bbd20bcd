use std::path::Path;

use tracing::warn;

use crate::mesh::Mesh;
use crate::options::ImportOptions;
use crate::{ImportError, import_gltf, import_gltf_with_base};

/// A format reader the scene loader can dispatch to by file name.
pub trait MeshLoader {
    fn is_loadable_file_extension(&self, path: &Path) -> bool;

    /// Builds a mesh from a file's full contents, or `None` if the data
    /// can't be loaded.
    fn create_mesh(&self, data: &[u8]) -> Option<Mesh>;
}

/// Case-insensitive match of a path's final extension.
pub fn has_file_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

#[derive(Debug, Clone, Default)]
pub struct GltfMeshLoader {
    options: ImportOptions,
}

impl GltfMeshLoader {
    pub fn new(options: ImportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// Reads `path` fully and imports it. External buffers are resolved
    /// relative to the file's directory.
    pub fn load_file(&self, path: &Path) -> Result<Mesh, ImportError> {
        let data = std::fs::read(path)?;
        import_gltf_with_base(&data, path.parent(), &self.options)
    }
}

impl MeshLoader for GltfMeshLoader {
    fn is_loadable_file_extension(&self, path: &Path) -> bool {
        has_file_extension(path, "gltf") || has_file_extension(path, "glb")
    }

    fn create_mesh(&self, data: &[u8]) -> Option<Mesh> {
        match import_gltf(data, &self.options) {
            Ok(mesh) => Some(mesh),
            Err(e) => {
                warn!(error = %e, "glTF import failed");
                None
            }
        }
    }
}
