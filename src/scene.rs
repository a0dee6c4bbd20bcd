use gltf::json;
use tracing::{debug, warn};

use crate::ImportError;
use crate::assemble::VertexAssembler;
use crate::mesh::Mesh;
use crate::options::{HierarchyMode, ImportOptions};
use crate::transform::NodeTransform;

/// Depth-first, pre-order walk over one scene's node tree, emitting a mesh
/// buffer for every primitive of every mesh-bearing node.
pub struct SceneWalker<'a> {
    root: &'a json::Root,
    assembler: &'a VertexAssembler<'a>,
    options: &'a ImportOptions,
}

impl<'a> SceneWalker<'a> {
    pub fn new(
        root: &'a json::Root,
        assembler: &'a VertexAssembler<'a>,
        options: &'a ImportOptions,
    ) -> Self {
        Self {
            root,
            assembler,
            options,
        }
    }

    /// The document's default scene, or the first one.
    pub fn scene_index(&self) -> Result<usize, ImportError> {
        if self.root.scenes.is_empty() {
            return Err(ImportError::NoScenes);
        }
        Ok(self.root.scene.map(|s| s.value()).unwrap_or(0))
    }

    pub fn walk(&self, out: &mut Mesh) -> Result<(), ImportError> {
        let scene_idx = self.scene_index()?;
        let scene = self
            .root
            .scenes
            .get(scene_idx)
            .ok_or(ImportError::BadScene(scene_idx))?;

        debug!(scene = scene_idx, roots = scene.nodes.len(), "walking scene");
        let mut visited = std::collections::HashSet::new();
        for node in &scene.nodes {
            self.visit(node.value(), &NodeTransform::IDENTITY, 0, &mut visited, out)?;
        }
        Ok(())
    }

    fn visit(
        &self,
        node_idx: usize,
        parent: &NodeTransform,
        depth: usize,
        visited: &mut std::collections::HashSet<usize>,
        out: &mut Mesh,
    ) -> Result<(), ImportError> {
        if depth >= self.options.max_depth {
            return Err(ImportError::HierarchyTooDeep(self.options.max_depth));
        }
        let node = self
            .root
            .nodes
            .get(node_idx)
            .ok_or(ImportError::BadNode(node_idx))?;
        // A node has at most one parent, so each is expanded once per walk.
        if !visited.insert(node_idx) {
            return Err(ImportError::NodeReused(node_idx));
        }

        let local = NodeTransform::from_node(node);
        let transform = match self.options.hierarchy {
            HierarchyMode::Composed => parent.mul_transform(&local),
            HierarchyMode::Isolated => local,
        };

        if let Some(skin) = node.skin {
            debug!(depth, node = node_idx, skin = skin.value(), "skin not applied");
        }

        if let Some(mesh) = node.mesh {
            debug!(depth, node = node_idx, mesh = mesh.value(), "emitting mesh");
            self.emit_mesh(mesh.value(), &transform, out)?;
        }

        for child in node.children.iter().flatten() {
            self.visit(child.value(), &transform, depth + 1, visited, out)?;
        }
        Ok(())
    }

    fn emit_mesh(
        &self,
        mesh_idx: usize,
        transform: &NodeTransform,
        out: &mut Mesh,
    ) -> Result<(), ImportError> {
        let primitive_count = match self.assembler.primitive_count(mesh_idx) {
            Ok(n) => n,
            Err(e) => return self.skip_or_fail(e, mesh_idx, None),
        };

        for primitive_idx in 0..primitive_count {
            match self.assembler.assemble(mesh_idx, primitive_idx, transform) {
                Ok(buffer) => out.add_buffer(buffer),
                Err(e) => self.skip_or_fail(e, mesh_idx, Some(primitive_idx))?,
            }
        }
        Ok(())
    }

    fn skip_or_fail(
        &self,
        err: ImportError,
        mesh_idx: usize,
        primitive_idx: Option<usize>,
    ) -> Result<(), ImportError> {
        if self.options.strict {
            return Err(err);
        }
        warn!(mesh = mesh_idx, primitive = ?primitive_idx, error = %err, "skipping primitive");
        Ok(())
    }
}
