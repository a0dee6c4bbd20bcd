use gltf::json;
use gltf::json::accessor::{ComponentType, Type};
use gltf::json::mesh::Mode;
use gltf::json::validation::Checked;
use tracing::debug;

use crate::ImportError;
use crate::accessor::{AccessorResolver, ResolvedAccessor};
use crate::mapping::{read_float_components, read_index, read_vec2, read_vec3, semantic_name};
use crate::mesh::{MeshBuffer, Vertex};
use crate::options::ImportOptions;
use crate::transform::NodeTransform;

/// Turns one mesh primitive into engine vertices and a winding-corrected
/// index list.
pub struct VertexAssembler<'a> {
    root: &'a json::Root,
    resolver: AccessorResolver<'a>,
    options: &'a ImportOptions,
}

impl<'a> VertexAssembler<'a> {
    pub fn new(
        root: &'a json::Root,
        resolver: AccessorResolver<'a>,
        options: &'a ImportOptions,
    ) -> Self {
        Self {
            root,
            resolver,
            options,
        }
    }

    pub fn primitive_count(&self, mesh_idx: usize) -> Result<usize, ImportError> {
        self.root
            .meshes
            .get(mesh_idx)
            .map(|mesh| mesh.primitives.len())
            .ok_or(ImportError::BadMesh(mesh_idx))
    }

    fn primitive(
        &self,
        mesh_idx: usize,
        primitive_idx: usize,
    ) -> Result<&'a json::mesh::Primitive, ImportError> {
        let mesh = self
            .root
            .meshes
            .get(mesh_idx)
            .ok_or(ImportError::BadMesh(mesh_idx))?;
        mesh.primitives
            .get(primitive_idx)
            .ok_or(ImportError::BadPrimitive {
                mesh: mesh_idx,
                primitive: primitive_idx,
            })
    }

    /// Builds the mesh buffer for one primitive drawn with `transform`.
    pub fn assemble(
        &self,
        mesh_idx: usize,
        primitive_idx: usize,
        transform: &NodeTransform,
    ) -> Result<MeshBuffer, ImportError> {
        let primitive = self.primitive(mesh_idx, primitive_idx)?;
        if !matches!(primitive.mode, Checked::Valid(Mode::Triangles)) {
            return Err(ImportError::UnsupportedMode);
        }

        let vertices = self.get_vertices(mesh_idx, primitive_idx, transform)?;
        let indices = self.get_indices(mesh_idx, primitive_idx)?;

        if let Some(&bad) = indices.iter().find(|&&i| usize::from(i) >= vertices.len()) {
            return Err(ImportError::IndexOutOfRange {
                value: u32::from(bad),
                vertex_count: vertices.len(),
            });
        }

        debug!(
            mesh = mesh_idx,
            primitive = primitive_idx,
            vertices = vertices.len(),
            indices = indices.len(),
            "assembled primitive"
        );
        Ok(MeshBuffer::new(vertices, indices))
    }

    /// Index list in engine winding order: the source order reversed, which
    /// flips every triangle to match the Z flip.
    pub fn get_indices(
        &self,
        mesh_idx: usize,
        primitive_idx: usize,
    ) -> Result<Vec<u16>, ImportError> {
        let primitive = self.primitive(mesh_idx, primitive_idx)?;
        let accessor_idx = primitive
            .indices
            .ok_or(ImportError::NoIndicesAccessor)?
            .value();
        let acc = self.resolver.resolve(accessor_idx)?;
        if acc.dimensions != Type::Scalar {
            return Err(unsupported(&acc, "indices"));
        }

        let mut indices = Vec::with_capacity(acc.count);
        for i in (0..acc.count).rev() {
            let value = read_index(&acc.element(i), acc.component_type)
                .ok_or_else(|| unsupported(&acc, "indices"))??;
            let value = u16::try_from(value).map_err(|_| ImportError::IndexOverflow(value))?;
            indices.push(value);
        }
        return Ok(indices);
    }

    /// One vertex per POSITION element. Normals and texcoords are filled in
    /// when the primitive has them and stay zero otherwise.
    pub fn get_vertices(
        &self,
        mesh_idx: usize,
        primitive_idx: usize,
        transform: &NodeTransform,
    ) -> Result<Vec<Vertex>, ImportError> {
        let primitive = self.primitive(mesh_idx, primitive_idx)?;
        let positions_idx = self
            .resolver
            .attribute(primitive, gltf::Semantic::Positions)
            .ok_or(ImportError::NoPositionAccessor)?;
        let positions = self.resolver.resolve(positions_idx)?;

        let mut vertices = vec![Vertex::default(); positions.count];
        self.copy_positions(&positions, &mut vertices, transform)?;

        if let Some(idx) = self.resolver.attribute(primitive, gltf::Semantic::Normals) {
            let normals = self.resolver.resolve(idx)?;
            self.copy_normals(&normals, &mut vertices, transform)?;
        }

        if let Some(idx) = self.resolver.attribute(primitive, gltf::Semantic::TexCoords(0)) {
            let tex_coords = self.resolver.resolve(idx)?;
            copy_tex_coords(&tex_coords, &mut vertices)?;
        }

        return Ok(vertices);
    }

    fn copy_positions(
        &self,
        acc: &ResolvedAccessor<'_>,
        vertices: &mut [Vertex],
        transform: &NodeTransform,
    ) -> Result<(), ImportError> {
        expect_float_layout(acc, Type::Vec3, &gltf::Semantic::Positions)?;
        for (i, vertex) in vertices.iter_mut().enumerate() {
            let p = read_vec3(&acc.element(i))?;
            vertex.position = transform.apply_to_position(p, self.options.rotation);
        }
        Ok(())
    }

    fn copy_normals(
        &self,
        acc: &ResolvedAccessor<'_>,
        vertices: &mut [Vertex],
        transform: &NodeTransform,
    ) -> Result<(), ImportError> {
        expect_float_layout(acc, Type::Vec3, &gltf::Semantic::Normals)?;
        expect_count(acc, vertices.len(), &gltf::Semantic::Normals)?;
        for (i, vertex) in vertices.iter_mut().enumerate() {
            let n = read_vec3(&acc.element(i))?;
            vertex.normal = transform.apply_to_normal(n, self.options.transform_normals);
        }
        Ok(())
    }
}

fn copy_tex_coords(acc: &ResolvedAccessor<'_>, vertices: &mut [Vertex]) -> Result<(), ImportError> {
    let semantic = gltf::Semantic::TexCoords(0);
    if acc.dimensions != Type::Vec2 {
        return Err(unsupported(acc, &semantic_name(&semantic)));
    }
    expect_count(acc, vertices.len(), &semantic)?;
    for (i, vertex) in vertices.iter_mut().enumerate() {
        let element = acc.element(i);
        vertex.tex_coord = match acc.component_type {
            ComponentType::F32 => read_vec2(&element)?,
            ct => read_float_components::<2>(&element, ct, acc.normalized)
                .ok_or_else(|| unsupported(acc, &semantic_name(&semantic)))??,
        };
    }
    Ok(())
}

fn expect_float_layout(
    acc: &ResolvedAccessor<'_>,
    dimensions: Type,
    semantic: &gltf::Semantic,
) -> Result<(), ImportError> {
    if acc.component_type != ComponentType::F32 || acc.dimensions != dimensions {
        return Err(unsupported(acc, &semantic_name(semantic)));
    }
    Ok(())
}

fn expect_count(
    acc: &ResolvedAccessor<'_>,
    expected: usize,
    semantic: &gltf::Semantic,
) -> Result<(), ImportError> {
    if acc.count != expected {
        return Err(ImportError::AttributeCountMismatch {
            semantic: semantic_name(semantic),
            expected,
            found: acc.count,
        });
    }
    Ok(())
}

fn unsupported(acc: &ResolvedAccessor<'_>, semantic: &str) -> ImportError {
    ImportError::UnsupportedLayout {
        accessor: acc.index,
        semantic: semantic.to_string(),
    }
}
