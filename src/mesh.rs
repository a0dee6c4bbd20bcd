//! Engine-side mesh containers produced by the importer.

/// Vertex in engine space (left-handed, -Z forward).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coord: [f32; 2],
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl BoundingBox {
    /// Box around `points`, or a zero-sized box at the origin if empty.
    pub fn from_points<I: IntoIterator<Item = [f32; 3]>>(points: I) -> Self {
        let mut points = points.into_iter();
        let Some(first) = points.next() else {
            return Self {
                min: [0.0; 3],
                max: [0.0; 3],
            };
        };
        let mut bbox = Self {
            min: first,
            max: first,
        };
        for p in points {
            bbox.add_point(p);
        }
        bbox
    }

    pub fn add_point(&mut self, p: [f32; 3]) {
        for i in 0..3 {
            self.min[i] = self.min[i].min(p[i]);
            self.max[i] = self.max[i].max(p[i]);
        }
    }

    pub fn add_box(&mut self, other: &BoundingBox) {
        self.add_point(other.min);
        self.add_point(other.max);
    }
}

/// One primitive's worth of geometry: vertices plus a 16-bit triangle list.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshBuffer {
    vertices: Vec<Vertex>,
    indices: Vec<u16>,
    bounding_box: BoundingBox,
}

impl MeshBuffer {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u16>) -> Self {
        let bounding_box = BoundingBox::from_points(vertices.iter().map(|v| v.position));
        Self {
            vertices,
            indices,
            bounding_box,
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bounding_box
    }
}

/// A set of mesh buffers loaded from one file.
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    buffers: Vec<MeshBuffer>,
    bounding_box: BoundingBox,
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            buffers: Vec::new(),
            bounding_box: BoundingBox::from_points(std::iter::empty()),
        }
    }

    pub fn add_buffer(&mut self, buffer: MeshBuffer) {
        self.buffers.push(buffer);
    }

    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    pub fn buffer(&self, i: usize) -> Option<&MeshBuffer> {
        self.buffers.get(i)
    }

    pub fn buffers(&self) -> &[MeshBuffer] {
        &self.buffers
    }

    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bounding_box
    }

    /// Merges the buffers' bounding boxes into the mesh's.
    pub fn finalize(&mut self) {
        let mut boxes = self.buffers.iter().map(MeshBuffer::bounding_box);
        self.bounding_box = match boxes.next() {
            Some(first) => {
                let mut overall = *first;
                for b in boxes {
                    overall.add_box(b);
                }
                overall
            }
            None => BoundingBox::from_points(std::iter::empty()),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(position: [f32; 3]) -> Vertex {
        Vertex {
            position,
            ..Default::default()
        }
    }

    #[test]
    fn buffer_bounds() {
        let buf = MeshBuffer::new(
            vec![vertex([1.0, -2.0, 0.0]), vertex([-1.0, 4.0, 3.0])],
            vec![0, 1, 0],
        );
        assert_eq!(buf.bounding_box().min, [-1.0, -2.0, 0.0]);
        assert_eq!(buf.bounding_box().max, [1.0, 4.0, 3.0]);
        assert_eq!(buf.vertex_count(), 2);
        assert_eq!(buf.index_count(), 3);
    }

    #[test]
    fn finalize_merges_buffer_bounds() {
        let mut mesh = Mesh::new();
        mesh.add_buffer(MeshBuffer::new(vec![vertex([0.0, 0.0, 0.0])], vec![]));
        mesh.add_buffer(MeshBuffer::new(vec![vertex([5.0, -5.0, 1.0])], vec![]));
        mesh.finalize();
        assert_eq!(mesh.bounding_box().min, [0.0, -5.0, 0.0]);
        assert_eq!(mesh.bounding_box().max, [5.0, 0.0, 1.0]);
        assert_eq!(mesh.buffer_count(), 2);
        assert!(mesh.buffer(2).is_none());
    }

    #[test]
    fn finalize_keeps_buffer_bounds() {
        let buf = MeshBuffer::new(vec![vertex([2.0, 3.0, -1.0]), vertex([4.0, 0.0, 1.0])], vec![]);
        let expected = *buf.bounding_box();
        let mut mesh = Mesh::new();
        mesh.add_buffer(buf);
        mesh.finalize();
        mesh.finalize();
        assert_eq!(mesh.buffers()[0].bounding_box(), &expected);
        assert_eq!(mesh.bounding_box(), &expected);
    }

    #[test]
    fn empty_mesh_has_zero_box() {
        let mut mesh = Mesh::new();
        mesh.finalize();
        assert_eq!(mesh.bounding_box().min, [0.0; 3]);
        assert_eq!(mesh.bounding_box().max, [0.0; 3]);
    }
}
