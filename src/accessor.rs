use gltf::json;
use gltf::json::accessor::{ComponentType, Type};
use gltf::json::validation::Checked;

use crate::ImportError;
use crate::buffer::BufferOffset;
use crate::mapping::{comp_size_bytes, dims_count};

/// An accessor whose whole element span has been checked to lie inside its
/// bufferView, and the bufferView inside its buffer.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedAccessor<'a> {
    pub index: usize,
    pub count: usize,
    pub stride: usize,
    pub component_type: ComponentType,
    pub dimensions: Type,
    pub normalized: bool,
    pub base: BufferOffset<'a>,
}

impl<'a> ResolvedAccessor<'a> {
    pub fn element_size(&self) -> usize {
        comp_size_bytes(self.component_type) * dims_count(self.dimensions)
    }

    /// View positioned at element `i`.
    pub fn element(&self, i: usize) -> BufferOffset<'a> {
        self.base.offset(i.saturating_mul(self.stride))
    }
}

/// Walks accessor -> bufferView -> buffer for one parsed document.
pub struct AccessorResolver<'a> {
    root: &'a json::Root,
    buffers: &'a [gltf::buffer::Data],
    max_element_count: usize,
}

impl<'a> AccessorResolver<'a> {
    pub fn new(
        root: &'a json::Root,
        buffers: &'a [gltf::buffer::Data],
        max_element_count: usize,
    ) -> Self {
        Self {
            root,
            buffers,
            max_element_count,
        }
    }

    /// Looks up the accessor index bound to `semantic`, if the primitive has one.
    pub fn attribute(
        &self,
        primitive: &json::mesh::Primitive,
        semantic: gltf::Semantic,
    ) -> Option<usize> {
        primitive
            .attributes
            .get(&Checked::Valid(semantic))
            .map(|index| index.value())
    }

    pub fn resolve(&self, accessor_idx: usize) -> Result<ResolvedAccessor<'a>, ImportError> {
        let accessor = self
            .root
            .accessors
            .get(accessor_idx)
            .ok_or(ImportError::BadAccessor(accessor_idx))?;

        let (component_type, dimensions) = match (&accessor.component_type, &accessor.type_) {
            (Checked::Valid(ct), Checked::Valid(ty)) => (ct.0, *ty),
            _ => return Err(ImportError::InvalidAccessorType(accessor_idx)),
        };

        let view_idx = accessor
            .buffer_view
            .ok_or(ImportError::NoBufferView(accessor_idx))?
            .value();
        let view = self
            .root
            .buffer_views
            .get(view_idx)
            .ok_or(ImportError::BadBufferView(view_idx))?;

        let buffer_idx = view.buffer.value();
        let buffer: &'a [u8] = self
            .buffers
            .get(buffer_idx)
            .map(|data| data.0.as_slice())
            .ok_or(ImportError::BadBuffer(buffer_idx))?;

        let count = to_usize(accessor.count.0);
        if count > self.max_element_count {
            return Err(ImportError::TooManyElements {
                accessor: accessor_idx,
                count,
                limit: self.max_element_count,
            });
        }

        let element_size = comp_size_bytes(component_type) * dims_count(dimensions);
        let stride = match view.byte_stride.as_ref().map(|s| s.0) {
            Some(stride) if stride < element_size => {
                return Err(ImportError::InvalidStride {
                    view: view_idx,
                    stride,
                    element_size,
                });
            }
            Some(stride) => stride,
            None => element_size,
        };

        let view_offset = to_usize(view.byte_offset.as_ref().map(|o| o.0).unwrap_or(0));
        let view_len = to_usize(view.byte_length.0);
        let view_bytes = BufferOffset::new(buffer, view_offset).slice(0, view_len)?;

        let accessor_offset = to_usize(accessor.byte_offset.as_ref().map(|o| o.0).unwrap_or(0));
        let base = BufferOffset::new(view_bytes, accessor_offset);

        // Check the last element up front so a bogus count can't drive a
        // large allocation before the first read fails.
        if count > 0 {
            let last = (count - 1)
                .checked_mul(stride)
                .ok_or(ImportError::OutOfBounds {
                    offset: usize::MAX,
                    len: element_size,
                    size: view_len,
                })?;
            base.slice(last, element_size)?;
        }

        Ok(ResolvedAccessor {
            index: accessor_idx,
            count,
            stride,
            component_type,
            dimensions,
            normalized: accessor.normalized,
            base,
        })
    }
}

fn to_usize(v: u64) -> usize {
    usize::try_from(v).unwrap_or(usize::MAX)
}
