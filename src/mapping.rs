//! Typed reads out of glTF buffers.
//!
//! glTF stores all binary data little-endian. Every decode here goes through
//! `from_le_bytes`, so results are the same on big-endian hosts.

use gltf::json::accessor::{ComponentType, Type};

use crate::ImportError;
use crate::buffer::BufferOffset;

/// A fixed-width scalar that can be decoded from buffer bytes.
pub trait Scalar: Copy {
    const SIZE: usize;

    /// Decodes from exactly `SIZE` bytes.
    fn decode(bytes: &[u8]) -> Self;
}

macro_rules! impl_scalar {
    ($($t:ty),*) => {
        $(
            impl Scalar for $t {
                const SIZE: usize = std::mem::size_of::<$t>();

                fn decode(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$t>()];
                    raw.copy_from_slice(&bytes[..Self::SIZE]);
                    <$t>::from_le_bytes(raw)
                }
            }
        )*
    };
}

impl_scalar!(u8, u16, u32, f32);

pub fn read_primitive<T: Scalar>(from: &BufferOffset<'_>, delta: usize) -> Result<T, ImportError> {
    from.slice(delta, T::SIZE).map(T::decode)
}

/// Two consecutive floats of one element.
pub fn read_vec2(from: &BufferOffset<'_>) -> Result<[f32; 2], ImportError> {
    Ok([read_primitive(from, 0)?, read_primitive(from, 4)?])
}

/// Three consecutive floats of one element.
pub fn read_vec3(from: &BufferOffset<'_>) -> Result<[f32; 3], ImportError> {
    Ok([
        read_primitive(from, 0)?,
        read_primitive(from, 4)?,
        read_primitive(from, 8)?,
    ])
}

/// Reads one index value of the given component type.
pub fn read_index(from: &BufferOffset<'_>, ct: ComponentType) -> Option<Result<u32, ImportError>> {
    let value = match ct {
        ComponentType::U8 => read_primitive::<u8>(from, 0).map(u32::from),
        ComponentType::U16 => read_primitive::<u16>(from, 0).map(u32::from),
        ComponentType::U32 => read_primitive::<u32>(from, 0),
        _ => return None,
    };
    Some(value)
}

/// Reads `N` components as floats, dequantizing normalized unsigned integers.
///
/// Returns `None` for layouts glTF does not allow for float attributes.
pub fn read_float_components<const N: usize>(
    from: &BufferOffset<'_>,
    ct: ComponentType,
    normalized: bool,
) -> Option<Result<[f32; N], ImportError>> {
    let size = comp_size_bytes(ct);
    let decode = |i: usize| -> Result<f32, ImportError> {
        let delta = i * size;
        match ct {
            ComponentType::U8 => read_primitive::<u8>(from, delta).map(|v| v as f32 / 255.0),
            ComponentType::U16 => read_primitive::<u16>(from, delta).map(|v| v as f32 / 65535.0),
            _ => read_primitive::<f32>(from, delta),
        }
    };

    match (ct, normalized) {
        (ComponentType::F32, _) | (ComponentType::U8, true) | (ComponentType::U16, true) => {}
        _ => return None,
    }

    let mut out = [0f32; N];
    for (i, slot) in out.iter_mut().enumerate() {
        match decode(i) {
            Ok(v) => *slot = v,
            Err(e) => return Some(Err(e)),
        }
    }
    Some(Ok(out))
}

pub fn comp_size_bytes(ct: ComponentType) -> usize {
    match ct {
        ComponentType::I8 | ComponentType::U8 => 1,
        ComponentType::I16 | ComponentType::U16 => 2,
        ComponentType::U32 | ComponentType::F32 => 4,
    }
}

pub fn dims_count(t: Type) -> usize {
    match t {
        Type::Scalar => 1,
        Type::Vec2 => 2,
        Type::Vec3 => 3,
        Type::Vec4 | Type::Mat2 => 4,
        Type::Mat3 => 9,
        Type::Mat4 => 16,
    }
}

pub fn semantic_name(semantic: &gltf::Semantic) -> String {
    match semantic {
        gltf::Semantic::Positions => "POSITION".to_string(),
        gltf::Semantic::Normals => "NORMAL".to_string(),
        gltf::Semantic::Tangents => "TANGENT".to_string(),
        gltf::Semantic::TexCoords(set) => format!("TEXCOORD_{set}"),
        gltf::Semantic::Colors(set) => format!("COLOR_{set}"),
        gltf::Semantic::Joints(set) => format!("JOINTS_{set}"),
        gltf::Semantic::Weights(set) => format!("WEIGHTS_{set}"),
        #[allow(unreachable_patterns)]
        _ => "UNKNOWN".to_string(),
    }
}
