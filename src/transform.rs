//! Node transforms and the glTF -> engine coordinate conversion.
//!
//! glTF is right-handed with +Z forward; the engine is left-handed with -Z
//! forward. Conversion negates Z on every position and normal, and triangle
//! winding is flipped separately by the vertex assembler.

use glam::{DVec3, Mat3, Mat4, Quat, Vec3};
use gltf::json;

use crate::options::RotationMode;

/// Local (or accumulated) translation / rotation / scale of a node, in glTF
/// space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeTransform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl NodeTransform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Reads a node's TRS. A `matrix` is decomposed when the node carries no
    /// explicit translation, rotation or scale.
    pub fn from_node(node: &json::Node) -> Self {
        let has_trs = node.translation.is_some() || node.rotation.is_some() || node.scale.is_some();
        if let (Some(matrix), false) = (node.matrix, has_trs) {
            let (scale, rotation, translation) =
                Mat4::from_cols_array(&matrix).to_scale_rotation_translation();
            return Self {
                translation,
                rotation,
                scale,
            };
        }

        Self {
            translation: node.translation.map(Vec3::from_array).unwrap_or(Vec3::ZERO),
            rotation: node
                .rotation
                .as_ref()
                .map(|r| Quat::from_array(r.0))
                .unwrap_or(Quat::IDENTITY),
            scale: node.scale.map(Vec3::from_array).unwrap_or(Vec3::ONE),
        }
    }

    /// `self` followed by `child`, i.e. the child's transform expressed in
    /// the parent's space.
    pub fn mul_transform(&self, child: &NodeTransform) -> NodeTransform {
        NodeTransform {
            translation: self.translation + self.rotation * (self.scale * child.translation),
            rotation: self.rotation * child.rotation,
            scale: self.scale * child.scale,
        }
    }

    pub fn apply_to_position(&self, position: [f32; 3], mode: RotationMode) -> [f32; 3] {
        let p = Vec3::from_array(position);
        match mode {
            RotationMode::Quaternion => {
                let out = self.translation + unit_rotation(self.rotation) * (self.scale * p);
                [out.x, out.y, -out.z]
            }
            RotationMode::LegacyEuler => self.apply_legacy(p).to_array(),
        }
    }

    /// Converts a normal to engine space. With `transform` set, the normal is
    /// first carried through the inverse transpose of rotation * scale.
    pub fn apply_to_normal(&self, normal: [f32; 3], transform: bool) -> [f32; 3] {
        let mut n = Vec3::from_array(normal);
        if transform {
            let linear =
                Mat3::from_quat(unit_rotation(self.rotation)) * Mat3::from_diagonal(self.scale);
            if linear.determinant().abs() > f32::EPSILON {
                n = (linear.inverse().transpose() * n).normalize_or_zero();
            }
        }
        [n.x, n.y, -n.z]
    }

    /// Scale, flip Z, then rotate by Euler angles one plane at a time about
    /// the origin, then translate with a flipped Z. The rotation is applied in
    /// engine space, so it only agrees with the quaternion path for rotations
    /// about Z.
    fn apply_legacy(&self, p: Vec3) -> Vec3 {
        let mut v = Vec3::new(
            self.scale.x * p.x,
            self.scale.y * p.y,
            -self.scale.z * p.z,
        );

        let euler = quat_to_euler(self.rotation);
        v = rotate_yz(v, euler.x);
        v = rotate_xz(v, euler.y);
        v = rotate_xy(v, euler.z);

        v + Vec3::new(self.translation.x, self.translation.y, -self.translation.z)
    }
}

fn unit_rotation(q: Quat) -> Quat {
    if q.length_squared() > 0.0 {
        q.normalize()
    } else {
        Quat::IDENTITY
    }
}

/// Euler angles in radians (X, Y, Z), using the pitch-singularity handling of
/// the legacy importer.
pub fn quat_to_euler(q: Quat) -> DVec3 {
    let (x, y, z, w) = (q.x as f64, q.y as f64, q.z as f64, q.w as f64);
    let (sqw, sqx, sqy, sqz) = (w * w, x * x, y * y, z * z);
    let test = 2.0 * (y * w - x * z);

    if (test - 1.0).abs() <= 0.000001 {
        DVec3::new(0.0, std::f64::consts::FRAC_PI_2, -2.0 * x.atan2(w))
    } else if (test + 1.0).abs() <= 0.000001 {
        DVec3::new(0.0, -std::f64::consts::FRAC_PI_2, 2.0 * x.atan2(w))
    } else {
        DVec3::new(
            (2.0 * (y * z + x * w)).atan2(-sqx - sqy + sqz + sqw),
            test.clamp(-1.0, 1.0).asin(),
            (2.0 * (x * y + z * w)).atan2(sqx - sqy - sqz + sqw),
        )
    }
}

fn rotate_yz(v: Vec3, radians: f64) -> Vec3 {
    let (sn, cs) = radians.sin_cos();
    let (y, z) = (v.y as f64, v.z as f64);
    Vec3::new(v.x, (y * cs - z * sn) as f32, (y * sn + z * cs) as f32)
}

fn rotate_xz(v: Vec3, radians: f64) -> Vec3 {
    let (sn, cs) = radians.sin_cos();
    let (x, z) = (v.x as f64, v.z as f64);
    Vec3::new((x * cs - z * sn) as f32, v.y, (x * sn + z * cs) as f32)
}

fn rotate_xy(v: Vec3, radians: f64) -> Vec3 {
    let (sn, cs) = radians.sin_cos();
    let (x, y) = (v.x as f64, v.y as f64);
    Vec3::new((x * cs - y * sn) as f32, (x * sn + y * cs) as f32, v.z)
}
