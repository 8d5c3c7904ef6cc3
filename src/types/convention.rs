//! Coordinate convention between the source scene and SPM files.
//!
//! The scene is right-handed, SPM is left-handed. Positions, normals and
//! rotations cross over by negating Z. Scale vectors keep their Z, since
//! negating a scale component would mirror the geometry.

use glam::{Quat, Vec2, Vec3};

/// Convert a vector into SPM space, negating Z when `flip_z` is set.
pub fn convert_vector(v: Vec3, flip_z: bool) -> Vec3 {
    if flip_z {
        Vec3::new(v.x, v.y, -v.z)
    } else {
        v
    }
}

/// Convert a rotation into SPM space.
pub fn convert_quaternion(q: Quat) -> Quat {
    Quat::from_xyzw(q.x, q.y, -q.z, q.w)
}

/// Convert a texture coordinate into SPM space (V runs downwards).
pub fn convert_uv(uv: Vec2) -> Vec2 {
    Vec2::new(uv.x, -uv.y)
}
