//! Joint transforms and matrix decomposition.

use crate::error::{Result, SpmError};
use glam::{Mat4, Quat, Vec3, Vec4};

/// Axis remap applied in front of the armature's world matrix for root joints.
///
/// Row-major this reads `[1 0 0 0] [0 0 -1 0] [0 1 0 0] [0 0 0 1]`:
/// scene +Y becomes +Z and scene +Z becomes -Y.
pub const AXIS_REMAP: Mat4 = Mat4::from_cols(
    Vec4::new(1.0, 0.0, 0.0, 0.0),
    Vec4::new(0.0, 0.0, 1.0, 0.0),
    Vec4::new(0.0, -1.0, 0.0, 0.0),
    Vec4::W,
);

/// Position, rotation and scale of a joint relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Unit quaternion.
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Decompose an affine matrix into translation, rotation and scale.
    ///
    /// The rotation is renormalized: matrices built from long multiplication
    /// chains leave it measurably off unit length.
    pub fn from_matrix(matrix: Mat4) -> Self {
        let (scale, rotation, position) = matrix.to_scale_rotation_translation();
        Self {
            position,
            rotation: rotation.normalize(),
            scale,
        }
    }

    /// Recompose the affine matrix.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

/// Express `child` relative to `parent` (`parent⁻¹ × child`).
///
/// `bone` only names the joint in the error.
pub fn relative_to_parent(parent: Mat4, child: Mat4, bone: &str) -> Result<Mat4> {
    let det = parent.determinant();
    if det == 0.0 || !det.is_finite() {
        return Err(SpmError::NonInvertibleMatrix {
            bone: bone.to_string(),
        });
    }
    Ok(parent.inverse() * child)
}

/// Place a root bone matrix into file space (`AXIS_REMAP × armature × bone`).
pub fn root_relative(armature_world: Mat4, bone: Mat4) -> Mat4 {
    AXIS_REMAP * armature_world * bone
}
