//! Shared types used throughout the library.

mod convention;
mod transform;

pub use convention::{convert_quaternion, convert_uv, convert_vector};
pub use transform::{relative_to_parent, root_relative, Transform, AXIS_REMAP};

/// Vertex color written once per surface. SPM stores it as a placeholder.
pub const DEFAULT_COLOR: [u8; 4] = [255, 255, 255, 255];

/// Vertex fog value written once per surface.
pub const DEFAULT_FOG: f32 = 0.0;

/// Skin weights at or below this value are dropped.
pub const WEIGHT_EPSILON: f32 = 0.0001;
