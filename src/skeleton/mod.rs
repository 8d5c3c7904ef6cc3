//! Skeletal animation data: joints, skin weights and keyframes.
//!
//! Joints are built from an armature after every surface of the object has
//! been packed, since skin weights point at packed `(surface, vertex)`
//! pairs. Keyframes are sampled afterwards through a [`FrameEvaluator`].
//!
//! [`FrameEvaluator`]: crate::scene::FrameEvaluator

mod extract;
mod sampler;

pub use extract::extract_joints;
pub use sampler::sample_keyframes;

use crate::types::Transform;

/// Influence of one joint on one packed vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointVertexWeight {
    /// Surface index.
    pub surface: u32,
    /// Vertex index local to the surface.
    pub vertex: u32,
    /// Weight, always above the export epsilon.
    pub weight: f32,
}

/// A sampled joint transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    /// Frame relative to the first frame of the action.
    pub frame: u32,
    pub transform: Transform,
}

/// One joint of the exported skeleton.
#[derive(Debug, Clone)]
pub struct Joint {
    pub name: String,
    /// Position in the armature's bone order.
    pub index: usize,
    /// Parent joint index, `None` for roots.
    pub parent: Option<usize>,
    /// Rest transform relative to the parent (or the armature for roots).
    pub transform: Transform,
    pub weights: Vec<JointVertexWeight>,
    pub keyframes: Vec<Keyframe>,
}

impl Joint {
    /// Parent index as stored on disk (-1 for roots).
    pub fn parent_index(&self) -> i32 {
        self.parent.map_or(-1, |p| p as i32)
    }
}

/// The skeletal chunk of one object.
#[derive(Debug, Clone)]
pub struct Skeleton {
    /// Armature name.
    pub name: String,
    pub joints: Vec<Joint>,
}

impl Skeleton {
    /// Skin weight bindings across all joints.
    pub fn weight_count(&self) -> usize {
        self.joints.iter().map(|j| j.weights.len()).sum()
    }
}
