//! # SPM Export
//!
//! A Rust library for converting scene meshes into SPM model files.
//!
//! ## Overview
//!
//! SPM stores one object per file: its faces split into texture-homogeneous
//! surfaces of triangles, and optionally a skeleton with per-vertex skin
//! weights and one keyframe per joint per animation frame.
//!
//! Conversion runs in two phases. The geometry phase partitions faces by
//! texture and triangulates them ([`mesher`]). The rig phase builds joints
//! from the object's armature, binds them to the packed vertices and samples
//! the armature's action ([`skeleton`]). The result is written by [`export`].
//!
//! ## Quick Start
//!
//! ```ignore
//! use spm_export::{load_scene, export_scene, BakedPoseEvaluator, ExportConfig};
//!
//! let scene = load_scene("scene.json")?;
//! let mut evaluator = BakedPoseEvaluator::new(scene.current_frame);
//!
//! // Write every mesh object next to "out.spm"
//! let config = ExportConfig::default().all_objects();
//! let report = export_scene(&scene, &mut evaluator, "out.spm".as_ref(), &config);
//! assert!(report.is_success());
//! ```
//!
//! ## In-Memory Encoding
//!
//! ```ignore
//! use spm_export::{build_document, encode_document};
//!
//! let document = build_document(&scene, object, &mut evaluator, &config)?;
//! let bytes = encode_document(&document)?;
//! ```

pub mod error;
pub mod types;
pub mod scene;
pub mod mesher;
pub mod skeleton;
pub mod export;

// Re-export main types for convenience
pub use error::{Result, SpmError};
pub use types::{Transform, WEIGHT_EPSILON};
pub use scene::{
    Action, Armature, BakedPoseEvaluator, Bone, Face, FaceUv, FrameCursor, FrameEvaluator, Mesh,
    MeshVertex, PoseFrame, Scene, SceneObject, UvLayer,
};
pub use mesher::{pack_surfaces, PackedVertex, Surface, SurfacePlan};
pub use skeleton::{Joint, JointVertexWeight, Keyframe, Skeleton};
pub use export::{
    build_document, encode_document, export_object, export_scene, write_document, ExportConfig,
    ExportReport, SpmDocument, SpmWriter,
};

/// Load a scene description from a JSON file.
pub fn load_scene<P: AsRef<std::path::Path>>(path: P) -> Result<Scene> {
    scene::loader::load_from_path(path)
}

/// Parse a scene description from JSON text.
pub fn load_scene_from_str(json: &str) -> Result<Scene> {
    scene::loader::load_from_str(json)
}
