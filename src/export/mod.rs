//! SPM export.
//!
//! [`spm`] assembles and encodes documents, [`writer`] holds the byte-level
//! primitives, and [`batch`] writes objects of a scene to files.

pub mod batch;
pub mod spm;
pub mod writer;

pub use batch::{export_object, export_scene, unique_output_path, ExportReport};
pub use spm::{build_document, encode_document, write_document, SpmDocument};
pub use writer::SpmWriter;

use crate::types::WEIGHT_EPSILON;

/// File extension of SPM files.
pub const SPM_EXTENSION: &str = "spm";

/// Export configuration.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Export only the first selected mesh object, to the target path itself.
    pub selection_only: bool,
    /// Skin weights at or below this value are dropped.
    pub weight_epsilon: f32,
    /// Write the skeletal chunk for objects bound to an armature.
    pub export_skeleton: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            selection_only: true,
            weight_epsilon: WEIGHT_EPSILON,
            export_skeleton: true,
        }
    }
}

impl ExportConfig {
    /// Export every mesh object instead of the first selected one.
    pub fn all_objects(mut self) -> Self {
        self.selection_only = false;
        self
    }

    pub fn with_weight_epsilon(mut self, epsilon: f32) -> Self {
        self.weight_epsilon = epsilon;
        self
    }

    pub fn with_skeleton(mut self, export_skeleton: bool) -> Self {
        self.export_skeleton = export_skeleton;
        self
    }
}
