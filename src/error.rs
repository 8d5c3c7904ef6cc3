//! Error types for SPM export.

use thiserror::Error;

/// Result type alias using SpmError.
pub type Result<T> = std::result::Result<T, SpmError>;

/// Main error type for scene conversion and SPM writing.
#[derive(Error, Debug)]
pub enum SpmError {
    /// I/O error while opening or writing the output sink.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse a JSON scene description.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A face has a vertex count other than 3 or 4.
    #[error("Face {face} of '{object}' has {count} vertices (only triangles and quads are supported)")]
    UnsupportedFace {
        object: String,
        face: usize,
        count: usize,
    },

    /// A face references a vertex that does not exist.
    #[error("Face {face} of '{object}' references vertex {vertex}, but the mesh has {vertex_count}")]
    VertexOutOfRange {
        object: String,
        face: usize,
        vertex: u32,
        vertex_count: usize,
    },

    /// The UV layer does not line up with the mesh faces.
    #[error("UV layer of '{object}' does not match the mesh: {reason}")]
    UvLayerMismatch { object: String, reason: String },

    /// A vertex references a vertex group the object does not define.
    #[error("Vertex {vertex} of '{object}' references undefined vertex group {group}")]
    UnknownVertexGroup {
        object: String,
        vertex: usize,
        group: usize,
    },

    /// A bone names a parent that is not part of the armature.
    #[error("Bone '{bone}' in armature '{armature}' has unknown parent '{parent}'")]
    UnknownParentBone {
        armature: String,
        bone: String,
        parent: String,
    },

    /// Two bones of one armature share a name.
    #[error("Armature '{armature}' contains bone '{bone}' more than once")]
    DuplicateBone { armature: String, bone: String },

    /// A parent matrix could not be inverted (degenerate rig).
    #[error("Parent matrix of bone '{bone}' is not invertible")]
    NonInvertibleMatrix { bone: String },

    /// A surface has more vertices than 16-bit triangle indices can address.
    #[error("Surface '{surface}' has {vertex_count} vertices, more than 16-bit indices can address")]
    IndexOverflow { surface: String, vertex_count: usize },

    /// A string is too long for its 32-bit length prefix.
    #[error("String of {0} bytes exceeds the 32-bit length prefix")]
    StringTooLong(usize),

    /// A count does not fit the on-disk field.
    #[error("{what} count {count} does not fit the file format")]
    CountOverflow { what: &'static str, count: usize },
}
