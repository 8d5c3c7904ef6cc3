//! SPM document assembly.
//!
//! Layout (all little-endian):
//!
//! ```text
//! "SPMD" u16 version
//! i32 submesh count (1), string name, i16 flags, u32 user data size (0)
//! u32 surface count, surfaces...
//! [string armature name, u32 joint count, joints...]
//! ```

use super::writer::SpmWriter;
use super::ExportConfig;
use crate::error::Result;
use crate::mesher::{pack_surfaces, Surface};
use crate::scene::{FrameEvaluator, Scene, SceneObject};
use crate::skeleton::{extract_joints, sample_keyframes, Joint, Skeleton};
use crate::types::{DEFAULT_COLOR, DEFAULT_FOG};
use std::io::Write;

/// File identity.
pub const SPM_MAGIC: [u8; 4] = *b"SPMD";

/// Format version written by this exporter.
pub const SPM_VERSION: u16 = 0x2000;

/// Texture layer slots reserved per surface.
pub const MAX_TEXTURE_LAYERS: usize = 8;

/// Chunk flag bits.
pub mod chunk {
    pub const NONE: i16 = 0x0000;

    // Surface flags.
    pub const INDEX_32BIT: i16 = 0x0001;
    pub const VERTEX_COLOR: i16 = 0x0002;
    pub const VERTEX_FOG: i16 = 0x0004;
    pub const VERTEX_NORMAL: i16 = 0x0008;

    // Object flags.
    pub const GOURAUD_SHADING: i16 = 0x0008;
    pub const NODE_ANIM: i16 = 0x0010;
    pub const MORPH_TARGET_ANIM: i16 = 0x0020;
    pub const SKELETAL_ANIM: i16 = 0x0040;

    // Texture flags.
    pub const TEXTURE_INTERN: i16 = 0x0010;
    pub const TEXTURE_MATRIX: i16 = 0x0020;
}

/// One exported object, ready to be written.
#[derive(Debug, Clone)]
pub struct SpmDocument {
    pub name: String,
    pub flags: i16,
    pub surfaces: Vec<Surface>,
    pub skeleton: Option<Skeleton>,
}

impl SpmDocument {
    pub fn vertex_count(&self) -> usize {
        self.surfaces.iter().map(Surface::vertex_count).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.surfaces.iter().map(Surface::triangle_count).sum()
    }
}

/// Convert one scene object into a document.
///
/// Geometry is packed completely before the rig is touched: skin weights
/// index into the packed surfaces.
pub fn build_document<E: FrameEvaluator + ?Sized>(
    scene: &Scene,
    object: &SceneObject,
    evaluator: &mut E,
    config: &ExportConfig,
) -> Result<SpmDocument> {
    // Geometry phase.
    let surfaces = pack_surfaces(object)?;

    // Rig phase.
    let armature = if config.export_skeleton {
        scene.armature_for(object)
    } else {
        None
    };

    let mut flags = chunk::GOURAUD_SHADING;
    let skeleton = match armature {
        Some(armature) => {
            flags |= chunk::SKELETAL_ANIM;
            let world = evaluator.armature_world(armature);
            let mut joints =
                extract_joints(armature, object, &surfaces, world, config.weight_epsilon)?;
            sample_keyframes(armature, &mut joints, evaluator)?;
            Some(Skeleton {
                name: armature.name.clone(),
                joints,
            })
        }
        None => None,
    };

    Ok(SpmDocument {
        name: object.name.clone(),
        flags,
        surfaces,
        skeleton,
    })
}

/// Write a document to `writer`.
pub fn write_document<W: Write>(document: &SpmDocument, writer: &mut SpmWriter<W>) -> Result<()> {
    write_header(writer)?;

    // One submesh per file.
    writer.write_i32(1)?;
    writer.write_string(&document.name)?;
    writer.write_i16(document.flags)?;
    writer.write_u32(0)?;

    writer.write_count("surface", document.surfaces.len())?;
    for surface in &document.surfaces {
        write_surface(writer, surface)?;
    }

    if let Some(skeleton) = &document.skeleton {
        write_skeleton(writer, skeleton)?;
    }

    Ok(())
}

/// Encode a document into a byte buffer.
pub fn encode_document(document: &SpmDocument) -> Result<Vec<u8>> {
    let mut writer = SpmWriter::new(Vec::new());
    write_document(document, &mut writer)?;
    Ok(writer.into_inner())
}

fn write_header<W: Write>(writer: &mut SpmWriter<W>) -> Result<()> {
    writer.write_bytes(&SPM_MAGIC)?;
    writer.write_u16(SPM_VERSION)
}

fn write_surface<W: Write>(writer: &mut SpmWriter<W>, surface: &Surface) -> Result<()> {
    writer.write_string(&surface.name())?;
    // Fixed template value, independent of which attributes are present.
    writer.write_i16(chunk::VERTEX_NORMAL)?;

    // Only the first texture layer is used, and it is 2D.
    let mut dimensions = [0u8; MAX_TEXTURE_LAYERS];
    dimensions[0] = 2;
    writer.write_bytes(&dimensions)?;

    if surface.has_texture() {
        writer.write_u8(1)?;
        writer.write_u8(1)?;
        writer.write_string(&surface.texture)?;
        writer.write_u16(0)?;
        for _ in 0..3 {
            writer.write_i32(0)?;
        }
    } else {
        writer.write_u8(0)?;
    }

    writer.write_count("vertex", surface.vertex_count())?;
    if !surface.is_empty() {
        writer.write_color(DEFAULT_COLOR)?;
        writer.write_f32(DEFAULT_FOG)?;
        for vertex in &surface.vertices {
            writer.write_vector(vertex.position, true)?;
            writer.write_uv(vertex.uv)?;
            writer.write_vector(vertex.normal, true)?;
        }
    }

    writer.write_count("triangle", surface.triangle_count())?;
    for index in &surface.indices {
        // pack_surfaces caps surfaces at MAX_SURFACE_VERTICES.
        writer.write_u16(*index as u16)?;
    }

    Ok(())
}

fn write_skeleton<W: Write>(writer: &mut SpmWriter<W>, skeleton: &Skeleton) -> Result<()> {
    writer.write_string(&skeleton.name)?;
    writer.write_count("joint", skeleton.joints.len())?;
    for joint in &skeleton.joints {
        write_joint(writer, joint)?;
    }
    Ok(())
}

fn write_joint<W: Write>(writer: &mut SpmWriter<W>, joint: &Joint) -> Result<()> {
    writer.write_string(&joint.name)?;
    writer.write_i32(joint.parent_index())?;
    writer.write_transform(&joint.transform)?;

    writer.write_count("weight", joint.weights.len())?;
    for weight in &joint.weights {
        writer.write_u32(weight.surface)?;
        writer.write_u32(weight.vertex)?;
        writer.write_f32(weight.weight)?;
    }

    writer.write_count("keyframe", joint.keyframes.len())?;
    for keyframe in &joint.keyframes {
        writer.write_u32(keyframe.frame)?;
        writer.write_transform(&keyframe.transform)?;
    }

    Ok(())
}
