//! Surface generation from scene meshes.
//!
//! This module splits an object's faces into surfaces by texture and
//! triangulates them into independent vertex/index streams.

pub mod geometry;
pub mod partition;

pub use geometry::{PackedVertex, Surface};
pub use partition::SurfacePlan;

use crate::error::{Result, SpmError};
use crate::scene::{Face, Mesh, SceneObject, UvLayer};
use glam::Vec2;

/// Largest vertex count addressable by 16-bit triangle indices.
pub const MAX_SURFACE_VERTICES: usize = u16::MAX as usize + 1;

/// Partition and triangulate an object into surfaces.
///
/// Faces are visited in mesh order. Every corner becomes its own packed
/// vertex; a quad is split into corners (0, 1, 2) and (0, 2, 3).
pub fn pack_surfaces(object: &SceneObject) -> Result<Vec<Surface>> {
    object.validate()?;
    let Some(mesh) = &object.mesh else {
        return Ok(Vec::new());
    };

    let plan = SurfacePlan::for_object(object);
    let layer = object.active_uv_layer();
    let mut surfaces = Vec::with_capacity(plan.surface_count());

    for (index, texture) in plan.textures.iter().enumerate() {
        let mut surface = Surface::new(index as u32, texture.as_str());

        for (face_index, face) in mesh.faces.iter().enumerate() {
            if !plan.face_belongs(layer, face_index, index) {
                continue;
            }
            let corner = |c: usize| pack_corner(object, mesh, layer, face_index, face, c);

            surface.add_corner_triangle([corner(0), corner(1), corner(2)]);
            if face.is_quad() {
                surface.add_corner_triangle([corner(0), corner(2), corner(3)]);
            }
        }

        if surface.vertex_count() > MAX_SURFACE_VERTICES {
            return Err(SpmError::IndexOverflow {
                surface: surface.name(),
                vertex_count: surface.vertex_count(),
            });
        }

        tracing::debug!(
            "Surface {} '{}': {} vertices, {} triangles",
            index,
            surface.name(),
            surface.vertex_count(),
            surface.triangle_count()
        );
        surfaces.push(surface);
    }

    Ok(surfaces)
}

fn pack_corner(
    object: &SceneObject,
    mesh: &Mesh,
    layer: Option<&UvLayer>,
    face_index: usize,
    face: &Face,
    corner: usize,
) -> PackedVertex {
    let source = face.vertices[corner];
    let vertex = &mesh.vertices[source as usize];

    let uv = layer
        .map(|l| l.faces[face_index].uv[corner])
        .unwrap_or(Vec2::ZERO);
    let normal = if face.smooth { vertex.normal } else { face.normal };

    PackedVertex::new(vertex.position * object.scale, uv, normal, source)
}
