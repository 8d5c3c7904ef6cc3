//! Partitioning of mesh faces into texture-homogeneous surfaces.

use crate::scene::{FaceUv, SceneObject, UvLayer};
use std::collections::HashSet;

/// The surfaces an object splits into, in export order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfacePlan {
    /// Texture name per surface index; empty for the untextured bucket.
    pub textures: Vec<String>,
    /// Whether surface 0 is the untextured bucket.
    pub has_untextured: bool,
}

impl SurfacePlan {
    /// Collect distinct textures in first-use order.
    ///
    /// An untextured bucket is placed at index 0 when the object has no
    /// UV data, no textures at all, or any face without an image.
    pub fn for_object(object: &SceneObject) -> Self {
        let mut textures = Vec::new();
        let mut seen = HashSet::new();
        let mut has_untextured = false;

        match object.active_uv_layer() {
            None => has_untextured = true,
            Some(layer) => {
                for face in &layer.faces {
                    match image_name(face) {
                        Some(name) => {
                            if seen.insert(name) {
                                textures.push(name.to_string());
                            }
                        }
                        None => has_untextured = true,
                    }
                }
            }
        }

        if has_untextured || textures.is_empty() {
            textures.insert(0, String::new());
            has_untextured = true;
        }

        Self {
            textures,
            has_untextured,
        }
    }

    pub fn surface_count(&self) -> usize {
        self.textures.len()
    }

    /// Whether face `face` goes into surface `surface`.
    ///
    /// Rules, in order: without UV data every face belongs (the plan then
    /// has a single surface); an imageless face belongs to surface 0; a
    /// textured face belongs to the surface of the same name unless that
    /// surface is index 0 and index 0 is the untextured bucket.
    pub fn face_belongs(&self, layer: Option<&UvLayer>, face: usize, surface: usize) -> bool {
        let Some(layer) = layer else {
            return true;
        };
        let image = face_image(layer, face);
        if surface == 0 && image.is_none() {
            return true;
        }
        match image {
            Some(name) => {
                name == self.textures[surface] && (!self.has_untextured || surface > 0)
            }
            None => false,
        }
    }
}

/// Image assigned to a face, treating empty names as none.
fn image_name(face: &FaceUv) -> Option<&str> {
    face.image.as_deref().filter(|name| !name.is_empty())
}

fn face_image(layer: &UvLayer, face: usize) -> Option<&str> {
    layer.faces.get(face).and_then(image_name)
}
