//! Scene description consumed by the exporter.
//!
//! This is the host side of the conversion: mesh objects, their UV and
//! texture assignment, vertex groups, and armatures with baked actions.
//! Everything here is read-only to the export pipeline.

mod evaluator;
pub mod loader;

pub use evaluator::{BakedPoseEvaluator, FrameCursor, FrameEvaluator};

use crate::error::{Result, SpmError};
use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// A whole scene: objects, armatures and the evaluator's starting frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    /// Frame the host was on when export started.
    #[serde(default)]
    pub current_frame: i32,
    pub objects: Vec<SceneObject>,
    #[serde(default)]
    pub armatures: Vec<Armature>,
}

impl Scene {
    /// Find an armature by name.
    pub fn armature(&self, name: &str) -> Option<&Armature> {
        self.armatures.iter().find(|a| a.name == name)
    }

    /// Find an object by name.
    pub fn object(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    /// Iterate over objects that carry mesh data.
    pub fn mesh_objects(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter().filter(|o| o.is_mesh())
    }

    /// Resolve the armature an object is skinned to, if any.
    pub fn armature_for(&self, object: &SceneObject) -> Option<&Armature> {
        let name = object.armature.as_deref()?;
        let armature = self.armature(name);
        if armature.is_none() {
            tracing::warn!(
                "Object '{}' references missing armature '{}', exporting without skeleton",
                object.name,
                name
            );
        }
        armature
    }
}

/// One object in the scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneObject {
    pub name: String,
    #[serde(default)]
    pub selected: bool,
    /// Object scale, multiplied into every exported position.
    #[serde(default = "unit_scale")]
    pub scale: Vec3,
    /// `None` for non-mesh objects (cameras, lights, empties).
    #[serde(default)]
    pub mesh: Option<Mesh>,
    /// UV layers; only the first one is exported.
    #[serde(default)]
    pub uv_layers: Vec<UvLayer>,
    /// Vertex group names, indexed by [`GroupWeight::group`].
    #[serde(default)]
    pub vertex_groups: Vec<String>,
    /// Name of the armature this object is skinned to.
    #[serde(default)]
    pub armature: Option<String>,
}

fn unit_scale() -> Vec3 {
    Vec3::ONE
}

impl SceneObject {
    /// Create a mesh object with unit scale and no UVs or skinning.
    pub fn new(name: impl Into<String>, mesh: Mesh) -> Self {
        Self {
            name: name.into(),
            selected: false,
            scale: Vec3::ONE,
            mesh: Some(mesh),
            uv_layers: Vec::new(),
            vertex_groups: Vec::new(),
            armature: None,
        }
    }

    pub fn is_mesh(&self) -> bool {
        self.mesh.is_some()
    }

    /// The UV layer used for export. Empty layers count as absent.
    pub fn active_uv_layer(&self) -> Option<&UvLayer> {
        self.uv_layers.first().filter(|layer| !layer.faces.is_empty())
    }

    /// Check that the mesh, UV layer and vertex groups are consistent.
    pub fn validate(&self) -> Result<()> {
        let Some(mesh) = &self.mesh else {
            return Ok(());
        };

        for (face_index, face) in mesh.faces.iter().enumerate() {
            let count = face.vertices.len();
            if count != 3 && count != 4 {
                return Err(SpmError::UnsupportedFace {
                    object: self.name.clone(),
                    face: face_index,
                    count,
                });
            }
            if let Some(&vertex) = face
                .vertices
                .iter()
                .find(|&&v| v as usize >= mesh.vertices.len())
            {
                return Err(SpmError::VertexOutOfRange {
                    object: self.name.clone(),
                    face: face_index,
                    vertex,
                    vertex_count: mesh.vertices.len(),
                });
            }
        }

        if let Some(layer) = self.active_uv_layer() {
            if layer.faces.len() != mesh.faces.len() {
                return Err(SpmError::UvLayerMismatch {
                    object: self.name.clone(),
                    reason: format!(
                        "{} UV faces for {} mesh faces",
                        layer.faces.len(),
                        mesh.faces.len()
                    ),
                });
            }
            for (face_index, (face, uv)) in mesh.faces.iter().zip(&layer.faces).enumerate() {
                if uv.uv.len() < face.vertices.len() {
                    return Err(SpmError::UvLayerMismatch {
                        object: self.name.clone(),
                        reason: format!(
                            "face {} has {} corners but {} UVs",
                            face_index,
                            face.vertices.len(),
                            uv.uv.len()
                        ),
                    });
                }
            }
        }

        for (vertex_index, vertex) in mesh.vertices.iter().enumerate() {
            if let Some(group) = vertex
                .groups
                .iter()
                .find(|g| g.group >= self.vertex_groups.len())
            {
                return Err(SpmError::UnknownVertexGroup {
                    object: self.name.clone(),
                    vertex: vertex_index,
                    group: group.group,
                });
            }
        }

        Ok(())
    }
}

/// Polygon mesh data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<MeshVertex>,
    pub faces: Vec<Face>,
}

/// A mesh vertex.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeshVertex {
    pub position: Vec3,
    /// Smoothed vertex normal.
    #[serde(default)]
    pub normal: Vec3,
    /// Vertex group memberships.
    #[serde(default)]
    pub groups: Vec<GroupWeight>,
}

impl MeshVertex {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position,
            normal,
            groups: Vec::new(),
        }
    }

    pub fn with_group(mut self, group: usize, weight: f32) -> Self {
        self.groups.push(GroupWeight { group, weight });
        self
    }
}

/// Membership of a vertex in one vertex group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupWeight {
    /// Index into [`SceneObject::vertex_groups`].
    pub group: usize,
    pub weight: f32,
}

/// A triangle or quad.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Face {
    /// Vertex indices, 3 or 4 of them.
    pub vertices: Vec<u32>,
    /// Flat face normal.
    #[serde(default)]
    pub normal: Vec3,
    /// Use per-vertex normals instead of the face normal.
    #[serde(default)]
    pub smooth: bool,
}

impl Face {
    pub fn new(vertices: Vec<u32>, normal: Vec3) -> Self {
        Self {
            vertices,
            normal,
            smooth: false,
        }
    }

    pub fn smooth(mut self) -> Self {
        self.smooth = true;
        self
    }

    pub fn is_quad(&self) -> bool {
        self.vertices.len() == 4
    }
}

/// Per-face texture coordinates and image assignment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UvLayer {
    #[serde(default)]
    pub name: String,
    /// One entry per mesh face, in face order.
    pub faces: Vec<FaceUv>,
}

/// UVs of one face's corners plus the image mapped onto it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FaceUv {
    pub uv: Vec<Vec2>,
    #[serde(default)]
    pub image: Option<String>,
}

/// A skeletal rig.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Armature {
    pub name: String,
    /// Object-to-world matrix of the armature.
    #[serde(default = "identity")]
    pub world_matrix: Mat4,
    /// Bones in the rig's native order.
    pub bones: Vec<Bone>,
    #[serde(default)]
    pub action: Option<Action>,
}

fn identity() -> Mat4 {
    Mat4::IDENTITY
}

impl Armature {
    /// Map each bone name to its position in [`Armature::bones`].
    pub fn bone_indices(&self) -> Result<HashMap<&str, usize>> {
        let mut indices = HashMap::with_capacity(self.bones.len());
        for (index, bone) in self.bones.iter().enumerate() {
            if indices.insert(bone.name.as_str(), index).is_some() {
                return Err(SpmError::DuplicateBone {
                    armature: self.name.clone(),
                    bone: bone.name.clone(),
                });
            }
        }
        Ok(indices)
    }
}

/// One bone of an armature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bone {
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    /// Rest matrix in armature space.
    #[serde(default = "identity")]
    pub matrix_local: Mat4,
}

impl Bone {
    pub fn new(name: impl Into<String>, matrix_local: Mat4) -> Self {
        Self {
            name: name.into(),
            parent: None,
            matrix_local,
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }
}

/// A baked animation clip.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Action {
    #[serde(default)]
    pub name: String,
    pub frame_start: i32,
    pub frame_end: i32,
    /// Baked poses, sorted by frame. Frames without an entry hold the
    /// previous pose.
    #[serde(default, deserialize_with = "sorted_poses")]
    pub poses: Vec<PoseFrame>,
}

fn sorted_poses<'de, D>(deserializer: D) -> std::result::Result<Vec<PoseFrame>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut poses = Vec::<PoseFrame>::deserialize(deserializer)?;
    poses.sort_by_key(|pose| pose.frame);
    Ok(poses)
}

impl Action {
    /// Number of frames in `[frame_start, frame_end]`.
    pub fn frame_count(&self) -> usize {
        if self.frame_end < self.frame_start {
            0
        } else {
            (self.frame_end - self.frame_start) as usize + 1
        }
    }

    /// Restore frame order after building or editing `poses` by hand.
    pub fn sort_poses(&mut self) {
        self.poses.sort_by_key(|pose| pose.frame);
    }
}

/// Pose state at one frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoseFrame {
    pub frame: i32,
    /// Armature world matrix at this frame, if animated.
    #[serde(default)]
    pub world_matrix: Option<Mat4>,
    /// Posed bone matrices in armature space, keyed by bone name.
    #[serde(default)]
    pub bones: HashMap<String, Mat4>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_object() -> SceneObject {
        let mesh = Mesh {
            vertices: vec![
                MeshVertex::new(Vec3::ZERO, Vec3::Z),
                MeshVertex::new(Vec3::X, Vec3::Z),
                MeshVertex::new(Vec3::Y, Vec3::Z),
            ],
            faces: vec![Face::new(vec![0, 1, 2], Vec3::Z)],
        };
        SceneObject::new("Tri", mesh)
    }

    #[test]
    fn test_valid_object() {
        assert!(triangle_object().validate().is_ok());
    }

    #[test]
    fn test_rejects_ngon() {
        let mut obj = triangle_object();
        obj.mesh.as_mut().unwrap().faces[0].vertices = vec![0, 1, 2, 0, 1];
        let err = obj.validate().unwrap_err();
        assert!(matches!(err, SpmError::UnsupportedFace { count: 5, .. }));
    }

    #[test]
    fn test_rejects_out_of_range_vertex() {
        let mut obj = triangle_object();
        obj.mesh.as_mut().unwrap().faces[0].vertices = vec![0, 1, 7];
        let err = obj.validate().unwrap_err();
        assert!(matches!(err, SpmError::VertexOutOfRange { vertex: 7, .. }));
    }

    #[test]
    fn test_rejects_short_uv_layer() {
        let mut obj = triangle_object();
        obj.uv_layers.push(UvLayer {
            name: "UVMap".into(),
            faces: vec![FaceUv {
                uv: vec![Vec2::ZERO, Vec2::X],
                image: None,
            }],
        });
        assert!(matches!(
            obj.validate().unwrap_err(),
            SpmError::UvLayerMismatch { .. }
        ));
    }

    #[test]
    fn test_rejects_unknown_vertex_group() {
        let mut obj = triangle_object();
        obj.mesh.as_mut().unwrap().vertices[1].groups.push(GroupWeight {
            group: 2,
            weight: 1.0,
        });
        assert!(matches!(
            obj.validate().unwrap_err(),
            SpmError::UnknownVertexGroup { vertex: 1, group: 2, .. }
        ));
    }

    #[test]
    fn test_empty_uv_layer_counts_as_absent() {
        let mut obj = triangle_object();
        obj.uv_layers.push(UvLayer::default());
        assert!(obj.active_uv_layer().is_none());
        assert!(obj.validate().is_ok());
    }

    #[test]
    fn test_duplicate_bones() {
        let armature = Armature {
            name: "Rig".into(),
            world_matrix: Mat4::IDENTITY,
            bones: vec![
                Bone::new("Spine", Mat4::IDENTITY),
                Bone::new("Spine", Mat4::IDENTITY),
            ],
            action: None,
        };
        assert!(matches!(
            armature.bone_indices().unwrap_err(),
            SpmError::DuplicateBone { .. }
        ));
    }

    #[test]
    fn test_action_frame_count() {
        let action = Action {
            frame_start: 3,
            frame_end: 7,
            ..Default::default()
        };
        assert_eq!(action.frame_count(), 5);
        let empty = Action {
            frame_start: 5,
            frame_end: 4,
            ..Default::default()
        };
        assert_eq!(empty.frame_count(), 0);
    }

    #[test]
    fn test_sort_poses() {
        let pose = |frame| PoseFrame {
            frame,
            ..Default::default()
        };
        let mut action = Action {
            poses: vec![pose(8), pose(2), pose(5)],
            ..Default::default()
        };
        action.sort_poses();
        let frames: Vec<i32> = action.poses.iter().map(|p| p.frame).collect();
        assert_eq!(frames, vec![2, 5, 8]);
    }
}
