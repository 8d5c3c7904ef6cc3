//! Joint hierarchy and skin weight extraction.

use super::{Joint, JointVertexWeight};
use crate::error::{Result, SpmError};
use crate::mesher::Surface;
use crate::scene::{Armature, Bone, SceneObject};
use crate::types::{relative_to_parent, root_relative, Transform};
use glam::Mat4;
use std::collections::HashMap;

/// Build one joint per bone, in the armature's bone order.
///
/// `armature_world` is the armature's world matrix at the time of export.
/// Skin weights are gathered from the already packed `surfaces`; weights at
/// or below `epsilon` are dropped.
pub fn extract_joints(
    armature: &Armature,
    object: &SceneObject,
    surfaces: &[Surface],
    armature_world: Mat4,
    epsilon: f32,
) -> Result<Vec<Joint>> {
    let indices = armature.bone_indices()?;
    let mut joints = Vec::with_capacity(armature.bones.len());

    for (index, bone) in armature.bones.iter().enumerate() {
        let parent = resolve_parent(armature, bone, &indices)?;
        let matrix = match parent {
            Some(p) => relative_to_parent(
                armature.bones[p].matrix_local,
                bone.matrix_local,
                &bone.name,
            )?,
            None => root_relative(armature_world, bone.matrix_local),
        };

        joints.push(Joint {
            name: bone.name.clone(),
            index,
            parent,
            transform: Transform::from_matrix(matrix),
            weights: Vec::new(),
            keyframes: Vec::new(),
        });
    }

    assign_weights(&mut joints, &indices, object, surfaces, epsilon);

    for joint in &joints {
        tracing::debug!(
            "Joint {} '{}' (parent {}): {} weights",
            joint.index,
            joint.name,
            joint.parent_index(),
            joint.weights.len()
        );
    }

    Ok(joints)
}

fn resolve_parent(
    armature: &Armature,
    bone: &Bone,
    indices: &HashMap<&str, usize>,
) -> Result<Option<usize>> {
    let Some(parent) = bone.parent.as_deref() else {
        return Ok(None);
    };
    indices
        .get(parent)
        .copied()
        .map(Some)
        .ok_or_else(|| SpmError::UnknownParentBone {
            armature: armature.name.clone(),
            bone: bone.name.clone(),
            parent: parent.to_string(),
        })
}

/// Bind packed vertices to the joints named by their vertex groups.
///
/// Bindings per joint follow surface order, then vertex order, then the
/// vertex's group order.
fn assign_weights(
    joints: &mut [Joint],
    indices: &HashMap<&str, usize>,
    object: &SceneObject,
    surfaces: &[Surface],
    epsilon: f32,
) {
    let Some(mesh) = &object.mesh else {
        return;
    };

    // Vertex group index -> joint index.
    let group_joints: Vec<Option<usize>> = object
        .vertex_groups
        .iter()
        .map(|name| indices.get(name.as_str()).copied())
        .collect();

    for surface in surfaces {
        for (vertex_index, packed) in surface.vertices.iter().enumerate() {
            let source = &mesh.vertices[packed.source as usize];
            for membership in &source.groups {
                if membership.weight <= epsilon {
                    continue;
                }
                if let Some(&Some(joint)) = group_joints.get(membership.group) {
                    joints[joint].weights.push(JointVertexWeight {
                        surface: surface.index,
                        vertex: vertex_index as u32,
                        weight: membership.weight,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesher::pack_surfaces;
    use crate::scene::{Face, Mesh, MeshVertex};
    use crate::types::WEIGHT_EPSILON;
    use glam::Vec3;

    fn rig() -> Armature {
        Armature {
            name: "Rig".into(),
            world_matrix: Mat4::IDENTITY,
            bones: vec![
                Bone::new("Hips", Mat4::from_translation(Vec3::new(0.0, 0.0, 1.0))),
                Bone::new("Spine", Mat4::from_translation(Vec3::new(0.0, 0.0, 2.0)))
                    .with_parent("Hips"),
                Bone::new("Head", Mat4::from_translation(Vec3::new(0.0, 0.0, 3.5)))
                    .with_parent("Spine"),
            ],
            action: None,
        }
    }

    fn skinned_triangle() -> SceneObject {
        let mesh = Mesh {
            vertices: vec![
                MeshVertex::new(Vec3::ZERO, Vec3::Z).with_group(0, 1.0),
                MeshVertex::new(Vec3::X, Vec3::Z)
                    .with_group(0, 0.5)
                    .with_group(1, 0.5),
                MeshVertex::new(Vec3::Y, Vec3::Z)
                    .with_group(1, 0.00005)
                    .with_group(2, 0.9),
            ],
            faces: vec![Face::new(vec![0, 1, 2], Vec3::Z)],
        };
        let mut object = SceneObject::new("Body", mesh);
        object.vertex_groups = vec!["Hips".into(), "Spine".into(), "Unrelated".into()];
        object.armature = Some("Rig".into());
        object
    }

    #[test]
    fn test_parent_indices() {
        let object = skinned_triangle();
        let surfaces = pack_surfaces(&object).unwrap();
        let joints =
            extract_joints(&rig(), &object, &surfaces, Mat4::IDENTITY, WEIGHT_EPSILON).unwrap();

        let parents: Vec<i32> = joints.iter().map(Joint::parent_index).collect();
        assert_eq!(parents, vec![-1, 0, 1]);
        assert_eq!(joints[2].index, 2);
    }

    #[test]
    fn test_child_transform_is_parent_relative() {
        let object = skinned_triangle();
        let surfaces = pack_surfaces(&object).unwrap();
        let joints =
            extract_joints(&rig(), &object, &surfaces, Mat4::IDENTITY, WEIGHT_EPSILON).unwrap();

        assert!(joints[2]
            .transform
            .position
            .abs_diff_eq(Vec3::new(0.0, 0.0, 1.5), 1e-5));
        // Root goes through the axis remap: scene +Z becomes -Y.
        assert!(joints[0]
            .transform
            .position
            .abs_diff_eq(Vec3::new(0.0, -1.0, 0.0), 1e-5));
    }

    #[test]
    fn test_weights_bind_packed_vertices() {
        let object = skinned_triangle();
        let surfaces = pack_surfaces(&object).unwrap();
        let joints =
            extract_joints(&rig(), &object, &surfaces, Mat4::IDENTITY, WEIGHT_EPSILON).unwrap();

        // Corners are packed in (0, 1, 2) order for a triangle.
        let hips: Vec<(u32, f32)> = joints[0].weights.iter().map(|w| (w.vertex, w.weight)).collect();
        assert_eq!(hips, vec![(0, 1.0), (1, 0.5)]);

        // The 0.00005 membership is below epsilon.
        let spine: Vec<u32> = joints[1].weights.iter().map(|w| w.vertex).collect();
        assert_eq!(spine, vec![1]);

        // "Unrelated" group has no bone; "Head" has no group.
        assert!(joints[2].weights.is_empty());

        for joint in &joints {
            for w in &joint.weights {
                assert!(w.weight > WEIGHT_EPSILON);
                assert!((w.vertex as usize) < surfaces[w.surface as usize].vertex_count());
            }
        }
    }

    #[test]
    fn test_unknown_parent() {
        let mut armature = rig();
        armature.bones[1].parent = Some("Pelvis".into());
        let object = skinned_triangle();
        let err = extract_joints(&armature, &object, &[], Mat4::IDENTITY, WEIGHT_EPSILON)
            .unwrap_err();
        assert!(matches!(err, SpmError::UnknownParentBone { ref parent, .. } if parent == "Pelvis"));
    }

    #[test]
    fn test_degenerate_parent_is_fatal() {
        let mut armature = rig();
        armature.bones[0].matrix_local = Mat4::ZERO;
        let object = skinned_triangle();
        let err = extract_joints(&armature, &object, &[], Mat4::IDENTITY, WEIGHT_EPSILON)
            .unwrap_err();
        assert!(matches!(err, SpmError::NonInvertibleMatrix { ref bone } if bone == "Spine"));
    }
}
