//! Scene loading from JSON files.

use super::Scene;
use crate::error::Result;
use std::path::Path;

/// Load a scene from a JSON file.
pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Scene> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    load_from_str(&contents)
}

/// Parse a scene from JSON text.
pub fn load_from_str(json: &str) -> Result<Scene> {
    let scene: Scene = serde_json::from_str(json)?;
    tracing::debug!(
        "Loaded scene: {} objects, {} armatures, frame {}",
        scene.objects.len(),
        scene.armatures.len(),
        scene.current_frame
    );
    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Vec3};

    const SCENE: &str = r#"{
        "current_frame": 12,
        "objects": [
            {
                "name": "Cube",
                "selected": true,
                "scale": [2.0, 2.0, 2.0],
                "mesh": {
                    "vertices": [
                        { "position": [0, 0, 0], "groups": [{ "group": 0, "weight": 1.0 }] },
                        { "position": [1, 0, 0] },
                        { "position": [0, 1, 0] }
                    ],
                    "faces": [{ "vertices": [0, 1, 2], "normal": [0, 0, 1] }]
                },
                "vertex_groups": ["Root"],
                "armature": "Rig"
            },
            { "name": "Camera" }
        ],
        "armatures": [
            {
                "name": "Rig",
                "bones": [{ "name": "Root" }],
                "action": { "frame_start": 1, "frame_end": 4 }
            }
        ]
    }"#;

    #[test]
    fn test_load_scene_json() {
        let scene = load_from_str(SCENE).unwrap();
        assert_eq!(scene.current_frame, 12);
        assert_eq!(scene.objects.len(), 2);
        assert_eq!(scene.mesh_objects().count(), 1);

        let cube = scene.object("Cube").unwrap();
        assert!(cube.selected);
        assert_eq!(cube.scale, Vec3::splat(2.0));
        let mesh = cube.mesh.as_ref().unwrap();
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.vertices[0].groups[0].weight, 1.0);
        assert!(!mesh.faces[0].smooth);

        let rig = scene.armature_for(cube).unwrap();
        assert_eq!(rig.world_matrix, Mat4::IDENTITY);
        assert_eq!(rig.bones[0].matrix_local, Mat4::IDENTITY);
        assert_eq!(rig.action.as_ref().unwrap().frame_count(), 4);
    }

    #[test]
    fn test_camera_defaults() {
        let scene = load_from_str(SCENE).unwrap();
        let camera = scene.object("Camera").unwrap();
        assert!(!camera.is_mesh());
        assert_eq!(camera.scale, Vec3::ONE);
        assert!(scene.armature_for(camera).is_none());
    }

    #[test]
    fn test_poses_sorted_on_load() {
        let json = r#"{
            "objects": [],
            "armatures": [{
                "name": "Rig",
                "bones": [{ "name": "Root" }],
                "action": {
                    "frame_start": 0,
                    "frame_end": 9,
                    "poses": [{ "frame": 9 }, { "frame": 0 }, { "frame": 4 }]
                }
            }]
        }"#;
        let scene = load_from_str(json).unwrap();
        let action = scene.armatures[0].action.as_ref().unwrap();
        let frames: Vec<i32> = action.poses.iter().map(|p| p.frame).collect();
        assert_eq!(frames, vec![0, 4, 9]);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            load_from_str("{ \"objects\": 3 }"),
            Err(crate::error::SpmError::Json(_))
        ));
    }
}
