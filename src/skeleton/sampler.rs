//! Per-frame keyframe sampling.

use super::{Joint, Keyframe};
use crate::error::Result;
use crate::scene::{Armature, FrameCursor, FrameEvaluator};
use crate::types::{relative_to_parent, root_relative, Transform};
use glam::Mat4;

/// Sample one keyframe per joint for every frame of the armature's action.
///
/// `joints` must come from [`extract_joints`](super::extract_joints) for the
/// same armature. The evaluator's frame is restored before returning, on
/// success and on error. An armature without an action samples nothing.
pub fn sample_keyframes<E: FrameEvaluator + ?Sized>(
    armature: &Armature,
    joints: &mut [Joint],
    evaluator: &mut E,
) -> Result<()> {
    let Some(action) = &armature.action else {
        tracing::debug!("Armature '{}' has no action, no keyframes sampled", armature.name);
        return Ok(());
    };
    debug_assert_eq!(joints.len(), armature.bones.len());

    let first = action.frame_start;
    let mut cursor = FrameCursor::new(evaluator);
    let mut poses: Vec<Mat4> = Vec::with_capacity(armature.bones.len());

    for frame in action.frame_start..=action.frame_end {
        cursor.set_frame(frame);
        let world = cursor.armature_world(armature);

        poses.clear();
        poses.extend(armature.bones.iter().map(|bone| cursor.bone_pose(armature, bone)));

        for (joint, pose) in joints.iter_mut().zip(&poses) {
            let matrix = match joint.parent {
                Some(p) => relative_to_parent(poses[p], *pose, &joint.name)?,
                None => root_relative(world, *pose),
            };
            joint.keyframes.push(Keyframe {
                frame: (frame - first) as u32,
                transform: Transform::from_matrix(matrix),
            });
        }
    }

    tracing::debug!(
        "Sampled {} frames of '{}' for {} joints",
        action.frame_count(),
        action.name,
        joints.len()
    );
    Ok(())
}
