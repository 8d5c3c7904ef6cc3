//! Frame evaluation for posed armatures.
//!
//! The evaluator owns the host's "current frame" cursor. Code that moves
//! the cursor does so through a [`FrameCursor`], which puts it back when
//! dropped, so callers never observe a changed frame after export.

use super::{Armature, Bone, PoseFrame};
use glam::Mat4;
use std::ops::{Deref, DerefMut};

/// Evaluates armature poses at a settable frame.
pub trait FrameEvaluator {
    /// The frame the evaluator is currently on.
    fn current_frame(&self) -> i32;

    /// Move to `frame` and re-evaluate poses.
    fn set_frame(&mut self, frame: i32);

    /// World matrix of the armature at the current frame.
    fn armature_world(&self, armature: &Armature) -> Mat4;

    /// Posed matrix of `bone` in armature space at the current frame.
    fn bone_pose(&self, armature: &Armature, bone: &Bone) -> Mat4;
}

/// Scoped access to an evaluator that restores its frame on drop.
pub struct FrameCursor<'a, E: FrameEvaluator + ?Sized> {
    evaluator: &'a mut E,
    saved_frame: i32,
}

impl<'a, E: FrameEvaluator + ?Sized> FrameCursor<'a, E> {
    pub fn new(evaluator: &'a mut E) -> Self {
        let saved_frame = evaluator.current_frame();
        Self {
            evaluator,
            saved_frame,
        }
    }

    /// Frame that will be restored when the cursor is dropped.
    pub fn saved_frame(&self) -> i32 {
        self.saved_frame
    }
}

impl<E: FrameEvaluator + ?Sized> Deref for FrameCursor<'_, E> {
    type Target = E;

    fn deref(&self) -> &E {
        self.evaluator
    }
}

impl<E: FrameEvaluator + ?Sized> DerefMut for FrameCursor<'_, E> {
    fn deref_mut(&mut self) -> &mut E {
        self.evaluator
    }
}

impl<E: FrameEvaluator + ?Sized> Drop for FrameCursor<'_, E> {
    fn drop(&mut self) {
        self.evaluator.set_frame(self.saved_frame);
    }
}

/// Evaluator over the baked poses stored in each armature's action.
///
/// A bone takes its matrix from the latest pose frame at or before the
/// current frame that mentions it, and its rest matrix otherwise. Pose
/// frames are looked up by binary search, so `Action::poses` must be sorted.
#[derive(Debug, Clone, Copy, Default)]
pub struct BakedPoseEvaluator {
    frame: i32,
}

impl BakedPoseEvaluator {
    pub fn new(frame: i32) -> Self {
        Self { frame }
    }

    fn held_value<T>(
        &self,
        armature: &Armature,
        pick: impl Fn(&PoseFrame) -> Option<T>,
    ) -> Option<T> {
        let action = armature.action.as_ref()?;
        let end = action.poses.partition_point(|pose| pose.frame <= self.frame);
        action.poses[..end].iter().rev().find_map(pick)
    }
}

impl FrameEvaluator for BakedPoseEvaluator {
    fn current_frame(&self) -> i32 {
        self.frame
    }

    fn set_frame(&mut self, frame: i32) {
        self.frame = frame;
    }

    fn armature_world(&self, armature: &Armature) -> Mat4 {
        self.held_value(armature, |pose| pose.world_matrix)
            .unwrap_or(armature.world_matrix)
    }

    fn bone_pose(&self, armature: &Armature, bone: &Bone) -> Mat4 {
        self.held_value(armature, |pose| pose.bones.get(&bone.name).copied())
            .unwrap_or(bone.matrix_local)
    }
}
