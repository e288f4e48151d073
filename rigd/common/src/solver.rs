use glam::{Quat, Vec3};
use thiserror::Error;

use crate::math;

/// Why a bone or morph was left untouched this frame. None of these are
/// fatal: the affected joint simply holds its last pose.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum SkipReason {
    #[error("input stream or joint not reported")]
    MissingInput,
    #[error("landmarks coincide, no usable direction")]
    DegenerateGeometry,
    #[error("bone not present in the bound rig")]
    UnresolvedBone,
}

/// Local rotation that points `default_axis` from `from` toward `to`, relative
/// to a parent whose current world orientation is `parent_world`.
///
/// `from` and `to` are engine-space positions; `default_axis` is the bone's
/// rest direction in its own frame and must be unit length.
pub fn solve_directional_rotation(
    parent_world: Quat,
    default_axis: Vec3,
    from: Vec3,
    to: Vec3,
) -> Result<Quat, SkipReason> {
    let direction =
        math::normalize(math::subtract(to, from)).ok_or(SkipReason::DegenerateGeometry)?;
    let local_direction = parent_world.inverse() * direction;
    let local_direction =
        math::normalize(local_direction).ok_or(SkipReason::DegenerateGeometry)?;
    Ok(math::quaternion_from_to(default_axis, local_direction))
}
