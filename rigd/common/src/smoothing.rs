use glam::{EulerRot, Quat};

use crate::math;

/// One step of exponential smoothing: move `previous` toward `target` by
/// `factor` along the shorter arc.
///
/// With a fixed target this converges monotonically; with a moving target it
/// behaves as a first-order low-pass filter whose lag grows with `1 / factor`.
pub fn smooth(previous: Quat, target: Quat, factor: f32) -> Quat {
    math::slerp(previous, target, factor)
}

/// Linear step of a scalar weight toward `target`.
pub fn smooth_weight(previous: f32, target: f32, factor: f32) -> f32 {
    let factor = if factor.is_nan() { 0.0 } else { factor.clamp(0.0, 1.0) };
    previous + (target - previous) * factor
}

/// Rotation carrying `fraction` of `head`'s XYZ Euler angles
/// (pitch, yaw, roll).
pub fn propagate_fraction(head: Quat, fraction: [f32; 3]) -> Quat {
    let (pitch, yaw, roll) = head.to_euler(EulerRot::XYZ);
    Quat::from_euler(
        EulerRot::XYZ,
        pitch * fraction[0],
        yaw * fraction[1],
        roll * fraction[2],
    )
}
