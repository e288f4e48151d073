//! Vector and rotation helpers shared by the solver and the smoothing stage.
//!
//! Thin wrappers over `glam` that pin down the edge-case behavior the
//! retargeting code relies on: zero-length vectors never normalize, `t` is
//! always clamped, and degenerate matrices never produce a rotation.

use glam::{Mat3, Mat4, Quat, Vec3};

use crate::MatrixLayout;

/// Below this length a vector has no usable direction.
pub const DIRECTION_EPSILON: f32 = 1e-6;

pub fn subtract(a: Vec3, b: Vec3) -> Vec3 {
    a - b
}

pub fn dot(a: Vec3, b: Vec3) -> f32 {
    a.dot(b)
}

pub fn cross(a: Vec3, b: Vec3) -> Vec3 {
    a.cross(b)
}

/// Unit vector in the direction of `v`, or `None` when `v` is (nearly) zero
/// or not finite.
pub fn normalize(v: Vec3) -> Option<Vec3> {
    let length = v.length();
    if !length.is_finite() || length < DIRECTION_EPSILON {
        return None;
    }
    Some(v / length)
}

/// Shortest-arc rotation taking unit vector `from` onto unit vector `to`.
///
/// Antiparallel inputs rotate half a turn about an arbitrary axis orthogonal
/// to `from`.
pub fn quaternion_from_to(from: Vec3, to: Vec3) -> Quat {
    Quat::from_rotation_arc(from, to)
}

/// Rotation part of a 4x4 transform. Scale and translation are discarded.
///
/// Returns `None` for singular or non-finite matrices.
pub fn quaternion_from_matrix(values: &[f32; 16], layout: MatrixLayout) -> Option<Quat> {
    if values.iter().any(|v| !v.is_finite()) {
        return None;
    }

    let matrix = match layout {
        MatrixLayout::ColumnMajor => Mat4::from_cols_array(values),
        MatrixLayout::RowMajor => Mat4::from_cols_array(values).transpose(),
    };

    let basis = Mat3::from_mat4(matrix);
    if basis.determinant().abs() < DIRECTION_EPSILON {
        return None;
    }

    let (_scale, rotation, _translation) = matrix.to_scale_rotation_translation();
    let rotation = rotation.normalize();
    if !rotation.is_finite() {
        return None;
    }
    Some(rotation)
}

/// Spherical interpolation from `from` toward `to`.
///
/// `t` is clamped to [0, 1]. The path always takes the shorter arc; nearly
/// identical inputs fall back to a normalized lerp.
pub fn slerp(from: Quat, to: Quat, t: f32) -> Quat {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    if t == 0.0 {
        return from;
    }
    from.slerp(to, t)
}

/// Angle in radians of the rotation taking `a` to `b`, in [0, PI].
pub fn angular_distance(a: Quat, b: Quat) -> f32 {
    let d = a.normalize().dot(b.normalize()).abs().min(1.0);
    2.0 * d.acos()
}
