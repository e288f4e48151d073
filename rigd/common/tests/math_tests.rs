use common::math::{
    angular_distance, cross, dot, normalize, quaternion_from_matrix, quaternion_from_to, slerp,
    subtract,
};
use common::MatrixLayout;
use glam::{Mat4, Quat, Vec3};
use proptest::prelude::*;

fn row_major(m: Mat4) -> [f32; 16] {
    m.transpose().to_cols_array()
}

#[test]
fn normalize_rejects_zero_and_nan() {
    assert_eq!(normalize(Vec3::ZERO), None);
    assert_eq!(normalize(Vec3::new(1e-9, 0.0, 0.0)), None);
    assert_eq!(normalize(Vec3::new(f32::NAN, 1.0, 0.0)), None);
    let n = normalize(Vec3::new(0.0, 3.0, 4.0)).unwrap();
    assert!((n.length() - 1.0).abs() < 1e-6);
}

#[test]
fn vector_basics() {
    let a = Vec3::new(1.0, 2.0, 3.0);
    let b = Vec3::new(0.5, -1.0, 2.0);
    assert_eq!(subtract(a, b), Vec3::new(0.5, 3.0, 1.0));
    assert_eq!(dot(Vec3::X, Vec3::Y), 0.0);
    assert_eq!(cross(Vec3::X, Vec3::Y), Vec3::Z);
    assert_eq!(dot(cross(a, b), a), 0.0);
}

#[test]
fn from_to_handles_antiparallel() {
    let q = quaternion_from_to(Vec3::Y, -Vec3::Y);
    assert!((q * Vec3::Y - -Vec3::Y).length() < 2e-3);
}

#[test]
fn matrix_layouts_are_transposes() {
    let rotation = Quat::from_rotation_y(0.7);
    let m = Mat4::from_quat(rotation);

    let from_rows = quaternion_from_matrix(&row_major(m), MatrixLayout::RowMajor).unwrap();
    let from_cols = quaternion_from_matrix(&m.to_cols_array(), MatrixLayout::ColumnMajor).unwrap();
    assert!(angular_distance(from_rows, rotation) < 2e-3);
    assert!(angular_distance(from_cols, rotation) < 2e-3);

    // Reading a row-major matrix as column-major yields the inverse rotation.
    let misread = quaternion_from_matrix(&row_major(m), MatrixLayout::ColumnMajor).unwrap();
    assert!(angular_distance(misread, rotation.inverse()) < 2e-3);
}

#[test]
fn matrix_scale_and_translation_are_discarded() {
    let rotation = Quat::from_rotation_x(-0.4);
    let m = Mat4::from_scale_rotation_translation(
        Vec3::splat(2.5),
        rotation,
        Vec3::new(3.0, -1.0, 40.0),
    );
    let q = quaternion_from_matrix(&row_major(m), MatrixLayout::RowMajor).unwrap();
    assert!(angular_distance(q, rotation) < 2e-3);
    assert!((q.length() - 1.0).abs() < 2e-3);
}

#[test]
fn degenerate_matrices_have_no_rotation() {
    assert_eq!(quaternion_from_matrix(&[0.0; 16], MatrixLayout::RowMajor), None);

    let mut values = Mat4::IDENTITY.to_cols_array();
    values[5] = f32::NAN;
    assert_eq!(quaternion_from_matrix(&values, MatrixLayout::RowMajor), None);
}

#[test]
fn slerp_clamps_t() {
    let a = Quat::IDENTITY;
    let b = Quat::from_rotation_z(1.0);
    assert_eq!(slerp(a, b, -3.0), a);
    assert_eq!(slerp(a, b, f32::NAN), a);
    assert!(angular_distance(slerp(a, b, 7.0), b) < 2e-3);
}

fn unit_vector() -> impl Strategy<Value = Vec3> {
    (-1.0f32..1.0, -1.0f32..1.0, -1.0f32..1.0)
        .prop_filter_map("too short", |(x, y, z)| {
            let v = Vec3::new(x, y, z);
            (v.length() > 0.1).then(|| v.normalize())
        })
}

fn rotation() -> impl Strategy<Value = Quat> {
    (unit_vector(), -3.0f32..3.0).prop_map(|(axis, angle)| Quat::from_axis_angle(axis, angle))
}

proptest! {
    #[test]
    fn from_to_maps_from_onto_to(a in unit_vector(), b in unit_vector()) {
        prop_assume!(a.dot(b) > -0.99);
        let q = quaternion_from_to(a, b);
        prop_assert!((q * a - b).length() < 1e-3);
        prop_assert!((q.length() - 1.0).abs() < 2e-3);
    }

    #[test]
    fn from_to_same_direction_is_identity(a in unit_vector()) {
        let q = quaternion_from_to(a, a);
        prop_assert!(angular_distance(q, Quat::IDENTITY) < 2e-3);
    }

    #[test]
    fn slerp_hits_endpoints(a in rotation(), b in rotation()) {
        prop_assert_eq!(slerp(a, b, 0.0), a);
        prop_assert!(angular_distance(slerp(a, b, 1.0), b) < 2e-3);
    }

    #[test]
    fn slerp_stays_on_the_arc(a in rotation(), b in rotation(), t in 0.0f32..1.0) {
        let total = angular_distance(a, b);
        let mid = slerp(a, b, t);
        prop_assert!((mid.length() - 1.0).abs() < 2e-3);
        prop_assert!(angular_distance(a, mid) <= total + 4e-3);
        prop_assert!(angular_distance(mid, b) <= total + 4e-3);
    }
}
