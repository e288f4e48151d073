use common::math::angular_distance;
use common::smoothing::{propagate_fraction, smooth, smooth_weight};
use common::solver::solve_directional_rotation;
use common::SkipReason;
use glam::{Quat, Vec3};

mod directional {
    use super::*;

    #[test]
    fn points_axis_at_target() {
        let q = solve_directional_rotation(
            Quat::IDENTITY,
            Vec3::Y,
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(2.0, 1.0, 0.0),
        )
        .unwrap();
        assert!((q * Vec3::Y - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn result_is_relative_to_parent() {
        let parent = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
        let from = Vec3::ZERO;
        let to = Vec3::new(0.3, -0.2, 0.5);
        let local = solve_directional_rotation(parent, Vec3::Y, from, to).unwrap();

        let world_direction = (parent * local) * Vec3::Y;
        assert!((world_direction - to.normalize()).length() < 1e-5);
    }

    #[test]
    fn coincident_points_are_degenerate() {
        let p = Vec3::new(0.1, 0.2, 0.3);
        assert_eq!(
            solve_directional_rotation(Quat::IDENTITY, Vec3::Y, p, p),
            Err(SkipReason::DegenerateGeometry)
        );
    }
}

mod smoothing {
    use super::*;

    #[test]
    fn converges_without_overshoot() {
        let target = Quat::from_rotation_x(1.2);
        let mut current = Quat::IDENTITY;
        let mut last_distance = angular_distance(current, target);
        for _ in 0..60 {
            current = smooth(current, target, 0.3);
            let distance = angular_distance(current, target);
            assert!(distance <= last_distance + 1e-3);
            assert!(angular_distance(Quat::IDENTITY, current) <= 1.2 + 2e-3);
            last_distance = distance;
        }
        assert!(last_distance < 2e-3);
    }

    #[test]
    fn factor_one_snaps() {
        let target = Quat::from_rotation_y(-0.8);
        assert!(angular_distance(smooth(Quat::IDENTITY, target, 1.0), target) < 2e-3);
    }

    #[test]
    fn weight_steps_linearly() {
        assert!((smooth_weight(0.0, 1.0, 0.9) - 0.9).abs() < 1e-6);
        assert_eq!(smooth_weight(0.5, 1.0, 0.0), 0.5);
        assert_eq!(smooth_weight(0.5, 1.0, 3.0), 1.0);
    }
}

mod propagation {
    use super::*;

    #[test]
    fn takes_fraction_of_each_axis() {
        let head = Quat::from_rotation_y(0.4);
        let neck = propagate_fraction(head, [0.3, 0.5, 0.3]);
        assert!(angular_distance(neck, Quat::from_rotation_y(0.2)) < 2e-3);

        let spine = propagate_fraction(head, [0.1, 0.2, 0.1]);
        assert!(angular_distance(spine, Quat::from_rotation_y(0.08)) < 2e-3);
    }

    #[test]
    fn identity_head_leaves_identity() {
        let q = propagate_fraction(Quat::IDENTITY, [0.3, 0.5, 0.3]);
        assert!(angular_distance(q, Quat::IDENTITY) < 2e-3);
    }
}
