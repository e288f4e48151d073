use common::coords::CoordinateAdapter;
use common::{Landmark, LandmarkSpace, MorphMesh};
use glam::{Quat, Vec3};

mod morphs {
    use super::*;

    fn head() -> MorphMesh {
        MorphMesh::new("Wolf3D_Head", &["jawOpen", "eyeBlinkLeft", "mouthSmileRight"])
    }

    #[test]
    fn dictionary_maps_names_to_influences() {
        let mut mesh = head();
        assert_eq!(mesh.index_of("eyeBlinkLeft"), Some(1));
        assert_eq!(mesh.weight("mouthSmileRight"), Some(0.0));
        assert!(mesh.set_weight("jawOpen", 0.25));
        assert!(!mesh.set_weight("tongueOut", 1.0));
        assert_eq!(mesh.influences(), &[0.25, 0.0, 0.0]);
    }

    #[test]
    fn expression_steps_toward_scores() {
        let mut mesh = head();
        let scores = [("jawOpen", 1.0), ("eyeBlinkLeft", 0.5), ("tongueOut", 1.0)];

        let touched = mesh.apply_expression(scores.iter().copied(), 0.9);
        assert_eq!(touched, 2);
        assert!((mesh.weight("jawOpen").unwrap() - 0.9).abs() < 1e-6);
        assert!((mesh.weight("eyeBlinkLeft").unwrap() - 0.45).abs() < 1e-6);
        assert_eq!(mesh.weight("mouthSmileRight"), Some(0.0));
    }

    #[test]
    fn non_finite_scores_are_ignored() {
        let mut mesh = head();
        mesh.set_weight("jawOpen", 0.4);
        let touched = mesh.apply_expression([("jawOpen", f32::NAN)], 1.0);
        assert_eq!(touched, 0);
        assert_eq!(mesh.weight("jawOpen"), Some(0.4));
    }
}

mod coordinates {
    use super::*;

    #[test]
    fn world_space_flips_y_and_z() {
        let adapter = CoordinateAdapter::new(false);
        let p = adapter.to_engine_space(&Landmark::new(0.1, 0.2, 0.3), LandmarkSpace::World);
        assert_eq!(p, Vec3::new(0.1, -0.2, -0.3));
    }

    #[test]
    fn normalized_space_moves_origin_to_bottom() {
        let adapter = CoordinateAdapter::new(false);
        let p = adapter.to_engine_space(&Landmark::new(0.5, 0.25, 0.1), LandmarkSpace::Normalized);
        assert_eq!(p, Vec3::new(0.5, 0.75, -0.1));
    }

    #[test]
    fn mirror_negates_x_for_points_and_rotations() {
        let adapter = CoordinateAdapter::new(true);
        assert!(adapter.mirrored());
        let p = adapter.to_engine_space(&Landmark::new(0.1, 0.2, 0.3), LandmarkSpace::World);
        assert_eq!(p, Vec3::new(-0.1, -0.2, -0.3));

        // A yaw to one side becomes a yaw to the other.
        let yaw = Quat::from_rotation_y(0.5);
        let mirrored = adapter.rotation_to_engine_space(yaw);
        let forward = mirrored * Vec3::Z;
        let expected = Quat::from_rotation_y(-0.5) * Vec3::Z;
        assert!((forward - expected).length() < 1e-5);
    }

    #[test]
    fn missing_points_do_not_convert() {
        let adapter = CoordinateAdapter::default();
        let hidden = Landmark::new(0.0, 0.0, 0.0).with_visibility(0.2);
        assert_eq!(adapter.convert(&hidden, LandmarkSpace::World, 0.5), None);
        assert!(adapter.convert(&hidden, LandmarkSpace::World, 0.1).is_some());

        let broken = Landmark::new(f32::INFINITY, 0.0, 0.0);
        assert_eq!(adapter.convert(&broken, LandmarkSpace::World, 0.0), None);
    }
}
