use common::math::angular_distance;
use common::{RigDescription, Skeleton, SkeletonError};
use glam::{Quat, Vec3};

fn chain() -> Skeleton {
    let mut skeleton = Skeleton::new();
    skeleton.add_bone("Hips", None, Quat::IDENTITY).unwrap();
    skeleton
        .add_bone("Spine", Some("Hips"), Quat::from_rotation_z(0.5))
        .unwrap();
    skeleton
        .add_bone("Neck", Some("Spine"), Quat::from_rotation_z(0.25))
        .unwrap();
    skeleton
}

#[test]
fn parents_precede_children() {
    let skeleton = chain();
    for id in skeleton.ids() {
        if let Some(parent) = skeleton.parent(id) {
            assert!(parent.index() < id.index());
        }
    }
    let hips = skeleton.resolve("Hips").unwrap();
    let spine = skeleton.resolve("Spine").unwrap();
    assert_eq!(skeleton.children(hips), &[spine]);
    assert_eq!(skeleton.name(spine), "Spine");
}

#[test]
fn world_rotation_composes_root_and_ancestors() {
    let mut skeleton = chain();
    let neck = skeleton.resolve("Neck").unwrap();
    assert!(angular_distance(skeleton.world_rotation(neck), Quat::from_rotation_z(0.75)) < 2e-3);

    skeleton.set_root_rotation(Quat::from_rotation_z(0.25));
    assert!(angular_distance(skeleton.world_rotation(neck), Quat::from_rotation_z(1.0)) < 2e-3);
    assert!(
        angular_distance(skeleton.parent_world_rotation(neck), Quat::from_rotation_z(0.75)) < 2e-3
    );

    let hips = skeleton.resolve("Hips").unwrap();
    assert_eq!(skeleton.parent_world_rotation(hips), skeleton.root_rotation());
    assert_eq!(skeleton.world_rotation_of(None), Quat::IDENTITY);
}

#[test]
fn setting_a_parent_moves_the_child_in_world_space() {
    let mut skeleton = chain();
    let spine = skeleton.resolve("Spine").unwrap();
    let neck = skeleton.resolve("Neck").unwrap();
    let before = skeleton.world_rotation(neck) * Vec3::Y;

    skeleton.set_local_rotation(spine, Quat::IDENTITY);
    let after = skeleton.world_rotation(neck) * Vec3::Y;
    assert!((before - after).length() > 0.1);
    assert_eq!(skeleton.local_rotation(neck), Quat::from_rotation_z(0.25));
}

#[test]
fn invalid_bones_are_rejected() {
    let mut skeleton = chain();
    assert_eq!(
        skeleton.add_bone("Spine", Some("Hips"), Quat::IDENTITY),
        Err(SkeletonError::DuplicateBone("Spine".to_string()))
    );
    assert_eq!(
        skeleton.add_bone("Head", Some("Missing"), Quat::IDENTITY),
        Err(SkeletonError::UnknownParent {
            bone: "Head".to_string(),
            parent: "Missing".to_string(),
        })
    );
    assert_eq!(
        skeleton.add_bone("Head", None, Quat::from_xyzw(0.0, 0.0, 0.0, 0.0)),
        Err(SkeletonError::InvalidRotation("Head".to_string()))
    );
    assert_eq!(skeleton.len(), 3);
}

#[test]
fn rest_rotations_are_normalized() {
    let mut skeleton = Skeleton::new();
    let id = skeleton
        .add_bone("Root", None, Quat::from_xyzw(0.0, 0.0, 0.0, 4.0))
        .unwrap();
    assert_eq!(skeleton.local_rotation(id), Quat::IDENTITY);
}

#[test]
fn every_skeleton_has_its_own_identity() {
    let a = chain();
    let b = a.clone();
    let c = chain();
    assert_ne!(a.id(), b.id());
    assert_ne!(a.id(), c.id());
    assert_ne!(b.id(), c.id());
    assert_eq!(a.len(), b.len());
    assert_eq!(a.resolve("Spine"), b.resolve("Spine"));
}

#[test]
fn rig_description_parses_with_defaults() {
    let json = r#"{
        "bones": [
            { "name": "Hips" },
            { "name": "Spine", "parent": "Hips", "rotation": [0.0, 0.0, 0.0, 2.0] }
        ],
        "meshes": [
            { "name": "Wolf3D_Head", "morph_targets": ["jawOpen", "eyeBlinkLeft"] }
        ]
    }"#;
    let rig: RigDescription = serde_json::from_str(json).unwrap();
    assert_eq!(rig.root_rotation, [0.0, 0.0, 0.0, 1.0]);
    assert_eq!(rig.bones[0].rotation, [0.0, 0.0, 0.0, 1.0]);

    let (skeleton, meshes) = rig.build().unwrap();
    assert_eq!(skeleton.len(), 2);
    assert_eq!(meshes.len(), 1);
    assert_eq!(meshes[0].target_names(), vec!["jawOpen", "eyeBlinkLeft"]);
}

#[test]
fn rig_description_reports_bad_hierarchy() {
    let json = r#"{ "bones": [ { "name": "Arm", "parent": "Shoulder" } ] }"#;
    let rig: RigDescription = serde_json::from_str(json).unwrap();
    assert!(matches!(
        rig.build(),
        Err(SkeletonError::UnknownParent { .. })
    ));

    let json = r#"{ "root_rotation": [0.0, 0.0, 0.0, 0.0], "bones": [] }"#;
    let rig: RigDescription = serde_json::from_str(json).unwrap();
    assert!(matches!(rig.build(), Err(SkeletonError::InvalidRotation(_))));
}

#[test]
fn rig_description_loads_from_disk() {
    let path = std::env::temp_dir().join(format!("rigd_rig_{}.json", std::process::id()));
    std::fs::write(&path, r#"{ "bones": [ { "name": "Head" } ] }"#).unwrap();
    let rig = RigDescription::load(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(rig.bones.len(), 1);

    assert!(RigDescription::load(&path).is_err());
}
