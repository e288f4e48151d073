use common::{MatrixLayout, RetargetConfig};

#[test]
fn defaults_match_reference_tuning() {
    let config = RetargetConfig::default();
    assert_eq!(config.bone_factor(), 0.3);
    assert!((config.head_factor() - 0.6).abs() < 1e-6);
    assert!((config.expression_factor() - 0.9).abs() < 1e-6);
    assert_eq!(config.neck_fraction, [0.3, 0.5, 0.3]);
    assert_eq!(config.spine_fraction, [0.1, 0.2, 0.1]);
    assert_eq!(config.face_matrix_layout, MatrixLayout::RowMajor);
    assert!(config.receives_expressions("Wolf3D_Head"));
    assert!(!config.receives_expressions("Wolf3D_Body"));
}

#[test]
fn factors_are_clamped() {
    let config = RetargetConfig {
        smoothing_factor: 0.6,
        ..Default::default()
    };
    assert_eq!(config.head_factor(), 1.0);
    assert_eq!(config.expression_factor(), 1.0);

    let config = RetargetConfig {
        smoothing_factor: -1.0,
        ..Default::default()
    };
    assert_eq!(config.bone_factor(), 0.0);
}

#[test]
fn partial_json_fills_defaults() {
    let config: RetargetConfig = serde_json::from_str(
        r#"{ "smoothing_factor": 0.5, "bone_prefix": "mixamorig:", "matrix_layout": "column_major" }"#,
    )
    .unwrap();
    assert_eq!(config.smoothing_factor, 0.5);
    assert_eq!(config.bone_name("Head"), "mixamorig:Head");
    assert_eq!(config.face_matrix_layout, MatrixLayout::ColumnMajor);
    assert_eq!(config.head_smoothing_multiplier, 2.0);
    assert!(!config.landmark_filter.enabled);
    assert_eq!(config.expression_meshes.len(), 7);
}
