use serde::{Deserialize, Serialize};

/// Memory layout of the 16 values of the face transform.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum MatrixLayout {
    #[default]
    #[serde(alias = "row_major", alias = "Row")]
    RowMajor,
    #[serde(alias = "column_major", alias = "Column", alias = "ColMajor")]
    ColumnMajor,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LandmarkFilterConfig {
    pub enabled: bool,
    pub min_cutoff: f32,
    pub beta: f32,
}

impl Default for LandmarkFilterConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            min_cutoff: 1.0,
            beta: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RetargetConfig {
    /// Slerp factor applied to every solved bone each frame.
    pub smoothing_factor: f32,
    /// Head rotation uses `smoothing_factor * head_smoothing_multiplier`.
    pub head_smoothing_multiplier: f32,
    /// Morph weights use `smoothing_factor * expression_smoothing_multiplier`.
    pub expression_smoothing_multiplier: f32,

    /// Share of the head's pitch/yaw/roll copied onto the neck.
    pub neck_fraction: [f32; 3],
    /// Share of the head's pitch/yaw/roll copied onto the upper spine.
    pub spine_fraction: [f32; 3],

    /// Rest-pose direction every solved bone points along, in its own frame.
    pub bone_axis: [f32; 3],
    /// Prepended to every rig bone name (e.g. "mixamorig:").
    pub bone_prefix: String,

    /// Mirror all streams across the X axis (selfie view).
    pub mirror: bool,
    #[serde(alias = "matrix_layout")]
    pub face_matrix_layout: MatrixLayout,
    /// Landmarks reporting a lower visibility are treated as missing.
    pub min_visibility: f32,

    /// Meshes that receive facial expressions. Empty means all meshes.
    pub expression_meshes: Vec<String>,

    pub landmark_filter: LandmarkFilterConfig,
}

fn default_expression_meshes() -> Vec<String> {
    [
        "Wolf3D_Head",
        "Wolf3D_Teeth",
        "Wolf3D_Beard",
        "Wolf3D_Avatar",
        "Wolf3D_Head_Custom",
        "EyeLeft",
        "EyeRight",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for RetargetConfig {
    fn default() -> Self {
        Self {
            smoothing_factor: 0.3,
            head_smoothing_multiplier: 2.0,
            expression_smoothing_multiplier: 3.0,
            neck_fraction: [0.3, 0.5, 0.3],
            spine_fraction: [0.1, 0.2, 0.1],
            bone_axis: [0.0, 1.0, 0.0],
            bone_prefix: String::new(),
            mirror: false,
            face_matrix_layout: MatrixLayout::default(),
            min_visibility: 0.0,
            expression_meshes: default_expression_meshes(),
            landmark_filter: LandmarkFilterConfig::default(),
        }
    }
}

impl RetargetConfig {
    pub fn bone_factor(&self) -> f32 {
        self.smoothing_factor.clamp(0.0, 1.0)
    }

    pub fn head_factor(&self) -> f32 {
        (self.smoothing_factor * self.head_smoothing_multiplier).clamp(0.0, 1.0)
    }

    pub fn expression_factor(&self) -> f32 {
        (self.smoothing_factor * self.expression_smoothing_multiplier).clamp(0.0, 1.0)
    }

    pub fn bone_name(&self, base: &str) -> String {
        format!("{}{}", self.bone_prefix, base)
    }

    pub fn receives_expressions(&self, mesh_name: &str) -> bool {
        self.expression_meshes.is_empty() || self.expression_meshes.iter().any(|m| m == mesh_name)
    }
}
