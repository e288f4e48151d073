use anyhow::{Context, Result};
use glam::Quat;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::{MorphMesh, Skeleton, SkeletonError};

fn identity_rotation() -> [f32; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoneDescription {
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    /// Rest local rotation as `[x, y, z, w]`.
    #[serde(default = "identity_rotation")]
    pub rotation: [f32; 4],
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MeshDescription {
    pub name: String,
    #[serde(default)]
    pub morph_targets: Vec<String>,
}

/// Bone hierarchy and morph vocabulary of a loaded character, as handed over
/// by whatever loaded the asset. Bones are listed parents first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RigDescription {
    #[serde(default = "identity_rotation")]
    pub root_rotation: [f32; 4],
    pub bones: Vec<BoneDescription>,
    #[serde(default)]
    pub meshes: Vec<MeshDescription>,
}

impl RigDescription {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Failed to open rig file {:?}", path))?;
        let reader = BufReader::new(file);
        let rig: RigDescription = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse rig file {:?}", path))?;
        info!(
            "Loaded rig from {:?}: {} bones, {} meshes",
            path,
            rig.bones.len(),
            rig.meshes.len()
        );
        Ok(rig)
    }

    pub fn build(&self) -> Result<(Skeleton, Vec<MorphMesh>), SkeletonError> {
        let mut skeleton = Skeleton::new();
        let root = Quat::from_array(self.root_rotation);
        if !root.is_finite() || root.length() < 1e-6 {
            return Err(SkeletonError::InvalidRotation("<root>".to_string()));
        }
        skeleton.set_root_rotation(root);
        for bone in &self.bones {
            skeleton.add_bone(
                &bone.name,
                bone.parent.as_deref(),
                Quat::from_array(bone.rotation),
            )?;
        }
        let meshes = self
            .meshes
            .iter()
            .map(|m| MorphMesh::new(&m.name, &m.morph_targets))
            .collect();
        Ok((skeleton, meshes))
    }
}
