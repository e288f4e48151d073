pub mod generic_udp;

use anyhow::Result;
use common::{MorphMesh, Skeleton};
use generic_udp::UdpPoseSink;
use serde::{Deserialize, Serialize};

use crate::config::OutputConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonePose {
    pub name: String,
    /// Local rotation as `[x, y, z, w]`.
    pub rotation: [f32; 4],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshWeights {
    pub name: String,
    pub targets: Vec<String>,
    pub weights: Vec<f32>,
}

/// Rig state after a tick, as sent to downstream renderers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseSnapshot {
    pub timestamp_ms: f64,
    pub bones: Vec<BonePose>,
    pub meshes: Vec<MeshWeights>,
}

impl PoseSnapshot {
    pub fn capture(timestamp_ms: f64, skeleton: &Skeleton, meshes: &[MorphMesh]) -> Self {
        let bones = skeleton
            .ids()
            .map(|id| BonePose {
                name: skeleton.name(id).to_string(),
                rotation: skeleton.local_rotation(id).to_array(),
            })
            .collect();
        let meshes = meshes
            .iter()
            .map(|mesh| MeshWeights {
                name: mesh.name().to_string(),
                targets: mesh.target_names().into_iter().map(String::from).collect(),
                weights: mesh.influences().to_vec(),
            })
            .collect();
        Self {
            timestamp_ms,
            bones,
            meshes,
        }
    }

    pub fn bone(&self, name: &str) -> Option<&BonePose> {
        self.bones.iter().find(|b| b.name == name)
    }
}

pub trait PoseSink {
    fn initialize(&mut self) -> Result<()>;
    fn send(&self, snapshot: &PoseSnapshot) -> Result<()>;
}

pub enum PoseBackend {
    Udp(UdpPoseSink),
    Disabled,
}

impl PoseSink for PoseBackend {
    fn initialize(&mut self) -> Result<()> {
        match self {
            Self::Udp(s) => s.initialize(),
            Self::Disabled => Ok(()),
        }
    }

    fn send(&self, snapshot: &PoseSnapshot) -> Result<()> {
        match self {
            Self::Udp(s) => s.send(snapshot),
            Self::Disabled => Ok(()),
        }
    }
}

pub fn create_sink(config: &OutputConfig) -> PoseBackend {
    if config.enabled {
        PoseBackend::Udp(UdpPoseSink::new(config.target_address()))
    } else {
        PoseBackend::Disabled
    }
}
