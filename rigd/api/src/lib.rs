mod logger;
pub mod landmarks;

pub use logger::SourceLogger;

use anyhow::Result;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A single estimated joint or feature position.
///
/// The coordinate convention depends on the producing stream, see
/// [`LandmarkSpace`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f32>,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            x,
            y,
            z,
            visibility: None,
        }
    }

    pub fn with_visibility(mut self, visibility: f32) -> Self {
        self.visibility = Some(visibility);
        self
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    pub fn is_finite(&self) -> bool {
        self.position().is_finite()
    }
}

/// Coordinate space a landmark sequence was reported in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum LandmarkSpace {
    /// Metric space centered on the body or hand, Y pointing down.
    #[default]
    #[serde(alias = "world", alias = "Metric")]
    World,
    /// Image-normalized space, x and y in [0, 1], Y pointing down.
    #[serde(alias = "normalized", alias = "Image")]
    Normalized,
}

/// Body side, used both for handedness labels and for rig bone names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Left" | "left" | "L" => Some(Side::Left),
            "Right" | "right" | "R" => Some(Side::Right),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "Left",
            Side::Right => "Right",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlendshapeScore {
    pub name: String,
    pub score: f32,
}

/// Output of the face estimator for one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaceResult {
    /// 4x4 head transform, 16 values.
    #[serde(default)]
    pub transform: Option<[f32; 16]>,
    #[serde(default)]
    pub blendshapes: Vec<BlendshapeScore>,
}

impl FaceResult {
    pub fn is_empty(&self) -> bool {
        self.transform.is_none() && self.blendshapes.is_empty()
    }
}

/// Output of the body-pose estimator for one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseResult {
    #[serde(default)]
    pub space: LandmarkSpace,
    pub landmarks: Vec<Landmark>,
}

/// One detected hand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HandResult {
    /// Handedness label as reported by the estimator ("Left" / "Right").
    pub handedness: String,
    #[serde(default)]
    pub space: LandmarkSpace,
    pub landmarks: Vec<Landmark>,
}

impl HandResult {
    pub fn side(&self) -> Option<Side> {
        Side::from_label(&self.handedness)
    }
}

/// Everything the estimators reported for one inference cycle.
///
/// Replaced wholesale every frame; nothing is merged across frames.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameInput {
    /// Source clock in milliseconds. Must advance for a frame to be resolved.
    pub timestamp_ms: f64,
    #[serde(default)]
    pub face: Option<FaceResult>,
    #[serde(default)]
    pub pose: Option<PoseResult>,
    #[serde(default)]
    pub hands: Vec<HandResult>,
}

impl FrameInput {
    pub fn is_empty(&self) -> bool {
        self.face.as_ref().map_or(true, FaceResult::is_empty)
            && self.pose.as_ref().map_or(true, |p| p.landmarks.is_empty())
            && self.hands.iter().all(|h| h.landmarks.is_empty())
    }
}

/// A producer of landmark frames (camera + inference, a network feed, a
/// recording, ...).
pub trait LandmarkSource: Send {
    fn initialize(&mut self, logger: SourceLogger) -> Result<()>;
    /// Write the newest available frame into `frame`. Leaving it untouched is
    /// fine when nothing new arrived.
    fn update(&mut self, frame: &mut FrameInput) -> Result<()>;
    fn unload(&mut self);
    /// True once the source will never produce another frame. Live sources
    /// never finish.
    fn finished(&self) -> bool {
        false
    }
}
