pub use api::{
    BlendshapeScore, FaceResult, FrameInput, HandResult, Landmark, LandmarkSpace, PoseResult, Side,
};

mod config;
pub mod coords;
mod euro_filter;
pub mod expression;
pub mod math;
mod retargeter;
mod rig;
pub mod skeleton;
pub mod smoothing;
pub mod solver;

pub use config::{LandmarkFilterConfig, MatrixLayout, RetargetConfig};
pub use coords::CoordinateAdapter;
pub use euro_filter::{EuroFilter, PointFilter};
pub use expression::MorphMesh;
pub use retargeter::{FrameReport, FrameState, Retargeter, SkippedBone};
pub use rig::{BoneDescription, MeshDescription, RigDescription};
pub use skeleton::{BoneId, Skeleton, SkeletonError};
pub use solver::SkipReason;
