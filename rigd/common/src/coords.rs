//! Source-space to engine-space conversion.
//!
//! Engine space is right-handed with Y up and Z toward the viewer. Every
//! estimator reports Y down and Z away from the camera, so all streams get the
//! same Y and Z flips; only the origin differs between spaces.

use api::{Landmark, LandmarkSpace};
use glam::{Quat, Vec3};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoordinateAdapter {
    mirror: bool,
}

impl CoordinateAdapter {
    pub fn new(mirror: bool) -> Self {
        Self { mirror }
    }

    pub fn mirrored(&self) -> bool {
        self.mirror
    }

    pub fn to_engine_space(&self, landmark: &Landmark, space: LandmarkSpace) -> Vec3 {
        let p = landmark.position();
        let x = if self.mirror { -p.x } else { p.x };
        match space {
            LandmarkSpace::World => Vec3::new(x, -p.y, -p.z),
            LandmarkSpace::Normalized => Vec3::new(x, 1.0 - p.y, -p.z),
        }
    }

    /// Converts a landmark, treating non-finite or low-visibility points as
    /// missing.
    pub fn convert(
        &self,
        landmark: &Landmark,
        space: LandmarkSpace,
        min_visibility: f32,
    ) -> Option<Vec3> {
        if !landmark.is_finite() {
            return None;
        }
        if let Some(visibility) = landmark.visibility {
            if visibility < min_visibility {
                return None;
            }
        }
        Some(self.to_engine_space(landmark, space))
    }

    /// Applies the same mirroring to a rotation that `to_engine_space` applies
    /// to points.
    pub fn rotation_to_engine_space(&self, rotation: Quat) -> Quat {
        if self.mirror {
            Quat::from_xyzw(rotation.x, -rotation.y, -rotation.z, rotation.w)
        } else {
            rotation
        }
    }
}
