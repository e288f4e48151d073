//! Index layouts of the landmark sequences produced by the estimators.

use crate::Side;

/// Body-pose landmark indices (33-point topology; only the upper body is used).
pub mod pose {
    use super::Side;

    pub const LEFT_SHOULDER: usize = 11;
    pub const RIGHT_SHOULDER: usize = 12;
    pub const LEFT_ELBOW: usize = 13;
    pub const RIGHT_ELBOW: usize = 14;
    pub const LEFT_WRIST: usize = 15;
    pub const RIGHT_WRIST: usize = 16;

    /// Minimum number of landmarks a pose needs to drive both arms.
    pub const MIN_LANDMARKS: usize = 17;

    pub fn shoulder(side: Side) -> usize {
        match side {
            Side::Left => LEFT_SHOULDER,
            Side::Right => RIGHT_SHOULDER,
        }
    }

    pub fn elbow(side: Side) -> usize {
        match side {
            Side::Left => LEFT_ELBOW,
            Side::Right => RIGHT_ELBOW,
        }
    }

    pub fn wrist(side: Side) -> usize {
        match side {
            Side::Left => LEFT_WRIST,
            Side::Right => RIGHT_WRIST,
        }
    }
}

/// Hand landmark indices (21-point topology).
pub mod hand {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_MCP: usize = 5;
    pub const INDEX_PIP: usize = 6;
    pub const INDEX_DIP: usize = 7;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_MCP: usize = 9;
    pub const MIDDLE_PIP: usize = 10;
    pub const MIDDLE_DIP: usize = 11;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_MCP: usize = 13;
    pub const RING_PIP: usize = 14;
    pub const RING_DIP: usize = 15;
    pub const RING_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;

    pub const COUNT: usize = 21;

    /// Finger name as used in rig bone names, with its four landmarks from
    /// base to tip. Three segments per finger.
    pub const FINGERS: [(&str, [usize; 4]); 5] = [
        ("Thumb", [THUMB_CMC, THUMB_MCP, THUMB_IP, THUMB_TIP]),
        ("Index", [INDEX_MCP, INDEX_PIP, INDEX_DIP, INDEX_TIP]),
        ("Middle", [MIDDLE_MCP, MIDDLE_PIP, MIDDLE_DIP, MIDDLE_TIP]),
        ("Ring", [RING_MCP, RING_PIP, RING_DIP, RING_TIP]),
        ("Pinky", [PINKY_MCP, PINKY_PIP, PINKY_DIP, PINKY_TIP]),
    ];
}
