//! Hand landmark data model shared by the capture side and the recognizer.
//!
//! The upstream pose estimator reports 21 keypoints per hand in a
//! normalized [0,1]-ish image space. Index meaning is anatomical and fixed;
//! everything downstream addresses joints through the constants below.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Number of keypoints the estimator reports per hand.
pub const HAND_LANDMARK_COUNT: usize = 21;

// Anatomical indices (MediaPipe hand topology).
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

/// Joint indices per finger as [MCP, PIP, DIP, TIP], thumb excluded
/// (its joint chain is CMC/MCP/IP/TIP and is handled separately).
pub const FINGER_JOINTS: [[usize; 4]; 4] = [
    [INDEX_MCP, INDEX_PIP, INDEX_DIP, INDEX_TIP],
    [MIDDLE_MCP, MIDDLE_PIP, MIDDLE_DIP, MIDDLE_TIP],
    [RING_MCP, RING_PIP, RING_DIP, RING_TIP],
    [PINKY_MCP, PINKY_PIP, PINKY_DIP, PINKY_TIP],
];

/// One 3-D keypoint. Serialized on the wire as a compact `[x, y, z]` triple.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// All three coordinates finite (no NaN/inf leaked in from upstream).
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// 3-D Euclidean distance.
    pub fn distance_to(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

impl From<[f32; 3]> for Landmark {
    fn from(v: [f32; 3]) -> Self {
        Self { x: v[0], y: v[1], z: v[2] }
    }
}

impl From<Landmark> for [f32; 3] {
    fn from(l: Landmark) -> Self {
        [l.x, l.y, l.z]
    }
}

/// Which hand the estimator believes it is looking at. The recognizer's
/// canonical training orientation is the right hand; left-hand frames get
/// mirrored during normalization.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Handedness {
    Left,
    Right,
}

/// A validated set of exactly 21 finite landmarks.
///
/// Construction is only possible through [`LandmarkFrame::try_from_points`],
/// so holders never need to re-check length or finiteness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandmarkFrame {
    points: [Landmark; HAND_LANDMARK_COUNT],
}

impl LandmarkFrame {
    /// Validate a raw point list into a frame. Rejects (by value, never a
    /// panic) any list that is not exactly 21 points or contains a
    /// non-finite coordinate.
    pub fn try_from_points(points: &[Landmark]) -> Result<Self, String> {
        if points.len() != HAND_LANDMARK_COUNT {
            return Err(format!(
                "expected {} landmarks, got {}",
                HAND_LANDMARK_COUNT,
                points.len()
            ));
        }
        for (i, p) in points.iter().enumerate() {
            if !p.is_finite() {
                return Err(format!("non-finite coordinate at landmark {}", i));
            }
        }
        let mut arr = [Landmark::default(); HAND_LANDMARK_COUNT];
        arr.copy_from_slice(points);
        Ok(Self { points: arr })
    }

    pub fn point(&self, index: usize) -> Landmark {
        self.points[index]
    }

    pub fn points(&self) -> &[Landmark; HAND_LANDMARK_COUNT] {
        &self.points
    }

    pub fn wrist(&self) -> Landmark {
        self.points[WRIST]
    }
}

/// Outcome of validating one capture tick.
///
/// `NoHand` is a *valid* observation (the estimator saw nothing) and must
/// stay distinct from a rejected payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidatedFrame {
    NoHand,
    Hand {
        frame: LandmarkFrame,
        handedness: Option<Handedness>,
    },
}

/// Validate a whole frame payload: every listed hand must be well-formed.
/// Zero hands validates to [`ValidatedFrame::NoHand`]. Multi-hand payloads
/// are checked in full but only the first hand is carried forward
/// (multi-hand recognition is out of scope).
pub fn validate_frame(
    hands: &[Vec<Landmark>],
    handedness: Option<Handedness>,
) -> Result<ValidatedFrame, String> {
    if hands.is_empty() {
        return Ok(ValidatedFrame::NoHand);
    }
    for (i, hand) in hands.iter().enumerate().skip(1) {
        LandmarkFrame::try_from_points(hand)
            .map_err(|e| format!("hand {}: {}", i, e))?;
    }
    let frame = LandmarkFrame::try_from_points(&hands[0])
        .map_err(|e| format!("hand 0: {}", e))?;
    Ok(ValidatedFrame::Hand { frame, handedness })
}
