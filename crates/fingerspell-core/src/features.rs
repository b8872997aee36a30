//! Frame normalization: raw estimator coordinates -> pose-only features.
//!
//! Training data and live frames arrive in image space, so absolute hand
//! position and apparent size vary frame to frame. Normalization removes
//! both, leaving only hand pose: wrist at the origin, distances measured
//! in units of the wrist-to-middle-knuckle span.

use crate::consts::FEATURE_SIZE;
use fingerspell_protocol::landmarks::{
    Handedness, Landmark, LandmarkFrame, HAND_LANDMARK_COUNT, MIDDLE_MCP, WRIST,
};

/// Flattened model input: 21 landmarks x (x, y, z), landmark order.
pub type FeatureVector = [f32; FEATURE_SIZE];

/// A landmark frame in canonical pose space.
///
/// Wrist sits at the origin and the wrist-to-middle-MCP span is 1. When
/// built with `mirror`, x is negated so left hands match the right-hand
/// orientation the classifiers were built for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedFrame {
    points: [Landmark; HAND_LANDMARK_COUNT],
}

impl NormalizedFrame {
    pub fn from_frame(frame: &LandmarkFrame, mirror: bool) -> Self {
        let wrist = frame.wrist();
        let span = wrist.distance_to(&frame.point(MIDDLE_MCP));
        // A degenerate frame (all points coincident) would divide by zero;
        // unit scale keeps the output finite and lets confidence gating
        // reject it downstream.
        let scale = if span > 0.0 { span } else { 1.0 };

        let sign = if mirror { -1.0 } else { 1.0 };
        let mut points = [Landmark::default(); HAND_LANDMARK_COUNT];
        for (i, p) in frame.points().iter().enumerate() {
            points[i] = Landmark::new(
                sign * (p.x - wrist.x) / scale,
                (p.y - wrist.y) / scale,
                (p.z - wrist.z) / scale,
            );
        }
        Self { points }
    }

    pub fn point(&self, index: usize) -> Landmark {
        self.points[index]
    }

    pub fn points(&self) -> &[Landmark; HAND_LANDMARK_COUNT] {
        &self.points
    }

    /// Flatten to the 63-float layout the model was trained on.
    pub fn features(&self) -> FeatureVector {
        let mut out = [0.0; FEATURE_SIZE];
        for (i, p) in self.points.iter().enumerate() {
            out[i * 3] = p.x;
            out[i * 3 + 1] = p.y;
            out[i * 3 + 2] = p.z;
        }
        out
    }
}

/// Left hands get mirrored into the canonical right-hand orientation.
/// Unknown handedness is treated as already canonical.
pub fn mirror_for(handedness: Option<Handedness>) -> bool {
    handedness == Some(Handedness::Left)
}
