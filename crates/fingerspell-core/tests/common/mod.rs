#![allow(dead_code)]

use fingerspell_core::features::NormalizedFrame;
use fingerspell_core::model::payload::{LayerPayload, ModelPayload};
use fingerspell_core::model::Model;
use fingerspell_protocol::landmarks::{Landmark, LandmarkFrame, FINGER_JOINTS, HAND_LANDMARK_COUNT};

/// Synthetic upright right hand in image space.
///
/// Wrist at (0.5, 0.9), knuckle row at y = 0.7, finger columns 0.04
/// apart starting at x = 0.44 (index). The wrist-to-middle-knuckle span
/// is ~0.2, so one normalized hand unit is ~0.2 in these coordinates.
#[derive(Clone, Copy)]
pub struct Pose {
    pts: [Landmark; HAND_LANDMARK_COUNT],
}

pub const INDEX: usize = 0;
pub const MIDDLE: usize = 1;
pub const RING: usize = 2;
pub const PINKY: usize = 3;

impl Pose {
    /// All four fingers extended, thumb resting across the palm.
    pub fn new() -> Self {
        let mut pts = [Landmark::default(); HAND_LANDMARK_COUNT];
        pts[0] = Landmark::new(0.5, 0.9, 0.0);
        pts[1] = Landmark::new(0.42, 0.82, 0.0);
        pts[2] = Landmark::new(0.43, 0.79, 0.0);
        pts[3] = Landmark::new(0.44, 0.76, 0.0);
        pts[4] = Landmark::new(0.47, 0.76, 0.0);
        let mut pose = Self { pts };
        for slot in 0..4 {
            pose = pose.extend(slot);
        }
        pose
    }

    fn col_x(slot: usize) -> f32 {
        0.44 + slot as f32 * 0.04
    }

    /// Finger pointing straight up: tip well above the PIP.
    pub fn extend(mut self, slot: usize) -> Self {
        let x = Self::col_x(slot);
        for (row, idx) in FINGER_JOINTS[slot].iter().enumerate() {
            self.pts[*idx] = Landmark::new(x, 0.7 - row as f32 * 0.08, 0.0);
        }
        self
    }

    /// Finger folded into the palm: tip well below the PIP.
    pub fn curl(mut self, slot: usize) -> Self {
        let x = Self::col_x(slot);
        self.pts[FINGER_JOINTS[slot][0]] = Landmark::new(x, 0.7, 0.0);
        self.pts[FINGER_JOINTS[slot][1]] = Landmark::new(x, 0.62, 0.0);
        self.pts[FINGER_JOINTS[slot][2]] = Landmark::new(x, 0.66, 0.01);
        self.pts[FINGER_JOINTS[slot][3]] = Landmark::new(x, 0.68, 0.02);
        self
    }

    /// Finger hooked: tip level with the PIP.
    pub fn bend(mut self, slot: usize) -> Self {
        let x = Self::col_x(slot);
        self.pts[FINGER_JOINTS[slot][0]] = Landmark::new(x, 0.7, 0.0);
        self.pts[FINGER_JOINTS[slot][1]] = Landmark::new(x, 0.62, 0.0);
        self.pts[FINGER_JOINTS[slot][2]] = Landmark::new(x + 0.01, 0.60, 0.01);
        self.pts[FINGER_JOINTS[slot][3]] = Landmark::new(x + 0.01, 0.62, 0.02);
        self
    }

    /// Place the thumb IP and tip explicitly.
    pub fn thumb(mut self, ip: (f32, f32), tip: (f32, f32)) -> Self {
        self.pts[3] = Landmark::new(ip.0, ip.1, 0.0);
        self.pts[4] = Landmark::new(tip.0, tip.1, 0.0);
        self
    }

    /// Thumb spread past the index edge of the palm.
    pub fn thumb_out(self) -> Self {
        self.thumb((0.40, 0.68), (0.38, 0.62))
    }

    /// Move one joint directly.
    pub fn joint(mut self, idx: usize, x: f32, y: f32) -> Self {
        self.pts[idx] = Landmark::new(x, y, 0.0);
        self
    }

    pub fn points(&self) -> Vec<Landmark> {
        self.pts.to_vec()
    }

    pub fn frame(&self) -> LandmarkFrame {
        LandmarkFrame::try_from_points(&self.pts).unwrap()
    }

    pub fn normalized(&self) -> NormalizedFrame {
        NormalizedFrame::from_frame(&self.frame(), false)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::new()
    }
}

/// Single linear layer over two labels, separable on feature 30 (the x
/// coordinate of landmark 10): positive reads "A", negative reads "B".
pub fn separable_model() -> Model {
    let mut weights = vec![vec![0.0f32; 2]; 63];
    weights[30] = vec![10.0, -10.0];
    let payload = ModelPayload {
        model_type: Some("mlp".into()),
        input_size: 63,
        labels: vec!["A".into(), "B".into()],
        layers: vec![LayerPayload {
            name: "dense_logits".into(),
            input_size: 63,
            output_size: 2,
            activation: "linear".into(),
            weights,
            biases: vec![0.0, 0.0],
        }],
    };
    Model::from_payload(payload, "test-model".into()).unwrap()
}

/// Feature vector the separable model classifies as the given label.
pub fn separable_features(label: &str) -> [f32; 63] {
    let mut features = [0.0f32; 63];
    features[30] = if label == "A" { 1.0 } else { -1.0 };
    features
}
