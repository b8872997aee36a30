pub mod fingers;
pub mod table;

pub use self::fingers::{FingerState, HandShape, ThumbPose};
pub use self::table::RuleHit;

use strum_macros::{Display, EnumString};

use crate::consts::{DELETE_LABEL, SPACE_LABEL};
use crate::features::NormalizedFrame;
use fingerspell_protocol::config::Calibration;
use fingerspell_protocol::messages::Prediction;

/// Word-level gestures, recognized geometrically in every mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum ControlGesture {
    Space,
    Delete,
}

impl ControlGesture {
    pub fn from_label(label: &str) -> Option<Self> {
        label.parse().ok()
    }
}

/// True for labels that drive the word buffer instead of spelling into it.
pub fn is_control_label(label: &str) -> bool {
    label == SPACE_LABEL || label == DELETE_LABEL
}

/// Geometric classifier over normalized frames.
///
/// Serves two roles: the only source of control gestures, and the letter
/// fallback when no network model is loaded.
#[derive(Debug, Clone)]
pub struct RuleClassifier {
    calibration: Calibration,
}

impl RuleClassifier {
    pub fn new(calibration: Calibration) -> Self {
        Self { calibration }
    }

    pub fn classify(&self, frame: &NormalizedFrame) -> Option<RuleHit> {
        let shape = HandShape::of(frame, &self.calibration);
        table::evaluate(frame, &shape, &self.calibration)
    }

    /// Control gestures only; letter hits are ignored.
    pub fn detect_control(&self, frame: &NormalizedFrame) -> Option<RuleHit> {
        self.classify(frame).filter(|hit| hit.control)
    }
}

impl RuleHit {
    /// Rules fire deterministically, so their predictions are reported at
    /// full confidence.
    pub fn to_prediction(self) -> Prediction {
        Prediction::new(self.label, 1.0)
    }
}
