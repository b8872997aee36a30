//! Classifier selection: network when a model is loaded, rules otherwise.
//!
//! Control gestures are special-cased: they always come from the rule
//! table, even with a model active, because the trainer never sees
//! SPACE/DELETE samples and the network cannot emit them.

use tracing::info;

use crate::features::NormalizedFrame;
use crate::model::Model;
use crate::rules::RuleClassifier;
use fingerspell_protocol::config::Calibration;
use fingerspell_protocol::messages::Prediction;

pub enum ActiveClassifier {
    /// Trained network for letters, rules for controls.
    Network { model: Model, rules: RuleClassifier },
    /// Rule table for everything; used when no model file is given.
    Fallback { rules: RuleClassifier },
}

impl ActiveClassifier {
    pub fn with_model(model: Model, calibration: Calibration) -> Self {
        Self::Network {
            model,
            rules: RuleClassifier::new(calibration),
        }
    }

    pub fn fallback(calibration: Calibration) -> Self {
        info!("📐 No model loaded, running on the geometric rule table");
        Self::Fallback {
            rules: RuleClassifier::new(calibration),
        }
    }

    pub fn classify(&self, frame: &NormalizedFrame) -> Prediction {
        match self {
            Self::Network { model, rules } => {
                if let Some(hit) = rules.detect_control(frame) {
                    return hit.to_prediction();
                }
                model.infer(&frame.features())
            }
            Self::Fallback { rules } => rules
                .classify(frame)
                .map(|hit| hit.to_prediction())
                .unwrap_or_else(Prediction::empty),
        }
    }

    pub fn model_fingerprint(&self) -> Option<&str> {
        match self {
            Self::Network { model, .. } => Some(model.short_fingerprint()),
            Self::Fallback { .. } => None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}
