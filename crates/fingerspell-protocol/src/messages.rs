//! Wire messages for the capture -> recognizer -> display channel.
//!
//! Every message is a JSON envelope carrying an origin tag plus one
//! internally-tagged payload. Receivers authenticate the origin before
//! touching the payload and drop anything that fails to parse.

use serde::{Deserialize, Serialize};

use crate::landmarks::{Handedness, Landmark};

/// Origin tag stamped on frames produced by the capture process.
pub const CAPTURE_ORIGIN: &str = "fingerspell-capture";

/// Origin tag stamped on predictions produced by the recognizer.
pub const RECOGNIZER_ORIGIN: &str = "fingerspell-recognizer";

/// A classifier verdict for one frame. `label: None` means "no confident
/// letter here" and is meaningful to the smoother, so it is not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: Option<String>,
    pub confidence: f32,
}

impl Prediction {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: Some(label.into()),
            confidence,
        }
    }

    /// The "nothing recognizable" verdict.
    pub fn empty() -> Self {
        Self {
            label: None,
            confidence: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.label.is_none()
    }
}

/// Message body, tagged by `kind` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Payload {
    /// One capture tick: zero or more candidate hands.
    LandmarkFrame {
        hands: Vec<Vec<Landmark>>,
        #[serde(default)]
        handedness: Option<Handedness>,
        timestamp_ms: u64,
    },
    /// One recognizer verdict, for display layers.
    Prediction {
        label: Option<String>,
        confidence: f32,
        timestamp_ms: u64,
    },
}

impl Payload {
    /// Field-level sanity beyond what serde enforces structurally.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Payload::LandmarkFrame { .. } => Ok(()),
            Payload::Prediction { confidence, .. } => {
                if !confidence.is_finite() {
                    return Err("prediction confidence is not finite".into());
                }
                if !(0.0..=1.0).contains(confidence) {
                    return Err(format!(
                        "prediction confidence {} outside [0, 1]",
                        confidence
                    ));
                }
                Ok(())
            }
        }
    }
}

/// Outer message shape shared by both directions of the channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub origin: String,
    #[serde(default)]
    pub seq: u64,
    #[serde(flatten)]
    pub payload: Payload,
}

impl Envelope {
    pub fn new(origin: impl Into<String>, seq: u64, payload: Payload) -> Self {
        Self {
            origin: origin.into(),
            seq,
            payload,
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, String> {
        let envelope: Envelope =
            serde_json::from_str(raw).map_err(|e| format!("malformed envelope: {}", e))?;
        envelope.payload.validate()?;
        Ok(envelope)
    }

    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string(self).map_err(|e| format!("envelope encode: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_round_trips_landmark_frame() {
        let envelope = Envelope::new(
            CAPTURE_ORIGIN,
            7,
            Payload::LandmarkFrame {
                hands: vec![vec![Landmark::new(0.1, 0.2, 0.3)]],
                handedness: Some(Handedness::Left),
                timestamp_ms: 1234,
            },
        );
        let json = envelope.to_json().unwrap();
        let back = Envelope::from_json(&json).unwrap();
        assert_eq!(back, envelope);
    }

    #[test]
    fn landmarks_serialize_as_triples() {
        let json = serde_json::to_string(&Landmark::new(1.0, 2.0, 3.0)).unwrap();
        assert_eq!(json, "[1.0,2.0,3.0]");
    }

    #[test]
    fn envelope_kind_tag_is_snake_case() {
        let envelope = Envelope::new(
            RECOGNIZER_ORIGIN,
            0,
            Payload::Prediction {
                label: Some("A".into()),
                confidence: 0.93,
                timestamp_ms: 5,
            },
        );
        let json = envelope.to_json().unwrap();
        assert!(json.contains("\"kind\":\"prediction\""));
    }

    #[test]
    fn missing_kind_is_rejected() {
        let raw = r#"{"origin":"fingerspell-capture","timestamp_ms":1}"#;
        assert!(Envelope::from_json(raw).is_err());
    }

    #[test]
    fn out_of_range_confidence_is_rejected() {
        let raw = r#"{"origin":"x","kind":"prediction","label":"A","confidence":1.5,"timestamp_ms":1}"#;
        assert!(Envelope::from_json(raw).is_err());
    }

    #[test]
    fn seq_defaults_to_zero() {
        let raw = r#"{"origin":"x","kind":"prediction","label":null,"confidence":0.0,"timestamp_ms":1}"#;
        let envelope = Envelope::from_json(raw).unwrap();
        assert_eq!(envelope.seq, 0);
    }
}
