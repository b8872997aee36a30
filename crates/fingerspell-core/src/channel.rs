//! Receiving side of the prediction channel.
//!
//! Messages arrive as JSON lines from untrusted peers, so everything is
//! checked before use: parse, field validation, origin, and sequence
//! order. Anything that fails is dropped silently — a hostile or broken
//! sender must not be able to crash the pipeline or spoof predictions —
//! but every drop is counted and visible in the stats.

use tracing::debug;

use fingerspell_protocol::landmarks::{Handedness, Landmark};
use fingerspell_protocol::messages::{Envelope, Payload, Prediction};

/// Running totals for channel hygiene, surfaced in status reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelStats {
    pub accepted: u64,
    pub rejected_malformed: u64,
    pub rejected_origin: u64,
    pub rejected_stale: u64,
}

impl ChannelStats {
    pub fn rejected_total(&self) -> u64 {
        self.rejected_malformed + self.rejected_origin + self.rejected_stale
    }
}

/// A validated, accepted message.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    Frame {
        hands: Vec<Vec<Landmark>>,
        handedness: Option<Handedness>,
        timestamp_ms: u64,
    },
    Prediction {
        prediction: Prediction,
        timestamp_ms: u64,
    },
}

pub struct ChannelReceiver {
    expected_origin: String,
    last_seq: Option<u64>,
    prediction_seen: bool,
    stats: ChannelStats,
}

impl ChannelReceiver {
    pub fn new(expected_origin: impl Into<String>) -> Self {
        Self {
            expected_origin: expected_origin.into(),
            last_seq: None,
            prediction_seen: false,
            stats: ChannelStats::default(),
        }
    }

    /// Validate one raw message. Returns the decoded event if it passes,
    /// `None` if it was dropped for any reason.
    pub fn accept(&mut self, raw: &str) -> Option<ChannelEvent> {
        let envelope = match Envelope::from_json(raw) {
            Ok(envelope) => envelope,
            Err(reason) => {
                self.stats.rejected_malformed += 1;
                debug!("channel drop (malformed): {}", reason);
                return None;
            }
        };

        if envelope.origin != self.expected_origin {
            self.stats.rejected_origin += 1;
            debug!("channel drop (origin): got '{}'", envelope.origin);
            return None;
        }

        // Sequence numbers only ever move forward. Unsequenced senders
        // leave seq at 0, which never regresses.
        if let Some(last) = self.last_seq {
            if envelope.seq < last {
                self.stats.rejected_stale += 1;
                debug!("channel drop (stale): seq {} after {}", envelope.seq, last);
                return None;
            }
        }
        self.last_seq = Some(envelope.seq);
        self.stats.accepted += 1;

        Some(match envelope.payload {
            Payload::LandmarkFrame {
                hands,
                handedness,
                timestamp_ms,
            } => ChannelEvent::Frame {
                hands,
                handedness,
                timestamp_ms,
            },
            Payload::Prediction {
                label,
                confidence,
                timestamp_ms,
            } => {
                self.prediction_seen = true;
                ChannelEvent::Prediction {
                    prediction: Prediction { label, confidence },
                    timestamp_ms,
                }
            }
        })
    }

    /// True once at least one valid prediction message has arrived.
    /// Display layers use this to retire their local fallback for good:
    /// the flag latches and never resets for the life of the receiver.
    pub fn live(&self) -> bool {
        self.prediction_seen
    }

    pub fn stats(&self) -> ChannelStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fingerspell_protocol::messages::{Envelope, CAPTURE_ORIGIN, RECOGNIZER_ORIGIN};

    fn prediction_json(origin: &str, seq: u64, label: &str) -> String {
        Envelope::new(
            origin,
            seq,
            Payload::Prediction {
                label: Some(label.into()),
                confidence: 0.9,
                timestamp_ms: 1,
            },
        )
        .to_json()
        .unwrap()
    }

    #[test]
    fn wrong_origin_is_dropped_and_counted() {
        let mut receiver = ChannelReceiver::new(RECOGNIZER_ORIGIN);
        assert!(receiver.accept(&prediction_json(CAPTURE_ORIGIN, 1, "A")).is_none());
        assert_eq!(receiver.stats().rejected_origin, 1);
        assert_eq!(receiver.stats().accepted, 0);
        assert!(!receiver.live());
    }

    #[test]
    fn garbage_is_dropped_without_panicking() {
        let mut receiver = ChannelReceiver::new(RECOGNIZER_ORIGIN);
        for raw in ["", "{", "null", "42", r#"{"origin":"x"}"#] {
            assert!(receiver.accept(raw).is_none());
        }
        assert_eq!(receiver.stats().rejected_malformed, 5);
    }

    #[test]
    fn regressing_sequence_is_stale() {
        let mut receiver = ChannelReceiver::new(RECOGNIZER_ORIGIN);
        assert!(receiver.accept(&prediction_json(RECOGNIZER_ORIGIN, 5, "A")).is_some());
        assert!(receiver.accept(&prediction_json(RECOGNIZER_ORIGIN, 4, "B")).is_none());
        assert!(receiver.accept(&prediction_json(RECOGNIZER_ORIGIN, 5, "C")).is_some());
        assert_eq!(receiver.stats().rejected_stale, 1);
        assert_eq!(receiver.stats().accepted, 2);
    }

    #[test]
    fn live_latches_on_first_prediction() {
        let mut receiver = ChannelReceiver::new(RECOGNIZER_ORIGIN);
        assert!(!receiver.live());
        receiver.accept(&prediction_json(RECOGNIZER_ORIGIN, 1, "A"));
        assert!(receiver.live());
        // A later drop does not reset it.
        receiver.accept("not json");
        assert!(receiver.live());
    }
}
