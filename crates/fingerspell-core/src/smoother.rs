//! Majority-vote smoothing over the raw per-frame predictions.
//!
//! Single-frame classifier output flickers, especially mid-transition
//! between letters. The smoother keeps the last few predictions and only
//! reports a label once it dominates the window with enough average
//! confidence. Losing the hand clears the window outright, so stale votes
//! never leak across a gap.

use fnv::FnvHashMap;
use std::collections::VecDeque;

use crate::consts::SMOOTHING_WINDOW;
use crate::rules::is_control_label;
use fingerspell_protocol::config::Calibration;
use fingerspell_protocol::messages::Prediction;

/// A smoothed, gate-passing label. Unlike [`Prediction`], the label is
/// always present.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub label: String,
    pub confidence: f32,
}

#[derive(Debug, Clone)]
pub struct PredictionSmoother {
    window: VecDeque<(String, f32)>,
    capacity: usize,
    letter_gate: f32,
    control_gate: f32,
}

impl PredictionSmoother {
    pub fn new(calibration: &Calibration) -> Self {
        Self::with_capacity(SMOOTHING_WINDOW, calibration)
    }

    pub fn with_capacity(capacity: usize, calibration: &Calibration) -> Self {
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
            letter_gate: calibration.letter_gate,
            control_gate: calibration.control_gate,
        }
    }

    /// Feed one raw prediction; returns the current smoothed decision, if
    /// any. An empty prediction (no hand, nothing recognized) clears the
    /// window and never yields a decision.
    pub fn push(&mut self, prediction: &Prediction) -> Option<Decision> {
        let label = match &prediction.label {
            Some(label) => label,
            None => {
                self.window.clear();
                return None;
            }
        };
        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window
            .push_back((label.clone(), prediction.confidence));
        self.majority()
    }

    pub fn clear(&mut self) {
        self.window.clear();
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// The label holding at least half the window's capacity in votes,
    /// with its mean confidence over those votes, gated per label kind.
    fn majority(&self) -> Option<Decision> {
        let mut tally: FnvHashMap<&str, (usize, f32)> = FnvHashMap::default();
        for (label, confidence) in &self.window {
            let entry = tally.entry(label.as_str()).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += confidence;
        }

        let (label, (count, sum)) =
            tally
                .into_iter()
                .max_by(|(_, (count_a, sum_a)), (_, (count_b, sum_b))| {
                    count_a.cmp(count_b).then(
                        sum_a
                            .partial_cmp(sum_b)
                            .unwrap_or(std::cmp::Ordering::Equal),
                    )
                })?;

        if count < self.capacity / 2 {
            return None;
        }

        let confidence = sum / count as f32;
        let gate = if is_control_label(label) {
            self.control_gate
        } else {
            self.letter_gate
        };
        if confidence < gate {
            return None;
        }

        Some(Decision {
            label: label.to_string(),
            confidence,
        })
    }
}
