//! The live recognition session: frames in, spelled words out.
//!
//! Glues the whole pipeline together — validation, normalization,
//! classification, smoothing, hold-to-confirm, and the word buffer —
//! behind a single `process_frame` call. Timestamps are caller-supplied
//! milliseconds, which keeps dwell timing deterministic under test and
//! replay.

use tracing::{debug, info};
use typed_builder::TypedBuilder;

use crate::classifier::ActiveClassifier;
use crate::consts::{DELETE_LABEL, SPACE_LABEL};
use crate::error::{FingerspellError, FspResult};
use crate::features::{mirror_for, NormalizedFrame};
use crate::model::Model;
use crate::smoother::{Decision, PredictionSmoother};
use crate::status::PipelineStatus;
use fingerspell_protocol::config::Calibration;
use fingerspell_protocol::landmarks::{self, Handedness, Landmark, ValidatedFrame};
use fingerspell_protocol::messages::Prediction;

/// A committed edit to the word buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum CommitEvent {
    Letter(String),
    Space,
    Delete,
}

/// Accumulated spelled text. Letters arrive as uppercase labels and are
/// cased by the caps toggle at append time; delete removes one character,
/// space or letter alike.
#[derive(Debug, Clone, Default)]
pub struct WordBuffer {
    text: String,
}

impl WordBuffer {
    pub fn apply(&mut self, event: &CommitEvent, caps: bool) {
        match event {
            CommitEvent::Letter(label) => {
                for c in label.chars() {
                    if caps {
                        self.text.extend(c.to_uppercase());
                    } else {
                        self.text.extend(c.to_lowercase());
                    }
                }
            }
            CommitEvent::Space => self.text.push(' '),
            CommitEvent::Delete => {
                self.text.pop();
            }
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn push_str(&mut self, s: &str) {
        self.text.push_str(s);
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Hold-to-confirm over smoothed decisions.
///
/// Letters and delete must be held steady for the dwell time before they
/// commit; space commits on its first decision. A committed label stays
/// latched until the decision stream moves off it, so holding a sign past
/// the dwell never types it twice. Double letters are signed by breaking
/// the hand away (clearing the stream) and signing again.
#[derive(Debug, Clone)]
pub struct HoldTracker {
    dwell_ms: u64,
    holding: Option<(String, u64)>,
    committed: Option<String>,
}

impl HoldTracker {
    pub fn new(dwell_ms: u64) -> Self {
        Self {
            dwell_ms,
            holding: None,
            committed: None,
        }
    }

    pub fn observe(&mut self, decision: Option<&Decision>, now_ms: u64) -> Option<CommitEvent> {
        let decision = match decision {
            Some(d) => d,
            None => {
                self.holding = None;
                self.committed = None;
                return None;
            }
        };

        if self.committed.as_deref() == Some(decision.label.as_str()) {
            return None;
        }
        if self.committed.is_some() {
            self.committed = None;
        }

        if decision.label == SPACE_LABEL {
            self.holding = None;
            self.committed = Some(decision.label.clone());
            return Some(CommitEvent::Space);
        }

        match &self.holding {
            Some((label, since_ms)) if label == &decision.label => {
                if now_ms.saturating_sub(*since_ms) >= self.dwell_ms {
                    self.holding = None;
                    self.committed = Some(decision.label.clone());
                    if decision.label == DELETE_LABEL {
                        return Some(CommitEvent::Delete);
                    }
                    return Some(CommitEvent::Letter(decision.label.clone()));
                }
                None
            }
            _ => {
                self.holding = Some((decision.label.clone(), now_ms));
                None
            }
        }
    }

    /// Fraction of the dwell already held, for progress display.
    pub fn progress(&self, now_ms: u64) -> f32 {
        match &self.holding {
            Some((_, since_ms)) if self.dwell_ms > 0 => {
                (now_ms.saturating_sub(*since_ms) as f32 / self.dwell_ms as f32).min(1.0)
            }
            _ => 0.0,
        }
    }

    pub fn holding_label(&self) -> Option<&str> {
        self.holding.as_ref().map(|(label, _)| label.as_str())
    }

    /// Back to idle: no held label, no latch.
    pub fn reset(&mut self) {
        self.holding = None;
        self.committed = None;
    }
}

/// Everything one processed frame produced.
#[derive(Debug, Clone)]
pub struct FrameOutcome {
    /// Raw classifier verdict for this frame.
    pub prediction: Prediction,
    /// Smoothed decision, if the window agrees.
    pub decision: Option<Decision>,
    /// Buffer edit committed this frame, if any.
    pub committed: Option<CommitEvent>,
}

#[derive(TypedBuilder)]
pub struct SessionBuildParams {
    #[builder(default)]
    pub calibration: Calibration,
    #[builder(default)]
    pub model: Option<Model>,
    /// Forces mirroring on or off; `None` follows reported handedness.
    #[builder(default)]
    pub mirror_override: Option<bool>,
    /// Start with uppercase output; flip later with [`RecognizerSession::set_caps`].
    #[builder(default)]
    pub caps: bool,
}

impl SessionBuildParams {
    pub fn build_session(self) -> FspResult<RecognizerSession> {
        self.calibration
            .validate()
            .map_err(FingerspellError::Config)?;

        let classifier = match self.model {
            Some(model) => {
                info!(
                    "Session using model {} ({} labels)",
                    model.short_fingerprint(),
                    model.labels.len()
                );
                ActiveClassifier::with_model(model, self.calibration.clone())
            }
            None => ActiveClassifier::fallback(self.calibration.clone()),
        };

        Ok(RecognizerSession {
            smoother: PredictionSmoother::new(&self.calibration),
            tracker: HoldTracker::new(self.calibration.dwell_ms),
            buffer: WordBuffer::default(),
            classifier,
            calibration: self.calibration,
            mirror_override: self.mirror_override,
            caps: self.caps,
            frames: 0,
            decisions: 0,
            commits: 0,
        })
    }
}

pub struct RecognizerSession {
    classifier: ActiveClassifier,
    smoother: PredictionSmoother,
    tracker: HoldTracker,
    buffer: WordBuffer,
    calibration: Calibration,
    mirror_override: Option<bool>,
    caps: bool,
    frames: u64,
    decisions: u64,
    commits: u64,
}

impl RecognizerSession {
    /// Run one capture tick through the whole pipeline.
    ///
    /// A frame with no hands is a valid observation: it clears the
    /// smoothing window and releases any held letter. Malformed hands
    /// are a validation error.
    pub fn process_frame(
        &mut self,
        hands: &[Vec<Landmark>],
        handedness: Option<Handedness>,
        timestamp_ms: u64,
    ) -> FspResult<FrameOutcome> {
        let validated = landmarks::validate_frame(hands, handedness)
            .map_err(FingerspellError::Validation)?;

        let prediction = match &validated {
            ValidatedFrame::NoHand => Prediction::empty(),
            ValidatedFrame::Hand { frame, handedness } => {
                let mirror = self
                    .mirror_override
                    .unwrap_or_else(|| mirror_for(*handedness));
                let normalized = NormalizedFrame::from_frame(frame, mirror);
                self.classifier.classify(&normalized)
            }
        };

        self.frames += 1;
        Ok(self.advance(prediction, timestamp_ms))
    }

    /// Feed a prediction that arrived over the channel instead of from
    /// the local classifier. Joins the pipeline at the smoother, so
    /// gating, dwell timing, and the word buffer behave exactly as they
    /// do for locally classified frames.
    pub fn process_prediction(&mut self, prediction: &Prediction, timestamp_ms: u64) -> FrameOutcome {
        self.advance(prediction.clone(), timestamp_ms)
    }

    fn advance(&mut self, prediction: Prediction, timestamp_ms: u64) -> FrameOutcome {
        let decision = self.smoother.push(&prediction);
        let committed = self.tracker.observe(decision.as_ref(), timestamp_ms);

        if decision.is_some() {
            self.decisions += 1;
        }
        if let Some(event) = &committed {
            self.commits += 1;
            self.buffer.apply(event, self.caps);
            debug!("Committed {:?}, buffer now {:?}", event, self.buffer.text());
        }

        FrameOutcome {
            prediction,
            decision,
            committed,
        }
    }

    /// Swap in a freshly loaded model mid-session. The smoothing window is
    /// cleared so votes cast by the old classifier never mix into the new
    /// one's decisions.
    pub fn install_model(&mut self, model: Model) {
        info!(
            "Switching to model {} mid-session",
            model.short_fingerprint()
        );
        self.classifier = ActiveClassifier::with_model(model, self.calibration.clone());
        self.smoother.clear();
    }

    /// Tear the session back to idle: smoothing window emptied, no held
    /// letter. The word buffer keeps its text.
    pub fn reset(&mut self) {
        self.smoother.clear();
        self.tracker.reset();
    }

    pub fn buffer(&self) -> &WordBuffer {
        &self.buffer
    }

    pub fn clear_buffer(&mut self) {
        self.buffer.clear();
    }

    /// Host-driven insertion (e.g. a UI paste); not part of recognition.
    pub fn append_text(&mut self, s: &str) {
        self.buffer.push_str(s);
    }

    pub fn set_caps(&mut self, caps: bool) {
        self.caps = caps;
    }

    pub fn caps(&self) -> bool {
        self.caps
    }

    /// Point-in-time snapshot for logs and status lines. Channel counters
    /// are zero here; the run loop overlays its receiver's stats.
    pub fn status(&self, now_ms: u64) -> PipelineStatus {
        PipelineStatus {
            frames: self.frames,
            decisions: self.decisions,
            commits: self.commits,
            buffer: self.buffer.text().to_string(),
            holding: self.tracker.holding_label().map(str::to_string),
            hold_progress: self.tracker.progress(now_ms),
            channel: Default::default(),
            mode: match self.classifier.model_fingerprint() {
                Some(fp) => format!("model {}", fp),
                None => "rules".to_string(),
            },
        }
    }

    pub fn hold_progress(&self, now_ms: u64) -> f32 {
        self.tracker.progress(now_ms)
    }

    pub fn holding_label(&self) -> Option<&str> {
        self.tracker.holding_label()
    }

    pub fn model_fingerprint(&self) -> Option<&str> {
        self.classifier.model_fingerprint()
    }

    pub fn is_fallback(&self) -> bool {
        self.classifier.is_fallback()
    }
}
