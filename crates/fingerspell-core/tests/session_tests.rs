use fingerspell_core::session::{CommitEvent, HoldTracker, SessionBuildParams, WordBuffer};
use fingerspell_core::smoother::Decision;
use fingerspell_protocol::config::Calibration;
use fingerspell_protocol::messages::Prediction;

mod common;
use common::Pose;

fn decision(label: &str) -> Option<Decision> {
    Some(Decision {
        label: label.into(),
        confidence: 0.9,
    })
}

fn observe(tracker: &mut HoldTracker, label: &str, at_ms: u64) -> Option<CommitEvent> {
    tracker.observe(decision(label).as_ref(), at_ms)
}

#[test]
fn letter_commits_only_after_the_dwell() {
    let mut tracker = HoldTracker::new(1200);
    assert!(observe(&mut tracker, "A", 0).is_none());
    assert!(observe(&mut tracker, "A", 600).is_none());
    assert!(observe(&mut tracker, "A", 1199).is_none());
    assert_eq!(
        observe(&mut tracker, "A", 1201),
        Some(CommitEvent::Letter("A".into()))
    );
}

#[test]
fn switching_letters_restarts_the_clock() {
    let mut tracker = HoldTracker::new(1200);
    observe(&mut tracker, "A", 0);
    observe(&mut tracker, "A", 1199);
    // B at 1300 starts fresh; A never fires.
    assert!(observe(&mut tracker, "B", 1300).is_none());
    assert!(observe(&mut tracker, "B", 2400).is_none());
    assert_eq!(
        observe(&mut tracker, "B", 2501),
        Some(CommitEvent::Letter("B".into()))
    );
}

#[test]
fn a_committed_letter_does_not_auto_repeat() {
    let mut tracker = HoldTracker::new(1200);
    observe(&mut tracker, "A", 0);
    assert!(observe(&mut tracker, "A", 1200).is_some());
    // Keep holding well past another dwell.
    assert!(observe(&mut tracker, "A", 2000).is_none());
    assert!(observe(&mut tracker, "A", 5000).is_none());
}

#[test]
fn releasing_rearms_the_same_letter() {
    let mut tracker = HoldTracker::new(1200);
    observe(&mut tracker, "A", 0);
    assert!(observe(&mut tracker, "A", 1200).is_some());
    // Hand drops away, then signs A again.
    assert!(tracker.observe(None, 1500).is_none());
    observe(&mut tracker, "A", 2000);
    assert!(observe(&mut tracker, "A", 3199).is_none());
    assert!(observe(&mut tracker, "A", 3200).is_some());
}

#[test]
fn space_fires_immediately_but_only_once() {
    let mut tracker = HoldTracker::new(1200);
    assert_eq!(observe(&mut tracker, "SPACE", 0), Some(CommitEvent::Space));
    assert!(observe(&mut tracker, "SPACE", 10).is_none());
    assert!(observe(&mut tracker, "SPACE", 5000).is_none());
    // Release and re-sign: fires again, still with no dwell.
    tracker.observe(None, 6000);
    assert_eq!(
        observe(&mut tracker, "SPACE", 6100),
        Some(CommitEvent::Space)
    );
}

#[test]
fn delete_requires_the_full_dwell() {
    let mut tracker = HoldTracker::new(1200);
    assert!(observe(&mut tracker, "DELETE", 0).is_none());
    assert!(observe(&mut tracker, "DELETE", 1199).is_none());
    assert_eq!(
        observe(&mut tracker, "DELETE", 1200),
        Some(CommitEvent::Delete)
    );
}

#[test]
fn moving_off_a_committed_letter_unlatches_it() {
    let mut tracker = HoldTracker::new(1200);
    observe(&mut tracker, "A", 0);
    assert!(observe(&mut tracker, "A", 1200).is_some());
    // A different decision clears the latch even without a gap.
    observe(&mut tracker, "B", 1300);
    observe(&mut tracker, "A", 1400);
    assert!(observe(&mut tracker, "A", 2599).is_none());
    assert!(observe(&mut tracker, "A", 2600).is_some());
}

#[test]
fn progress_tracks_the_dwell_fraction() {
    let mut tracker = HoldTracker::new(1000);
    observe(&mut tracker, "A", 0);
    assert!((tracker.progress(500) - 0.5).abs() < 1e-6);
    assert_eq!(tracker.progress(2000), 1.0);
    assert_eq!(tracker.holding_label(), Some("A"));
    tracker.reset();
    assert_eq!(tracker.progress(2000), 0.0);
    assert_eq!(tracker.holding_label(), None);
}

#[test]
fn word_buffer_cases_letters_by_the_caps_flag() {
    let mut buffer = WordBuffer::default();
    buffer.apply(&CommitEvent::Letter("A".into()), false);
    buffer.apply(&CommitEvent::Letter("B".into()), true);
    buffer.apply(&CommitEvent::Space, false);
    buffer.apply(&CommitEvent::Letter("C".into()), false);
    assert_eq!(buffer.text(), "aB c");
}

#[test]
fn delete_on_an_empty_buffer_is_a_no_op() {
    let mut buffer = WordBuffer::default();
    buffer.apply(&CommitEvent::Delete, false);
    assert_eq!(buffer.text(), "");
    assert!(buffer.is_empty());
}

#[test]
fn session_exposes_buffer_controls() {
    let mut session = SessionBuildParams::builder()
        .build()
        .build_session()
        .unwrap();
    assert!(session.is_fallback());
    assert_eq!(session.model_fingerprint(), None);

    session.append_text("hi");
    assert_eq!(session.buffer().text(), "hi");
    session.clear_buffer();
    assert!(session.buffer().is_empty());

    assert!(!session.caps());
    session.set_caps(true);
    assert!(session.caps());
}

/// A confidence dip that fails the gate reads as "no decision", which
/// returns the machine to idle; the dwell restarts from scratch once
/// confidence recovers, it does not resume.
#[test]
fn a_gate_failing_dip_restarts_the_dwell() {
    let mut session = SessionBuildParams::builder()
        .build()
        .build_session()
        .unwrap();

    // Confident A for 600 ms: decision forms, hold starts.
    for i in 0..5u64 {
        session.process_prediction(&Prediction::new("A", 1.0), i * 150);
    }
    // One worthless vote drags the average under the letter gate.
    let outcome = session.process_prediction(&Prediction::new("A", 0.0), 750);
    assert!(outcome.decision.is_none());

    // Confidence recovers; an uninterrupted hold would have committed at
    // 1800 ms, but the dip reset the clock to 900.
    for i in 0..8u64 {
        session.process_prediction(&Prediction::new("A", 1.0), 900 + i * 150);
    }
    assert_eq!(session.buffer().text(), "");
    let outcome = session.process_prediction(&Prediction::new("A", 1.0), 2100);
    assert_eq!(outcome.committed, Some(CommitEvent::Letter("A".into())));
    assert_eq!(session.buffer().text(), "a");
}

#[test]
fn session_rejects_invalid_calibration() {
    let calibration = Calibration {
        dwell_ms: 0,
        ..Calibration::default()
    };
    assert!(SessionBuildParams::builder()
        .calibration(calibration)
        .build()
        .build_session()
        .is_err());
}

#[test]
fn malformed_hands_are_a_validation_error() {
    let mut session = SessionBuildParams::builder()
        .build()
        .build_session()
        .unwrap();
    // 20 points instead of 21.
    let short_hand = Pose::new().points()[..20].to_vec();
    assert!(session.process_frame(&[short_hand], None, 0).is_err());
    // The session is still usable afterwards.
    assert!(session.process_frame(&[], None, 10).is_ok());
}

#[test]
fn session_status_reflects_progress() {
    let mut session = SessionBuildParams::builder()
        .build()
        .build_session()
        .unwrap();
    session.process_frame(&[], None, 0).unwrap();
    let status = session.status(0);
    assert_eq!(status.frames, 1);
    assert_eq!(status.commits, 0);
    assert_eq!(status.mode, "rules");
}
