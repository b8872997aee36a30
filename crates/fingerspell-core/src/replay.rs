//! Offline replay of recorded capture streams.
//!
//! Two formats are supported: JSONL of channel envelopes (exactly what a
//! capture process sends over the wire, origin checks included) and a
//! flat CSV of one hand per row for hand-edited fixtures. Replay drives a
//! real session, so dwell timing follows the recorded timestamps.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

use crate::channel::{ChannelEvent, ChannelReceiver, ChannelStats};
use crate::consts::FEATURE_SIZE;
use crate::error::FspResult;
use crate::session::{CommitEvent, FrameOutcome, RecognizerSession};
use fingerspell_protocol::landmarks::{Handedness, Landmark};

/// What a replay run produced, for reporting.
#[derive(Debug, Clone, Default)]
pub struct ReplayReport {
    /// Frames that reached the session.
    pub frames: u64,
    /// Frames the session refused (failed landmark validation).
    pub invalid_frames: u64,
    /// Prediction messages fed to the smoother.
    pub predictions: u64,
    /// Frames skipped because the sender had taken over classification.
    pub suppressed_frames: u64,
    pub decisions: u64,
    pub commits: Vec<CommitEvent>,
    pub final_text: String,
    pub channel: ChannelStats,
}

/// Replay a JSONL capture stream through the channel receiver and the
/// session. Lines that fail envelope validation or carry a foreign origin
/// are dropped and counted, same as they would be live.
pub fn replay_jsonl<P: AsRef<Path>>(
    path: P,
    expected_origin: &str,
    session: &mut RecognizerSession,
) -> FspResult<ReplayReport> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut receiver = ChannelReceiver::new(expected_origin);
    let mut report = ReplayReport::default();

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let event = match receiver.accept(&line) {
            Some(event) => event,
            None => continue,
        };
        match event {
            ChannelEvent::Frame {
                hands,
                handedness,
                timestamp_ms,
            } => {
                // Once the sender classifies for us, raw frames no longer
                // go through the local classifier (no double-typing).
                if receiver.live() {
                    report.suppressed_frames += 1;
                    debug!("frame at {} ms skipped, sender is live", timestamp_ms);
                    continue;
                }
                drive_frame(session, &hands, handedness, timestamp_ms, &mut report);
            }
            ChannelEvent::Prediction {
                prediction,
                timestamp_ms,
            } => {
                report.predictions += 1;
                let outcome = session.process_prediction(&prediction, timestamp_ms);
                record_outcome(&outcome, &mut report);
            }
        }
    }

    report.channel = receiver.stats();
    finish_report(session, &mut report);
    Ok(report)
}

/// Replay a CSV fixture. Expected columns: `timestamp_ms, handedness,`
/// then 63 coordinates. A row with no coordinates is a no-hand tick.
/// Rows that fail to parse are skipped, consistent with how other loaders
/// treat damaged input.
pub fn replay_csv<P: AsRef<Path>>(
    path: P,
    session: &mut RecognizerSession,
) -> FspResult<ReplayReport> {
    let file = File::open(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(file);
    let mut report = ReplayReport::default();

    for record in rdr.records().flatten() {
        if record.is_empty() {
            continue;
        }
        let timestamp_ms: u64 = match record[0].trim().parse() {
            Ok(t) => t,
            Err(_) => continue,
        };
        let handedness: Option<Handedness> = record
            .get(1)
            .and_then(|s| s.trim().parse().ok());

        let coords: Vec<f32> = record
            .iter()
            .skip(2)
            .filter_map(|v| v.trim().parse().ok())
            .collect();

        let hands: Vec<Vec<Landmark>> = if coords.is_empty() {
            Vec::new()
        } else if coords.len() == FEATURE_SIZE {
            vec![coords
                .chunks_exact(3)
                .map(|c| Landmark::new(c[0], c[1], c[2]))
                .collect()]
        } else {
            debug!("csv row with {} coordinates skipped", coords.len());
            continue;
        };

        drive_frame(session, &hands, handedness, timestamp_ms, &mut report);
    }

    finish_report(session, &mut report);
    Ok(report)
}

fn drive_frame(
    session: &mut RecognizerSession,
    hands: &[Vec<Landmark>],
    handedness: Option<Handedness>,
    timestamp_ms: u64,
    report: &mut ReplayReport,
) {
    match session.process_frame(hands, handedness, timestamp_ms) {
        Ok(outcome) => {
            report.frames += 1;
            record_outcome(&outcome, report);
        }
        Err(e) => {
            report.invalid_frames += 1;
            debug!("replay frame rejected: {}", e);
        }
    }
}

fn record_outcome(outcome: &FrameOutcome, report: &mut ReplayReport) {
    if outcome.decision.is_some() {
        report.decisions += 1;
    }
    if let Some(event) = &outcome.committed {
        report.commits.push(event.clone());
    }
}

fn finish_report(session: &RecognizerSession, report: &mut ReplayReport) {
    report.final_text = session.buffer().text().to_string();
    info!(
        "Replay done: {} frames, {} commits, text {:?}",
        report.frames,
        report.commits.len(),
        report.final_text
    );
}
