//! Labeled-sample loading and model accuracy evaluation.
//!
//! The capture tool records samples as a JSON array of
//! `{"label": "A", "x": [63 floats], "t": ...}` objects. Rows are
//! filtered the way the trainer filters them — single alphabetic label,
//! exactly 63 finite coordinates — and anything else is skipped and
//! counted rather than failing the whole file.

use std::fs;
use std::path::Path;

use fnv::FnvHashMap;
use rayon::prelude::*;
use serde_json::Value;
use tracing::{debug, info};

use crate::consts::{FEATURE_SIZE, MOTION_LETTERS};
use crate::error::{FingerspellError, FspResult};
use crate::features::FeatureVector;
use crate::model::Model;

#[derive(Debug, Clone)]
pub struct Sample {
    pub label: String,
    pub features: FeatureVector,
}

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub samples: Vec<Sample>,
    /// Rows dropped by the filtering rules.
    pub skipped: usize,
}

/// Accuracy per label, index-sorted by label for stable reports.
#[derive(Debug, Clone)]
pub struct LabelStats {
    pub label: String,
    pub hits: usize,
    pub total: usize,
}

impl LabelStats {
    pub fn accuracy(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        self.hits as f32 / self.total as f32
    }
}

#[derive(Debug, Clone, Default)]
pub struct EvalReport {
    pub per_label: Vec<LabelStats>,
    pub hits: usize,
    pub total: usize,
}

impl EvalReport {
    pub fn accuracy(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        self.hits as f32 / self.total as f32
    }
}

/// Load a dataset file. `include_motion` keeps J/Z rows; the trainer
/// drops them by default because a single frame cannot capture motion.
pub fn load<P: AsRef<Path>>(path: P, include_motion: bool) -> FspResult<Dataset> {
    let raw = fs::read_to_string(path)?;
    let rows: Vec<Value> = serde_json::from_str(&raw)?;
    let mut dataset = Dataset::default();

    for (idx, row) in rows.iter().enumerate() {
        match parse_row(row, include_motion) {
            Some(sample) => dataset.samples.push(sample),
            None => {
                dataset.skipped += 1;
                debug!("dataset row {} skipped", idx);
            }
        }
    }

    if dataset.samples.is_empty() {
        return Err(FingerspellError::Validation(
            "no valid samples after filtering".into(),
        ));
    }
    info!(
        "Dataset loaded: {} samples, {} skipped",
        dataset.samples.len(),
        dataset.skipped
    );
    Ok(dataset)
}

fn parse_row(row: &Value, include_motion: bool) -> Option<Sample> {
    let label = row.get("label")?.as_str()?.trim().to_uppercase();
    if label.chars().count() != 1 || !label.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    if !include_motion && MOTION_LETTERS.contains(&label.as_str()) {
        return None;
    }

    let coords = row.get("x")?.as_array()?;
    if coords.len() != FEATURE_SIZE {
        return None;
    }
    let mut features = [0.0f32; FEATURE_SIZE];
    for (slot, v) in features.iter_mut().zip(coords) {
        let v = v.as_f64()? as f32;
        if !v.is_finite() {
            return None;
        }
        *slot = v;
    }
    Some(Sample { label, features })
}

/// Run every sample through the network and tally hits per label.
pub fn evaluate(model: &Model, dataset: &Dataset) -> EvalReport {
    let verdicts: Vec<(&str, bool)> = dataset
        .samples
        .par_iter()
        .map(|sample| {
            let predicted = model.infer(&sample.features);
            let hit = predicted.label.as_deref() == Some(sample.label.as_str());
            (sample.label.as_str(), hit)
        })
        .collect();

    let mut tally: FnvHashMap<&str, (usize, usize)> = FnvHashMap::default();
    let mut hits = 0;
    for (label, hit) in &verdicts {
        let entry = tally.entry(label).or_insert((0, 0));
        entry.1 += 1;
        if *hit {
            entry.0 += 1;
            hits += 1;
        }
    }

    let mut per_label: Vec<LabelStats> = tally
        .into_iter()
        .map(|(label, (hits, total))| LabelStats {
            label: label.to_string(),
            hits,
            total,
        })
        .collect();
    per_label.sort_by(|a, b| a.label.cmp(&b.label));

    EvalReport {
        per_label,
        hits,
        total: verdicts.len(),
    }
}
