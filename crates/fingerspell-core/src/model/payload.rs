//! Serde-facing shape of the exported model file.
//!
//! The trainer writes plain JSON: metadata, the label list, and dense
//! layers with weights stored input-major (`weights[i][j]` connects input
//! `i` to output `j`). Nothing here is validated; that happens when the
//! payload is turned into a runnable [`crate::model::Model`].

use crate::error::FspResult;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn linear_activation() -> String {
    "linear".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerPayload {
    #[serde(default)]
    pub name: String,
    pub input_size: usize,
    pub output_size: usize,
    /// The trainer always writes this; hand-edited payloads may omit it.
    #[serde(default = "linear_activation")]
    pub activation: String,
    pub weights: Vec<Vec<f32>>,
    pub biases: Vec<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelPayload {
    #[serde(default)]
    pub model_type: Option<String>,
    pub input_size: usize,
    pub labels: Vec<String>,
    pub layers: Vec<LayerPayload>,
}

/// Raw bytes plus the parsed payload; the bytes feed the fingerprint.
pub struct LoadedPayload {
    pub payload: ModelPayload,
    pub raw: String,
}

pub fn read_payload<P: AsRef<Path>>(path: P) -> FspResult<LoadedPayload> {
    let raw = fs::read_to_string(path)?;
    let payload: ModelPayload = serde_json::from_str(&raw)?;
    Ok(LoadedPayload { payload, raw })
}
