pub mod mlp;
pub mod payload;

use itertools::Itertools;
use sha2::{Digest, Sha256};
use std::path::Path;
use strum_macros::{Display, EnumString};
use tracing::info;

use crate::consts::FEATURE_SIZE;
use crate::error::{FingerspellError, FspResult};
use crate::features::FeatureVector;
use fingerspell_protocol::messages::Prediction;
use payload::{LayerPayload, ModelPayload};

/// Per-layer activation. The network's final layer is always followed by
/// [`mlp::softmax`], so a trailing "softmax" entry behaves like linear here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Activation {
    Relu,
    #[strum(serialize = "linear", serialize = "identity")]
    Linear,
    Softmax,
}

/// A validated dense layer, ready to run.
#[derive(Debug, Clone)]
pub struct Layer {
    pub weights: Vec<Vec<f32>>,
    pub biases: Vec<f32>,
    pub activation: Activation,
}

/// A validated network plus its label table.
///
/// Construction goes through [`Model::from_payload`], which enforces every
/// structural rule, so inference never bounds-checks.
#[derive(Debug, Clone)]
pub struct Model {
    pub labels: Vec<String>,
    pub layers: Vec<Layer>,
    /// SHA-256 of the exact file bytes, for provenance in logs and reports.
    pub fingerprint: String,
}

impl Model {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> FspResult<Self> {
        let loaded = payload::read_payload(path)?;
        let model = Self::from_payload(loaded.payload, fingerprint_of(&loaded.raw))?;
        info!(
            "🧠 Model {} ready: {} labels, {} layers",
            model.short_fingerprint(),
            model.labels.len(),
            model.layers.len()
        );
        Ok(model)
    }

    pub fn from_json(raw: &str) -> FspResult<Self> {
        let payload: ModelPayload = serde_json::from_str(raw)?;
        Self::from_payload(payload, fingerprint_of(raw))
    }

    pub fn from_payload(payload: ModelPayload, fingerprint: String) -> FspResult<Self> {
        if let Some(kind) = &payload.model_type {
            if kind != "mlp" {
                return Err(model_err(format!("unsupported model_type '{}'", kind)));
            }
        }
        if payload.labels.is_empty() {
            return Err(model_err("model declares no labels"));
        }
        // Label casing is normalized here so the rest of the pipeline can
        // compare labels verbatim.
        let labels: Vec<String> = payload
            .labels
            .iter()
            .map(|l| l.trim().to_uppercase())
            .collect();
        if labels.iter().any(|l| l.is_empty()) {
            return Err(model_err("empty label in model"));
        }
        if !labels.iter().all_unique() {
            return Err(model_err("duplicate labels in model"));
        }
        if payload.input_size != FEATURE_SIZE {
            return Err(model_err(format!(
                "model expects input size {}, feature vectors are {}",
                payload.input_size, FEATURE_SIZE
            )));
        }
        if payload.layers.is_empty() {
            return Err(model_err("model has no layers"));
        }

        let mut layers = Vec::with_capacity(payload.layers.len());
        let mut expected_input = payload.input_size;
        for (idx, layer) in payload.layers.into_iter().enumerate() {
            let validated = validate_layer(idx, layer, expected_input)?;
            expected_input = validated.biases.len();
            layers.push(validated);
        }

        let final_size = expected_input;
        if final_size != labels.len() {
            return Err(model_err(format!(
                "final layer emits {} values but model declares {} labels",
                final_size,
                labels.len()
            )));
        }

        Ok(Self {
            labels,
            layers,
            fingerprint,
        })
    }

    /// Best label with its softmax probability. Never empty: gating against
    /// confidence floors is the smoother's job, not the network's.
    pub fn infer(&self, features: &FeatureVector) -> Prediction {
        let probs = mlp::probabilities(self, features);
        match mlp::argmax(&probs) {
            Some(idx) => Prediction::new(self.labels[idx].clone(), probs[idx]),
            None => Prediction::empty(),
        }
    }

    /// Per-label probabilities, index-aligned with `labels`.
    pub fn probabilities(&self, features: &FeatureVector) -> Vec<f32> {
        mlp::probabilities(self, features)
    }

    pub fn short_fingerprint(&self) -> &str {
        &self.fingerprint[..12.min(self.fingerprint.len())]
    }
}

fn validate_layer(idx: usize, layer: LayerPayload, expected_input: usize) -> FspResult<Layer> {
    let tag = if layer.name.is_empty() {
        format!("layer {}", idx)
    } else {
        format!("layer {} ({})", idx, layer.name)
    };

    if layer.input_size != expected_input {
        return Err(model_err(format!(
            "{}: declares input {} but previous layer emits {}",
            tag, layer.input_size, expected_input
        )));
    }
    if layer.output_size == 0 {
        return Err(model_err(format!("{}: zero-width output", tag)));
    }
    if layer.weights.len() != layer.input_size {
        return Err(model_err(format!(
            "{}: weight matrix has {} rows, expected {}",
            tag,
            layer.weights.len(),
            layer.input_size
        )));
    }
    for (i, row) in layer.weights.iter().enumerate() {
        if row.len() != layer.output_size {
            return Err(model_err(format!(
                "{}: weight row {} has {} columns, expected {}",
                tag,
                i,
                row.len(),
                layer.output_size
            )));
        }
        if row.iter().any(|w| !w.is_finite()) {
            return Err(model_err(format!("{}: non-finite weight in row {}", tag, i)));
        }
    }
    if layer.biases.len() != layer.output_size {
        return Err(model_err(format!(
            "{}: {} biases, expected {}",
            tag,
            layer.biases.len(),
            layer.output_size
        )));
    }
    if layer.biases.iter().any(|b| !b.is_finite()) {
        return Err(model_err(format!("{}: non-finite bias", tag)));
    }
    let activation: Activation = layer
        .activation
        .parse()
        .map_err(|_| model_err(format!("{}: unknown activation '{}'", tag, layer.activation)))?;

    Ok(Layer {
        weights: layer.weights,
        biases: layer.biases,
        activation,
    })
}

fn fingerprint_of(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hex::encode(hasher.finalize())
}

fn model_err(msg: impl Into<String>) -> FingerspellError {
    FingerspellError::Model(msg.into())
}
