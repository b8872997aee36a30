//! Dense forward pass and the probability head.

use itertools::Itertools;

use super::{Activation, Model};

/// One dense layer: out[j] = bias[j] + sum_i in[i] * w[i][j].
/// Weights are input-major, so the inner loop walks one contiguous row.
pub fn layer_forward(
    input: &[f32],
    weights: &[Vec<f32>],
    biases: &[f32],
    activation: Activation,
) -> Vec<f32> {
    let mut out = biases.to_vec();
    for (i, &x) in input.iter().enumerate() {
        if x == 0.0 {
            continue;
        }
        for (j, &w) in weights[i].iter().enumerate() {
            out[j] += x * w;
        }
    }
    if activation == Activation::Relu {
        for v in &mut out {
            if *v < 0.0 {
                *v = 0.0;
            }
        }
    }
    out
}

/// Numerically stable softmax: shift by the max before exponentiating so
/// large logits cannot overflow. A degenerate all-zero sum falls back to
/// the uniform distribution instead of dividing by zero.
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let mut out: Vec<f32> = logits.iter().map(|&v| (v - max).exp()).collect();
    let sum: f32 = out.iter().sum();
    if sum > 0.0 {
        for v in &mut out {
            *v /= sum;
        }
    } else {
        let uniform = 1.0 / out.len().max(1) as f32;
        for v in &mut out {
            *v = uniform;
        }
    }
    out
}

/// Run the whole network and return per-label probabilities,
/// index-aligned with `model.labels`.
pub fn probabilities(model: &Model, features: &[f32]) -> Vec<f32> {
    let mut current = features.to_vec();
    for layer in &model.layers {
        current = layer_forward(&current, &layer.weights, &layer.biases, layer.activation);
    }
    softmax(&current)
}

/// Index of the most probable label.
pub fn argmax(probabilities: &[f32]) -> Option<usize> {
    probabilities
        .iter()
        .position_max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
}
