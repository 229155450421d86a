// ============================================================
// Layer 5 — Logistic Regression Model
// ============================================================
// Two views of the same classifier:
//
//   LogisticRegression<B> — a burn Module (one Linear layer,
//                           zero-initialised) that the trainer
//                           differentiates through
//
//   LinearClassifier      — the frozen f64 weights that go into
//                           the artifact and answer requests
//                           without any autodiff backend
//
// burn stores a Linear weight as [d_input, d_output]; the frozen
// form is one coefficient row per class.

use anyhow::{anyhow, Result};
use burn::{
    nn::{Initializer, Linear, LinearConfig},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::domain::errors::TransformError;

#[derive(Module, Debug)]
pub struct LogisticRegression<B: Backend> {
    linear: Linear<B>,
}

impl<B: Backend> LogisticRegression<B> {
    /// Zero weights make the fit independent of any RNG.
    pub fn new(n_features: usize, n_classes: usize, device: &B::Device) -> Self {
        let linear = LinearConfig::new(n_features, n_classes)
            .with_initializer(Initializer::Zeros)
            .init(device);
        Self { linear }
    }

    /// Class logits, shape [batch, n_classes].
    pub fn forward(&self, inputs: Tensor<B, 2>) -> Tensor<B, 2> {
        self.linear.forward(inputs)
    }

    /// Squared L2 norm of the weights (intercepts excluded).
    pub fn weight_norm_sq(&self) -> Tensor<B, 1> {
        self.linear.weight.val().powf_scalar(2.0).sum()
    }

    /// Copy the learned parameters out of the backend.
    pub fn freeze(&self) -> Result<LinearClassifier> {
        let weight = self.linear.weight.val();
        let [n_features, n_classes] = weight.dims();

        let weights: Vec<f32> = weight
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| anyhow!("Cannot read weights: {e:?}"))?;
        let bias: Vec<f32> = match &self.linear.bias {
            Some(b) => b
                .val()
                .into_data()
                .to_vec::<f32>()
                .map_err(|e| anyhow!("Cannot read bias: {e:?}"))?,
            None => vec![0.0; n_classes],
        };

        let coefficients = (0..n_classes)
            .map(|c| (0..n_features).map(|f| weights[f * n_classes + c] as f64).collect())
            .collect();
        let intercepts = bias.iter().map(|&b| b as f64).collect();

        Ok(LinearClassifier { coefficients, intercepts })
    }
}

// ─── LinearClassifier ─────────────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearClassifier {
    /// One row of feature coefficients per class.
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts:   Vec<f64>,
}

impl LinearClassifier {
    pub fn n_classes(&self) -> usize {
        self.intercepts.len()
    }

    pub fn n_features(&self) -> usize {
        self.coefficients.first().map_or(0, Vec::len)
    }

    /// Raw class scores for one encoded row.
    pub fn decision_function(&self, row: &[f64]) -> Result<Vec<f64>, TransformError> {
        if row.len() != self.n_features() {
            return Err(TransformError::WidthMismatch {
                expected: self.n_features(),
                actual:   row.len(),
            });
        }
        Ok(self
            .coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(coef, b)| coef.iter().zip(row).map(|(w, x)| w * x).sum::<f64>() + b)
            .collect())
    }

    /// Softmax over the class scores.
    pub fn predict_proba(&self, row: &[f64]) -> Result<Vec<f64>, TransformError> {
        let scores = self.decision_function(row)?;
        let max    = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
        let total: f64 = exps.iter().sum();
        Ok(exps.into_iter().map(|e| e / total).collect())
    }
}

/// Index of the highest value; ties go to the lower index.
pub fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}
