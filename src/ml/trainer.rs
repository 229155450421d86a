// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Fits multinomial logistic regression with burn.
//
//   loss = cross_entropy(X·W + b, y) + ||W||² / (2·C·n)
//
// The whole training partition is one batch (the penguin table
// is a few hundred rows), so every step is a full-gradient Adam
// update and the run is deterministic: zero initial weights, no
// shuffling, no dropout.
//
// The loop stops after `max_iter` steps, or earlier once the
// loss moves by less than `tolerance` between two steps. The
// reported final loss is evaluated on the weights that get frozen.
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use burn::{
    nn::loss::CrossEntropyLossConfig,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::TensorData,
};

use crate::application::train_use_case::SolverConfig;
use crate::ml::model::{LinearClassifier, LogisticRegression};

type MyBackend = burn::backend::Autodiff<burn::backend::NdArray>;

/// How the solver run ended. Persisted in the artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverReport {
    pub iterations: usize,
    pub converged:  bool,
    pub final_loss: f64,
}

/// What the solver produced and how it got there.
#[derive(Debug, Clone)]
pub struct FitOutcome {
    pub classifier: LinearClassifier,
    pub report:     SolverReport,
}

pub fn fit_logistic_regression(
    features:  &[Vec<f64>],
    labels:    &[usize],
    n_classes: usize,
    solver:    &SolverConfig,
) -> Result<FitOutcome> {
    let n_rows = features.len();
    if n_rows == 0 {
        bail!("Cannot fit a classifier on an empty training set");
    }
    if labels.len() != n_rows {
        bail!("{} feature rows but {} labels", n_rows, labels.len());
    }
    let n_features = features[0].len();
    if features.iter().any(|row| row.len() != n_features) {
        bail!("Feature rows have inconsistent widths");
    }

    let device = burn::backend::ndarray::NdArrayDevice::default();

    // ── Tensors ───────────────────────────────────────────────────────────────
    let flat: Vec<f32> = features.iter().flatten().map(|&x| x as f32).collect();
    let inputs = Tensor::<MyBackend, 2>::from_data(TensorData::new(flat, [n_rows, n_features]), &device);
    let codes: Vec<i64> = labels.iter().map(|&y| y as i64).collect();
    let targets = Tensor::<MyBackend, 1, Int>::from_data(TensorData::new(codes, [n_rows]), &device);

    // ── Model + optimiser ─────────────────────────────────────────────────────
    let mut model: LogisticRegression<MyBackend> = LogisticRegression::new(n_features, n_classes, &device);
    let mut optim = AdamConfig::new().with_epsilon(1e-8).init();
    let loss_fn   = CrossEntropyLossConfig::new().init(&device);
    let penalty   = 1.0 / (2.0 * solver.c * n_rows as f64);

    let objective = |model: &LogisticRegression<MyBackend>| {
        loss_fn.forward(model.forward(inputs.clone()), targets.clone())
            + model.weight_norm_sq().mul_scalar(penalty)
    };

    tracing::info!(
        "Fitting logistic regression: {} rows, {} features, {} classes",
        n_rows,
        n_features,
        n_classes
    );

    let mut previous   = f64::INFINITY;
    let mut iterations = 0usize;
    let mut converged  = false;

    for step in 1..=solver.max_iter {
        let loss = objective(&model);

        let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();
        if !loss_val.is_finite() {
            bail!("Loss diverged at iteration {step}; try a smaller learning rate");
        }

        // Backward pass + Adam update
        let grads = loss.backward();
        let grads = GradientsParams::from_grads(grads, &model);
        model = optim.step(solver.learning_rate, model, grads);

        iterations = step;

        if step % 100 == 0 {
            tracing::debug!("iteration {:>5} | loss={:.6}", step, loss_val);
        }
        if (previous - loss_val).abs() < solver.tolerance {
            converged = true;
            break;
        }
        previous = loss_val;
    }

    let final_loss: f64 = objective(&model).into_scalar().elem::<f64>();
    if !final_loss.is_finite() {
        bail!("Loss diverged after iteration {iterations}; try a smaller learning rate");
    }

    if converged {
        tracing::info!("Converged after {} iterations (loss={:.6})", iterations, final_loss);
    } else {
        tracing::warn!(
            "Stopped at max_iter={} without converging (loss={:.6})",
            solver.max_iter,
            final_loss
        );
    }

    Ok(FitOutcome {
        classifier: model.freeze()?,
        report:     SolverReport { iterations, converged, final_loss },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::model::argmax;

    fn solver() -> SolverConfig {
        SolverConfig { max_iter: 500, learning_rate: 0.1, tolerance: 1e-7, c: 1.0 }
    }

    fn blobs() -> (Vec<Vec<f64>>, Vec<usize>) {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for i in 0..10 {
            let jitter = i as f64 * 0.05;
            x.push(vec![-2.0 + jitter, 0.0]);
            y.push(0);
            x.push(vec![2.0 - jitter, 0.0]);
            y.push(1);
            x.push(vec![0.0, 2.0 + jitter]);
            y.push(2);
        }
        (x, y)
    }

    #[test]
    fn test_separable_classes_are_learned() {
        let (x, y) = blobs();
        let fit    = fit_logistic_regression(&x, &y, 3, &solver()).unwrap();

        let correct = x
            .iter()
            .zip(&y)
            .filter(|(row, label)| argmax(&fit.classifier.predict_proba(row).unwrap()) == **label)
            .count();
        assert_eq!(correct, x.len());
        assert!(fit.report.final_loss.is_finite());
    }

    #[test]
    fn test_fit_is_deterministic() {
        let (x, y) = blobs();
        let a = fit_logistic_regression(&x, &y, 3, &solver()).unwrap();
        let b = fit_logistic_regression(&x, &y, 3, &solver()).unwrap();
        assert_eq!(a.classifier, b.classifier);
        assert_eq!(a.report, b.report);
    }

    #[test]
    fn test_iteration_cap_is_respected() {
        let (x, y) = blobs();
        let capped = SolverConfig { max_iter: 5, tolerance: 0.0, ..solver() };
        let fit    = fit_logistic_regression(&x, &y, 3, &capped).unwrap();
        assert_eq!(fit.report.iterations, 5);
        assert!(!fit.report.converged);
    }

    #[test]
    fn test_final_loss_matches_frozen_weights() {
        let (x, y) = blobs();
        let capped = SolverConfig { max_iter: 5, tolerance: 0.0, ..solver() };
        let fit    = fit_logistic_regression(&x, &y, 3, &capped).unwrap();

        let n   = x.len() as f64;
        let nll = x
            .iter()
            .zip(&y)
            .map(|(row, &label)| -fit.classifier.predict_proba(row).unwrap()[label].ln())
            .sum::<f64>()
            / n;
        let norm_sq: f64 = fit.classifier.coefficients.iter().flatten().map(|w| w * w).sum();
        let expected = nll + norm_sq / (2.0 * capped.c * n);

        assert!(
            (fit.report.final_loss - expected).abs() < 1e-4,
            "reported {} but frozen weights give {}",
            fit.report.final_loss,
            expected
        );
    }

    #[test]
    fn test_empty_training_set_is_an_error() {
        assert!(fit_logistic_regression(&[], &[], 3, &solver()).is_err());
    }
}
