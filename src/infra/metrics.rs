// ============================================================
// Layer 6 — Evaluation Metrics
// ============================================================
// Scores the held-out partition after fitting. This is
// diagnostics only: a training run never fails because the
// numbers are bad, and the artifact is already on disk by the
// time the CSV is written.
//
// Metrics per class (one-vs-rest):
//   precision = TP / (TP + FP)     0.0 when nothing was predicted
//   recall    = TP / (TP + FN)     0.0 when the class is absent
//   f1        = 2·P·R / (P + R)    0.0 when P + R = 0
//   support   = number of true rows of that class
//
// Example CSV output:
//   class,precision,recall,f1,support
//   Adelie,1.000000,0.966667,0.983051,30
//   ...
//   accuracy,,,0.985507,69

use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::domain::labels::ClassNames;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub class:     String,
    pub precision: f64,
    pub recall:    f64,
    pub f1:        f64,
    pub support:   usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub accuracy:  f64,
    pub total:     usize,
    pub per_class: Vec<ClassMetrics>,
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

impl EvaluationReport {
    /// Compare true and predicted class codes.
    pub fn from_predictions(truth: &[usize], predicted: &[usize], class_names: &ClassNames) -> Self {
        let k = class_names.len();
        let mut tp = vec![0usize; k];
        let mut fp = vec![0usize; k];
        let mut fn_ = vec![0usize; k];

        for (&t, &p) in truth.iter().zip(predicted) {
            if t == p {
                tp[t] += 1;
            } else {
                fp[p] += 1;
                fn_[t] += 1;
            }
        }

        let per_class = (0..k)
            .map(|c| {
                let precision = ratio(tp[c], tp[c] + fp[c]);
                let recall    = ratio(tp[c], tp[c] + fn_[c]);
                let f1 = if precision + recall > 0.0 {
                    2.0 * precision * recall / (precision + recall)
                } else {
                    0.0
                };
                ClassMetrics {
                    class: class_names.name(c).unwrap_or_default().to_string(),
                    precision,
                    recall,
                    f1,
                    support: tp[c] + fn_[c],
                }
            })
            .collect();

        let total = truth.len().min(predicted.len());
        Self {
            accuracy: ratio(tp.iter().sum(), total),
            total,
            per_class,
        }
    }

    /// Emit the report through tracing.
    pub fn log(&self) {
        tracing::info!("Held-out accuracy: {:.4} ({} rows)", self.accuracy, self.total);
        for m in &self.per_class {
            tracing::info!(
                "  {:<12} precision={:.3} recall={:.3} f1={:.3} support={}",
                m.class,
                m.precision,
                m.recall,
                m.f1,
                m.support
            );
        }
    }
}

/// Writes an EvaluationReport as CSV, replacing any previous file.
pub struct MetricsWriter {
    csv_path: PathBuf,
}

impl MetricsWriter {
    pub fn new(csv_path: impl Into<PathBuf>) -> Self {
        Self { csv_path: csv_path.into() }
    }

    pub fn write(&self, report: &EvaluationReport) -> Result<()> {
        if let Some(dir) = self.csv_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let mut w = WriterBuilder::new()
            .has_headers(false)
            .from_path(&self.csv_path)
            .with_context(|| format!("Cannot create '{}'", self.csv_path.display()))?;

        w.write_record(["class", "precision", "recall", "f1", "support"])?;
        for m in &report.per_class {
            w.write_record([
                m.class.clone(),
                format!("{:.6}", m.precision),
                format!("{:.6}", m.recall),
                format!("{:.6}", m.f1),
                m.support.to_string(),
            ])?;
        }
        w.write_record([
            "accuracy".to_string(),
            String::new(),
            String::new(),
            format!("{:.6}", report.accuracy),
            report.total.to_string(),
        ])?;
        w.flush()?;

        tracing::debug!("Wrote metrics to '{}'", self.csv_path.display());
        Ok(())
    }

    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}
