// ============================================================
// Layer 5 — Prediction Pipeline
// ============================================================
// Schema + fitted transforms + frozen classifier, fitted
// together and applied together. This is the `model` half of
// the artifact; the inference service treats it as
// "frame in, class index out".

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::application::train_use_case::SolverConfig;
use crate::data::dataset::LabelledDataset;
use crate::domain::errors::TransformError;
use crate::domain::frame::Frame;
use crate::domain::schema::FeatureSchema;
use crate::ml::model::{argmax, LinearClassifier};
use crate::ml::trainer::{fit_logistic_regression, SolverReport};
use crate::ml::transform::{ColumnTransformer, UnknownCategory};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    pub schema:      FeatureSchema,
    pub transformer: ColumnTransformer,
    pub classifier:  LinearClassifier,
}

/// Prediction for one frame row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowPrediction {
    pub index:              usize,
    pub probabilities:      Vec<f64>,
    pub unknown_categories: Vec<UnknownCategory>,
}

impl Pipeline {
    /// Fit transforms and classifier on the training partition.
    pub fn fit(
        schema: FeatureSchema,
        train:  &LabelledDataset,
        solver: &SolverConfig,
    ) -> Result<(Self, SolverReport)> {
        let transformer = ColumnTransformer::fit(&schema, &train.features)?;
        let encoded     = transformer.transform(&train.features)?;

        tracing::debug!("Encoded features: {:?}", transformer.feature_names());

        let fit = fit_logistic_regression(
            &encoded.rows,
            &train.labels,
            train.class_names.len(),
            solver,
        )?;

        let pipeline = Self { schema, transformer, classifier: fit.classifier };
        Ok((pipeline, fit.report))
    }

    /// Transform then predict every row of `frame`.
    pub fn predict(&self, frame: &Frame) -> Result<Vec<RowPrediction>, TransformError> {
        self.schema.check_columns(frame)?;
        let encoded = self.transformer.transform(frame)?;

        encoded
            .rows
            .iter()
            .enumerate()
            .map(|(r, row)| {
                let probabilities = self.classifier.predict_proba(row)?;
                let unknown_categories = encoded
                    .unknown
                    .iter()
                    .filter(|u| u.row == r)
                    .cloned()
                    .collect();
                Ok(RowPrediction {
                    index: argmax(&probabilities),
                    probabilities,
                    unknown_categories,
                })
            })
            .collect()
    }

    /// Structural checks run when a pipeline is read back from disk.
    pub fn validate(&self, n_classes: usize) -> Result<(), String> {
        let c = &self.classifier;
        if c.coefficients.len() != c.intercepts.len() {
            return Err(format!(
                "{} coefficient rows but {} intercepts",
                c.coefficients.len(),
                c.intercepts.len()
            ));
        }
        if c.coefficients.iter().any(|row| row.len() != c.n_features()) {
            return Err("coefficient rows have different widths".to_string());
        }
        if c.n_classes() != n_classes {
            return Err(format!(
                "classifier has {} classes but {} class names",
                c.n_classes(),
                n_classes
            ));
        }
        if self.transformer.output_width() != c.n_features() {
            return Err(format!(
                "preprocessor emits {} features but classifier expects {}",
                self.transformer.output_width(),
                c.n_features()
            ));
        }
        Ok(())
    }
}
