// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates one training run in order:
//
//   Step 1: Load the CSV dataset           (Layer 4 - data)
//   Step 2: Drop index columns / no-label  (Layer 4 - data)
//   Step 3: Factorize labels               (Layer 4 - data)
//   Step 4: Infer the feature schema       (Layer 3 - domain)
//   Step 5: Stratified 80/20 split         (Layer 4 - data)
//   Step 6: Fit transforms + classifier    (Layer 5 - ml)
//   Step 7: Score the held-out rows        (Layer 6 - infra)
//   Step 8: Write the artifact atomically  (Layer 6 - infra)
//   Step 9: Write metrics CSV if asked     (Layer 6 - infra)
//
// Any failure before step 8 leaves an existing artifact as it
// was.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::data::{
    dataset::LabelledDataset,
    loader::CsvLoader,
    preprocessor::Preprocessor,
    splitter::stratified_split,
};
use crate::domain::{errors::TrainError, schema::FeatureSchema, traits::DatasetSource};
use crate::infra::{
    artifact_store::{Artifact, ArtifactStore, TrainingSummary},
    metrics::{EvaluationReport, MetricsWriter},
};
use crate::ml::pipeline::Pipeline;

// ─── Solver Configuration ─────────────────────────────────────────────────────
// Settings for the logistic regression fit. Persisted in the
// artifact so a run can be reproduced from the artifact alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Hard cap on optimiser steps
    pub max_iter:      usize,
    pub learning_rate: f64,
    /// Stop early once the loss moves less than this per step
    pub tolerance:     f64,
    /// Inverse L2 regularisation strength
    pub c:             f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iter:      1000,
            learning_rate: 0.1,
            tolerance:     1e-6,
            c:             1.0,
        }
    }
}

// ─── Training Configuration ──────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_path:     String,
    pub artifact_path: String,
    pub target:        String,
    pub test_fraction: f64,
    pub seed:          u64,
    pub solver:        SolverConfig,
    pub metrics_csv:   Option<String>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_path:     "data/penguins.csv".to_string(),
            artifact_path: "artifacts/model.json".to_string(),
            target:        "species".to_string(),
            test_fraction: 0.2,
            seed:          42,
            solver:        SolverConfig::default(),
            metrics_csv:   None,
        }
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Train from the configured CSV file.
    pub fn execute(&self) -> Result<TrainingSummary> {
        let loader = CsvLoader::new(&self.config.data_path);
        self.execute_with(&loader)
    }

    /// Train from any dataset source.
    pub fn execute_with<S: DatasetSource>(&self, source: &S) -> Result<TrainingSummary> {
        let cfg = &self.config;
        validate(cfg)?;

        // ── Step 1: Load ──────────────────────────────────────────────────────
        tracing::info!("Loading dataset from '{}'", source.describe());
        let frame = source.load()?;
        tracing::info!("Loaded {} rows, {} columns", frame.len(), frame.columns().len());

        // ── Step 2: Clean ─────────────────────────────────────────────────────
        let clean = Preprocessor::new(&cfg.target).clean(frame)?;

        // ── Step 3: Labels ────────────────────────────────────────────────────
        let dataset = LabelledDataset::from_frame(clean, &cfg.target)?;
        check_classes(&dataset)?;
        for (code, name) in dataset.class_names.as_slice().iter().enumerate() {
            tracing::info!("Class {} → {}", code, name);
        }

        // ── Step 4: Schema ────────────────────────────────────────────────────
        // Inferred on every run so new columns are picked up.
        let schema = FeatureSchema::infer(&dataset.features, &cfg.target);
        tracing::debug!("Feature columns: {:?}", schema.feature_names());
        tracing::info!(
            "Numeric features: {:?}",
            schema.numeric().map(|c| c.name.as_str()).collect::<Vec<_>>()
        );
        tracing::info!(
            "Categorical features: {:?}",
            schema.categorical().map(|c| c.name.as_str()).collect::<Vec<_>>()
        );

        // ── Step 5: Stratified split ──────────────────────────────────────────
        let split = stratified_split(
            &dataset.labels,
            dataset.class_names.len(),
            cfg.test_fraction,
            cfg.seed,
        );
        let train = dataset.subset(&split.train);
        let test  = dataset.subset(&split.test);
        tracing::info!("Split: {} train, {} test", train.len(), test.len());

        // ── Step 6: Fit ───────────────────────────────────────────────────────
        let (pipeline, outcome) = Pipeline::fit(schema, &train, &cfg.solver)?;

        // ── Step 7: Held-out diagnostics ──────────────────────────────────────
        let report = if test.is_empty() {
            None
        } else {
            let predicted: Vec<usize> = pipeline
                .predict(&test.features)?
                .into_iter()
                .map(|p| p.index)
                .collect();
            let report = EvaluationReport::from_predictions(&test.labels, &predicted, &dataset.class_names);
            report.log();
            Some(report)
        };

        // ── Step 8: Artifact ──────────────────────────────────────────────────
        let summary = TrainingSummary {
            seed:          cfg.seed,
            train_rows:    train.len(),
            test_rows:     test.len(),
            solver:        cfg.solver.clone(),
            outcome,
            test_accuracy: report.as_ref().map(|r| r.accuracy),
        };
        let artifact = Artifact::new(pipeline, dataset.class_names.clone(), summary.clone());
        ArtifactStore::new(&cfg.artifact_path).save(&artifact)?;

        // ── Step 9: Metrics CSV ───────────────────────────────────────────────
        if let (Some(path), Some(report)) = (&cfg.metrics_csv, &report) {
            let writer = MetricsWriter::new(path);
            if let Err(e) = writer.write(report) {
                tracing::warn!("Could not write metrics to '{}': {:#}", writer.csv_path().display(), e);
            }
        }

        Ok(summary)
    }
}

fn validate(cfg: &TrainConfig) -> Result<()> {
    if !(0.0..1.0).contains(&cfg.test_fraction) {
        bail!("test fraction must be in [0, 1), got {}", cfg.test_fraction);
    }
    if cfg.solver.max_iter == 0 {
        bail!("max_iter must be at least 1");
    }
    if cfg.solver.learning_rate <= 0.0 || cfg.solver.c <= 0.0 {
        bail!("learning rate and C must be positive");
    }
    Ok(())
}

fn check_classes(dataset: &LabelledDataset) -> Result<(), TrainError> {
    let counts = dataset.class_counts();
    if counts.len() < 2 {
        return Err(TrainError::TooFewClasses(counts.len()));
    }
    for (code, &count) in counts.iter().enumerate() {
        if count < 2 {
            return Err(TrainError::ClassTooSmall {
                class: dataset.class_names.name(code).unwrap_or_default().to_string(),
                count,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;
    use crate::domain::frame::Frame;
    use std::path::Path;

    fn config(dir: &Path, data: &Path) -> TrainConfig {
        TrainConfig {
            data_path:     data.display().to_string(),
            artifact_path: dir.join("out").join("model.json").display().to_string(),
            metrics_csv:   Some(dir.join("out").join("metrics.csv").display().to_string()),
            solver:        SolverConfig { max_iter: 300, ..SolverConfig::default() },
            ..TrainConfig::default()
        }
    }

    #[test]
    fn test_trains_and_persists_class_names_in_first_seen_order() {
        let dir  = tempfile::tempdir().unwrap();
        let data = fixtures::write_penguins_csv(dir.path());
        let cfg  = config(dir.path(), &data);

        let summary = TrainUseCase::new(cfg.clone()).execute().unwrap();
        assert_eq!(summary.train_rows + summary.test_rows, fixtures::LABELLED_ROWS);
        assert_eq!(summary.test_rows, 7);
        assert!(summary.test_accuracy.is_some());

        let artifact = ArtifactStore::new(&cfg.artifact_path).load().unwrap();
        assert_eq!(artifact.class_names.as_slice(), &["Adelie", "Chinstrap", "Gentoo"]);
        assert!(artifact.model.pipeline.schema.categorical().any(|c| c.name == "island"));
        assert!(Path::new(cfg.metrics_csv.as_ref().unwrap()).exists());
    }

    #[test]
    fn test_missing_dataset_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path(), &dir.path().join("missing.csv"));

        let err = TrainUseCase::new(cfg.clone()).execute().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TrainError>(),
            Some(TrainError::DatasetNotFound(_))
        ));
        assert!(!Path::new(&cfg.artifact_path).exists());
    }

    #[test]
    fn test_failed_run_keeps_previous_artifact() {
        let dir  = tempfile::tempdir().unwrap();
        let data = fixtures::write_penguins_csv(dir.path());
        let cfg  = config(dir.path(), &data);
        TrainUseCase::new(cfg.clone()).execute().unwrap();
        let before = std::fs::read(&cfg.artifact_path).unwrap();

        let broken = TrainConfig { target: "colour".into(), ..cfg.clone() };
        let err    = TrainUseCase::new(broken).execute().unwrap_err();
        assert!(matches!(err.downcast_ref::<TrainError>(), Some(TrainError::MissingTarget(_))));
        assert_eq!(std::fs::read(&cfg.artifact_path).unwrap(), before);
    }

    #[test]
    fn test_same_seed_same_artifact() {
        let dir  = tempfile::tempdir().unwrap();
        let data = fixtures::write_penguins_csv(dir.path());
        let a    = config(&dir.path().join("a"), &data);
        let b    = config(&dir.path().join("b"), &data);

        TrainUseCase::new(a.clone()).execute().unwrap();
        TrainUseCase::new(b.clone()).execute().unwrap();

        let a = ArtifactStore::new(&a.artifact_path).load().unwrap();
        let b = ArtifactStore::new(&b.artifact_path).load().unwrap();
        assert_eq!(a, b);
    }

    struct InMemory(Frame);

    impl DatasetSource for InMemory {
        fn load(&self) -> Result<Frame> {
            Ok(self.0.clone())
        }

        fn describe(&self) -> String {
            "memory".to_string()
        }
    }

    #[test]
    fn test_single_class_is_rejected() {
        let dir   = tempfile::tempdir().unwrap();
        let frame = crate::data::loader::parse_csv("species,mass\nAdelie,1\nAdelie,2\n".as_bytes()).unwrap();
        let cfg   = config(dir.path(), &dir.path().join("unused.csv"));

        let err = TrainUseCase::new(cfg).execute_with(&InMemory(frame)).unwrap_err();
        assert!(matches!(err.downcast_ref::<TrainError>(), Some(TrainError::TooFewClasses(1))));
    }

    #[test]
    fn test_invalid_test_fraction() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = TrainConfig { test_fraction: 1.5, ..config(dir.path(), dir.path()) };
        assert!(TrainUseCase::new(cfg).execute().is_err());
    }
}
