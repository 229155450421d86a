// ============================================================
// Layer 6 — Artifact Store
// ============================================================
// The artifact is the only thing the trainer and the inference
// service share. It is one self-contained JSON document:
//
//   {
//     "model": {
//       "format_version": 1,
//       "pipeline":  { schema, transformer, classifier },
//       "training":  { seed, row counts, solver, outcome, ... }
//     },
//     "class_names": ["Adelie", "Chinstrap", "Gentoo"]
//   }
//
// Writes go to a temporary file in the destination directory
// which is then renamed over the target, so a reader sees either
// the old artifact or the new one, never half of one.
//
// Reads check the format version before decoding the rest, then
// check that the pipeline and the class names agree.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::application::train_use_case::SolverConfig;
use crate::domain::labels::ClassNames;
use crate::ml::pipeline::Pipeline;
use crate::ml::trainer::SolverReport;

/// Bump when the JSON layout changes incompatibly.
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Facts about the run that produced an artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub seed:          u64,
    pub train_rows:    usize,
    pub test_rows:     usize,
    pub solver:        SolverConfig,
    pub outcome:       SolverReport,
    pub test_accuracy: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedModel {
    pub format_version: u32,
    pub pipeline:       Pipeline,
    pub training:       TrainingSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub model:       PersistedModel,
    pub class_names: ClassNames,
}

impl Artifact {
    pub fn new(pipeline: Pipeline, class_names: ClassNames, training: TrainingSummary) -> Self {
        Self {
            model: PersistedModel {
                format_version: ARTIFACT_FORMAT_VERSION,
                pipeline,
                training,
            },
            class_names,
        }
    }
}

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact not found at '{}'", .0.display())]
    NotFound(PathBuf),

    #[error("cannot read artifact '{}': {source}", path.display())]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("artifact '{}' is malformed: {source}", path.display())]
    Malformed {
        path:   PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("artifact format version {found} is not supported (expected {expected})")]
    UnsupportedVersion { found: u64, expected: u32 },

    #[error("artifact is inconsistent: {0}")]
    Inconsistent(String),
}

/// Reads and writes the artifact at one path.
pub struct ArtifactStore {
    path: PathBuf,
}

impl ArtifactStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `artifact`, fully replacing any previous one.
    pub fn save(&self, artifact: &Artifact) -> Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create directory '{}'", dir.display()))?;

        let mut tmp = NamedTempFile::new_in(&dir)
            .with_context(|| format!("Cannot create a temporary file in '{}'", dir.display()))?;
        serde_json::to_writer_pretty(&mut tmp, artifact).context("Cannot serialise artifact")?;
        tmp.flush()?;
        tmp.as_file().sync_all().context("Cannot flush artifact to disk")?;

        tmp.persist(&self.path)
            .map_err(|e| e.error)
            .with_context(|| format!("Cannot move artifact into '{}'", self.path.display()))?;

        tracing::info!("Saved artifact to '{}'", self.path.display());
        Ok(())
    }

    /// Read and check the artifact.
    pub fn load(&self) -> Result<Artifact, ArtifactError> {
        let text = fs::read_to_string(&self.path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ArtifactError::NotFound(self.path.clone())
            } else {
                ArtifactError::Io { path: self.path.clone(), source }
            }
        })?;

        let malformed = |source| ArtifactError::Malformed { path: self.path.clone(), source };

        let value: serde_json::Value = serde_json::from_str(&text).map_err(malformed)?;
        if let Some(found) = value.pointer("/model/format_version").and_then(|v| v.as_u64()) {
            if found != u64::from(ARTIFACT_FORMAT_VERSION) {
                return Err(ArtifactError::UnsupportedVersion {
                    found,
                    expected: ARTIFACT_FORMAT_VERSION,
                });
            }
        }

        let artifact: Artifact = serde_json::from_value(value).map_err(malformed)?;
        artifact
            .model
            .pipeline
            .validate(artifact.class_names.len())
            .map_err(ArtifactError::Inconsistent)?;

        tracing::debug!(
            "Loaded artifact '{}' ({} classes)",
            self.path.display(),
            artifact.class_names.len()
        );
        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::frame::{Cell, Frame};
    use crate::domain::schema::FeatureSchema;
    use crate::ml::model::LinearClassifier;
    use crate::ml::transform::ColumnTransformer;

    fn artifact() -> Artifact {
        let mut frame = Frame::new(vec!["mass".into()]);
        frame.push_row(vec![Cell::Number(3000.0)]);
        frame.push_row(vec![Cell::Number(5000.0)]);
        let schema      = FeatureSchema::infer(&frame, "species");
        let transformer = ColumnTransformer::fit(&schema, &frame).unwrap();
        let classifier  = LinearClassifier {
            coefficients: vec![vec![-1.0], vec![1.0]],
            intercepts:   vec![0.0, 0.0],
        };
        let training = TrainingSummary {
            seed:          42,
            train_rows:    2,
            test_rows:     0,
            solver:        SolverConfig::default(),
            outcome:       SolverReport { iterations: 10, converged: true, final_loss: 0.1 },
            test_accuracy: None,
        };
        Artifact::new(
            Pipeline { schema, transformer, classifier },
            ClassNames::new(vec!["Adelie".into(), "Gentoo".into()]),
            training,
        )
    }

    #[test]
    fn test_save_then_load() {
        let dir   = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("nested").join("model.json"));

        store.save(&artifact()).unwrap();
        assert_eq!(store.load().unwrap(), artifact());
    }

    #[test]
    fn test_save_replaces_previous_artifact() {
        let dir   = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("model.json"));
        fs::write(store.path(), "old contents that are much longer than nothing").unwrap();

        store.save(&artifact()).unwrap();
        assert!(store.load().is_ok());
        // only the artifact itself remains, no temp files
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ArtifactStore::new(dir.path().join("model.json")).load().unwrap_err();
        assert!(matches!(err, ArtifactError::NotFound(_)));
    }

    #[test]
    fn test_garbage_is_malformed() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, "\x00\x01 not json").unwrap();

        let err = ArtifactStore::new(&path).load().unwrap_err();
        assert!(matches!(err, ArtifactError::Malformed { .. }));
    }

    #[test]
    fn test_future_version_is_rejected() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let mut value = serde_json::to_value(artifact()).unwrap();
        value["model"]["format_version"] = serde_json::json!(2);
        fs::write(&path, value.to_string()).unwrap();

        let err = ArtifactStore::new(&path).load().unwrap_err();
        assert!(matches!(err, ArtifactError::UnsupportedVersion { found: 2, expected: 1 }));
    }

    #[test]
    fn test_class_names_must_match_classifier() {
        let dir   = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("model.json"));
        let mut bad = artifact();
        bad.class_names = ClassNames::new(vec!["Adelie".into()]);
        store.save(&bad).unwrap();

        assert!(matches!(store.load().unwrap_err(), ArtifactError::Inconsistent(_)));
    }
}
