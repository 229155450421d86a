// ============================================================
// Layer 2 — PredictionService
// ============================================================
// Owns the artifact for the life of the process. Loaded once at
// startup and read-only afterwards, so it is shared across
// request handlers behind an Arc with no locking.
//
// Startup never fails because of the artifact: a missing or
// unreadable file puts the service in ModelMissing, where
// /health still answers and every prediction is refused with
// ServiceUnavailable.

use std::path::Path;

use serde::Serialize;

use crate::domain::{
    errors::{PredictError, TransformError},
    feature_record::FeatureRecord,
    labels::ClassNames,
};
use crate::infra::artifact_store::{Artifact, ArtifactError, ArtifactStore};
use crate::ml::pipeline::Pipeline;

// ─── State ────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct LoadedModel {
    pipeline:    Pipeline,
    class_names: ClassNames,
}

#[derive(Debug)]
pub enum ModelState {
    Ready(LoadedModel),
    ModelMissing { reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    Ready,
    ModelMissing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    pub status:       ServiceStatus,
    pub model_loaded: bool,
}

/// One answered prediction request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub class_index:        usize,
    pub species:            String,
    pub probabilities:      Vec<f64>,
    /// `column=value` for each categorical value unseen at training time.
    pub unknown_categories: Vec<String>,
}

// ─── Service ──────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct PredictionService {
    state: ModelState,
}

impl PredictionService {
    /// Load the artifact at `path`, falling back to ModelMissing.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(service) => service,
            Err(e) => {
                tracing::warn!("Starting without a model: {}", e);
                Self::missing(e.to_string())
            }
        }
    }

    /// Load the artifact at `path`, surfacing why it is unusable.
    pub fn try_load(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let store    = ArtifactStore::new(path.as_ref());
        let artifact = store.load()?;
        tracing::info!("Model loaded from '{}'", store.path().display());
        Ok(Self::from_artifact(artifact))
    }

    pub fn from_artifact(artifact: Artifact) -> Self {
        tracing::info!("Classes: {:?}", artifact.class_names.as_slice());
        Self {
            state: ModelState::Ready(LoadedModel {
                pipeline:    artifact.model.pipeline,
                class_names: artifact.class_names,
            }),
        }
    }

    pub fn missing(reason: impl Into<String>) -> Self {
        Self { state: ModelState::ModelMissing { reason: reason.into() } }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, ModelState::Ready(_))
    }

    pub fn health(&self) -> HealthStatus {
        let status = match self.state {
            ModelState::Ready(_)            => ServiceStatus::Ready,
            ModelState::ModelMissing { .. } => ServiceStatus::ModelMissing,
        };
        HealthStatus { status, model_loaded: self.is_ready() }
    }

    /// Run one record through the pipeline and name the winning class.
    pub fn predict(&self, record: &FeatureRecord) -> Result<Prediction, PredictError> {
        let model = match &self.state {
            ModelState::Ready(model) => model,
            ModelState::ModelMissing { reason } => {
                return Err(PredictError::ServiceUnavailable(reason.clone()));
            }
        };

        let row = model
            .pipeline
            .predict(&record.to_frame())?
            .into_iter()
            .next()
            .ok_or(TransformError::EmptyFrame)?;

        let species = model
            .class_names
            .name(row.index)
            .ok_or(TransformError::UnknownClassIndex {
                index: row.index,
                known: model.class_names.len(),
            })?
            .to_string();

        for u in &row.unknown_categories {
            tracing::warn!("Unknown category '{}' in column '{}', encoded as all zeros", u.value, u.column);
        }

        Ok(Prediction {
            class_index:        row.index,
            species,
            probabilities:      row.probabilities,
            unknown_categories: row
                .unknown_categories
                .into_iter()
                .map(|u| format!("{}={}", u.column, u.value))
                .collect(),
        })
    }
}
