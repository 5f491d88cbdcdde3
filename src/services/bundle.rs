use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use crate::core::{predictor, Diagnosis, Model, PredictionError, StandardScaler, FEATURE_COLUMNS};
use crate::models::SleepData;

/// Errors that can occur while loading the model bundle
#[derive(Debug, Error)]
pub enum BundleError {
    #[error("Failed to read model bundle {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse model bundle: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid model bundle: {0}")]
    Invalid(String),
}

/// Fitted scaler and classifier loaded once at startup
///
/// The bundle is a single JSON document with the scaler under `"scaler"` and
/// the classifier under `"model"`. It is read-only after loading and shared
/// by every request.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelBundle {
    pub scaler: StandardScaler,
    pub model: Model,
}

impl ModelBundle {
    /// Build a bundle from already-fitted parts, checking they fit together
    pub fn new(scaler: StandardScaler, model: Model) -> Result<Self, BundleError> {
        let bundle = Self { scaler, model };
        bundle.validate()?;
        Ok(bundle)
    }

    /// Load and validate a bundle from disk
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self, BundleError> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| BundleError::Io {
                path: path.display().to_string(),
                source,
            })?;

        let bundle = Self::from_json(&contents)?;

        tracing::debug!(
            "Loaded {} model from {} ({} bytes)",
            bundle.model.kind(),
            path.display(),
            contents.len()
        );

        Ok(bundle)
    }

    /// Parse and validate a bundle from its JSON text
    pub fn from_json(json: &str) -> Result<Self, BundleError> {
        let bundle: ModelBundle = serde_json::from_str(json)?;
        bundle.validate()?;
        Ok(bundle)
    }

    fn validate(&self) -> Result<(), BundleError> {
        self.scaler.check().map_err(BundleError::Invalid)?;
        self.model
            .check(self.scaler.n_features())
            .map_err(BundleError::Invalid)
    }

    /// Predict the diagnosis for one record
    pub fn predict(&self, data: &SleepData) -> Result<Diagnosis, PredictionError> {
        predictor::predict(&self.scaler, &self.model, data)
    }

    /// Short name of the classifier type
    pub fn model_kind(&self) -> &'static str {
        self.model.kind()
    }

    /// Tree depth, for tree models
    pub fn model_depth(&self) -> Option<usize> {
        self.model.depth()
    }

    /// Feature columns in the order the bundle expects them
    pub fn feature_names(&self) -> Vec<String> {
        FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect()
    }
}
