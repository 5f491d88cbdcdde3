use serde::{Deserialize, Serialize};
use crate::core::features::FEATURE_COLUMNS;
use crate::core::PredictionError;

/// Fitted standardization transform: z = (x - mean) / scale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Column names recorded at fit time, when the training pipeline exports them
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Self {
        Self {
            feature_names: None,
            mean,
            scale,
        }
    }

    /// Number of features the scaler was fitted on
    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Check the fitted parameters are usable. Returns a description of the
    /// first problem found.
    pub fn check(&self) -> Result<(), String> {
        if self.mean.len() != self.scale.len() {
            return Err(format!(
                "scaler mean has {} entries but scale has {}",
                self.mean.len(),
                self.scale.len()
            ));
        }

        if self.mean.len() != FEATURE_COLUMNS.len() {
            return Err(format!(
                "scaler was fitted on {} features, expected {}",
                self.mean.len(),
                FEATURE_COLUMNS.len()
            ));
        }

        if let Some(i) = self.mean.iter().position(|m| !m.is_finite()) {
            return Err(format!("scaler mean for '{}' is not finite", FEATURE_COLUMNS[i]));
        }

        // A zero scale would divide by zero on every request
        if let Some(i) = self.scale.iter().position(|s| !s.is_finite() || *s == 0.0) {
            return Err(format!(
                "scaler scale for '{}' must be finite and non-zero, got {}",
                FEATURE_COLUMNS[i], self.scale[i]
            ));
        }

        if let Some(names) = &self.feature_names {
            if names.iter().map(String::as_str).ne(FEATURE_COLUMNS.iter().copied()) {
                return Err(format!(
                    "scaler column order {:?} does not match expected {:?}",
                    names, FEATURE_COLUMNS
                ));
            }
        }

        Ok(())
    }

    /// Normalize one row of raw features
    pub fn transform(&self, row: &[f64]) -> Result<Vec<f64>, PredictionError> {
        if row.len() != self.n_features() {
            return Err(PredictionError::DimensionMismatch {
                stage: "scaler",
                expected: self.n_features(),
                actual: row.len(),
            });
        }

        row.iter()
            .zip(self.mean.iter().zip(&self.scale))
            .enumerate()
            .map(|(i, (x, (mean, scale)))| {
                let z = (x - mean) / scale;
                if z.is_finite() {
                    Ok(z)
                } else {
                    Err(PredictionError::NonFiniteValue {
                        column: FEATURE_COLUMNS.get(i).copied().unwrap_or("unknown"),
                    })
                }
            })
            .collect()
    }
}
