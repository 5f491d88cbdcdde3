//! Sleep Predict - sleep disorder prediction service
//!
//! Loads a fitted feature scaler and binary classifier once at startup and
//! serves predictions over HTTP. Each request is projected into the fixed
//! training-time column order, normalized, classified and mapped to a label.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{Diagnosis, PredictionError, StandardScaler, FEATURE_COLUMNS};
pub use models::{SleepData, PredictionResponse};
pub use services::{BundleError, ModelBundle};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        assert_eq!(FEATURE_COLUMNS.len(), 9);
        assert_eq!(Diagnosis::SleepDisorder.label(), "Sleep Disorder");
    }
}
