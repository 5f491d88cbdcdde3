use serde::Serialize;
use thiserror::Error;
use crate::core::classifier::Classifier;
use crate::core::scaler::StandardScaler;
use crate::models::SleepData;

/// Errors raised while running a single prediction
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("{stage} expected {expected} features, got {actual}")]
    DimensionMismatch {
        stage: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Normalized value for '{column}' is not finite")]
    NonFiniteValue { column: &'static str },

    #[error("Classifier score is not finite")]
    NonFiniteScore,

    #[error("Classifier returned unexpected class {0}")]
    UnexpectedClass(u8),

    #[error("Malformed model: {0}")]
    MalformedModel(String),
}

/// Diagnostic outcome of a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Diagnosis {
    SleepDisorder,
    NoSleepDisorder,
}

impl Diagnosis {
    /// Map a binary classifier output to a diagnosis
    pub fn from_class(class: u8) -> Result<Self, PredictionError> {
        match class {
            1 => Ok(Diagnosis::SleepDisorder),
            0 => Ok(Diagnosis::NoSleepDisorder),
            other => Err(PredictionError::UnexpectedClass(other)),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Diagnosis::SleepDisorder => "Sleep Disorder",
            Diagnosis::NoSleepDisorder => "No Sleep Disorder",
        }
    }
}

impl std::fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Run the full pipeline for one record
///
/// Pipeline:
/// 1. Project the record into `FEATURE_COLUMNS` order
/// 2. Normalize with the fitted scaler
/// 3. Classify the normalized row
/// 4. Map the class to a diagnosis
pub fn predict<C>(
    scaler: &StandardScaler,
    classifier: &C,
    data: &SleepData,
) -> Result<Diagnosis, PredictionError>
where
    C: Classifier + ?Sized,
{
    let row = data.to_feature_row();
    let normalized = scaler.transform(&row)?;
    let class = classifier.predict(&normalized)?;
    Diagnosis::from_class(class)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Classifier that ignores its input and returns a fixed class
    struct FixedClass(u8);

    impl Classifier for FixedClass {
        fn predict(&self, row: &[f64]) -> Result<u8, PredictionError> {
            assert_eq!(row.len(), 9);
            Ok(self.0)
        }
    }

    fn sample() -> SleepData {
        SleepData {
            gender: 1,
            age: 29.0,
            occupation: 2,
            sleep_duration: 6.5,
            quality_of_sleep: 5.0,
            physical_activity_level: 40.0,
            stress_level: 7.0,
            bmi_category: 1,
            heart_rate: 80.0,
        }
    }

    fn identity_scaler() -> StandardScaler {
        StandardScaler::new(vec![0.0; 9], vec![1.0; 9])
    }

    #[test]
    fn test_class_one_is_sleep_disorder() {
        let result = predict(&identity_scaler(), &FixedClass(1), &sample()).unwrap();
        assert_eq!(result, Diagnosis::SleepDisorder);
        assert_eq!(result.label(), "Sleep Disorder");
    }

    #[test]
    fn test_class_zero_is_no_sleep_disorder() {
        let result = predict(&identity_scaler(), &FixedClass(0), &sample()).unwrap();
        assert_eq!(result, Diagnosis::NoSleepDisorder);
        assert_eq!(result.to_string(), "No Sleep Disorder");
    }

    #[test]
    fn test_unexpected_class_is_error() {
        let err = predict(&identity_scaler(), &FixedClass(3), &sample()).unwrap_err();
        assert!(matches!(err, PredictionError::UnexpectedClass(3)));
    }

    #[test]
    fn test_scaler_error_propagates() {
        let narrow = StandardScaler::new(vec![0.0; 4], vec![1.0; 4]);
        let err = predict(&narrow, &FixedClass(1), &sample()).unwrap_err();
        assert!(err.to_string().contains("expected 4 features, got 9"));
    }
}
