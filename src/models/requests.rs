use serde::{Deserialize, Serialize};
use crate::core::features::FeatureRow;

/// Patient health attributes submitted for a prediction
///
/// All fields are required. Integer fields take JSON integers, numeric fields
/// take any JSON number. Field order in the JSON body does not matter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepData {
    /// 1 for male, 0 for female
    pub gender: i64,
    pub age: f64,
    /// Encoded occupation category
    pub occupation: i64,
    pub sleep_duration: f64,
    pub quality_of_sleep: f64,
    pub physical_activity_level: f64,
    pub stress_level: f64,
    /// 0 = Normal, 1 = Overweight, 2 = Obese
    pub bmi_category: i64,
    pub heart_rate: f64,
}

impl SleepData {
    /// Project the record into the column order the scaler was fitted on
    pub fn to_feature_row(&self) -> FeatureRow {
        [
            self.gender as f64,
            self.age,
            self.occupation as f64,
            self.sleep_duration,
            self.quality_of_sleep,
            self.physical_activity_level,
            self.stress_level,
            self.bmi_category as f64,
            self.heart_rate,
        ]
    }
}
