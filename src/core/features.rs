/// Number of input features the scaler and classifier operate on
pub const FEATURE_COUNT: usize = 9;

/// Column order used when the scaler was fitted.
///
/// Every row handed to the scaler must follow this order exactly. A reordered
/// row still normalizes without error, it just produces wrong values.
pub const FEATURE_COLUMNS: [&str; FEATURE_COUNT] = [
    "gender",
    "age",
    "occupation",
    "sleep_duration",
    "quality_of_sleep",
    "physical_activity_level",
    "stress_level",
    "bmi_category",
    "heart_rate",
];

/// A single row of raw feature values in `FEATURE_COLUMNS` order
pub type FeatureRow = [f64; FEATURE_COUNT];

/// Position of a named column, if it is one of the expected features
pub fn column_index(name: &str) -> Option<usize> {
    FEATURE_COLUMNS.iter().position(|c| *c == name)
}
