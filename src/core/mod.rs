// Core inference exports
pub mod classifier;
pub mod features;
pub mod predictor;
pub mod scaler;

pub use classifier::{Classifier, DecisionTree, LogisticRegression, Model, TreeNode};
pub use features::{FeatureRow, FEATURE_COLUMNS, FEATURE_COUNT};
pub use predictor::{predict, Diagnosis, PredictionError};
pub use scaler::StandardScaler;
