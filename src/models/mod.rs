// Model exports
pub mod requests;
pub mod responses;

pub use requests::SleepData;
pub use responses::{ErrorResponse, HealthResponse, ModelInfo, PredictionResponse};
