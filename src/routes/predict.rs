use actix_web::{web, HttpResponse, Responder};
use crate::models::{ErrorResponse, HealthResponse, ModelInfo, PredictionResponse, SleepData};
use crate::services::ModelBundle;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub bundle: Arc<ModelBundle>,
}

impl AppState {
    pub fn new(bundle: ModelBundle) -> Self {
        Self {
            bundle: Arc::new(bundle),
        }
    }
}

/// Configure prediction and health routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/predict/", web::post().to(predict))
        .route("/predict", web::post().to(predict));
}

/// Health check endpoint
///
/// The server only starts once the bundle has loaded, so any response here
/// means the service is ready.
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        model: ModelInfo {
            kind: state.bundle.model_kind().to_string(),
            depth: state.bundle.model_depth(),
            features: state.bundle.feature_names(),
        },
    })
}

/// Predict endpoint
///
/// POST /predict/
///
/// Request body:
/// ```json
/// {
///   "gender": 1,
///   "age": 29,
///   "occupation": 2,
///   "sleep_duration": 6.5,
///   "quality_of_sleep": 5,
///   "physical_activity_level": 40,
///   "stress_level": 7,
///   "bmi_category": 1,
///   "heart_rate": 80
/// }
/// ```
async fn predict(
    state: web::Data<AppState>,
    req: web::Json<SleepData>,
) -> impl Responder {
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("predict", %request_id);
    let _enter = span.enter();

    match state.bundle.predict(&req) {
        Ok(diagnosis) => {
            tracing::info!("Prediction: {}", diagnosis);
            HttpResponse::Ok().json(PredictionResponse {
                prediction: diagnosis.label().to_string(),
            })
        }
        Err(e) => {
            tracing::error!("Prediction failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Prediction failed".to_string(),
                message: format!("Error: {}", e),
                status_code: 500,
            })
        }
    }
}
