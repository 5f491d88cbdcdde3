use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use sleep_predict::config::Settings;
use sleep_predict::routes::{self, AppState};
use sleep_predict::services::ModelBundle;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging, LOG_LEVEL / LOG_FORMAT win over the config file
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.logging.format.clone());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&log_level))
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }

    info!("Starting sleep disorder prediction service...");
    info!("Configuration loaded successfully");

    // Load the model bundle; the service never serves without it
    let bundle = match ModelBundle::load(&settings.model.path).await {
        Ok(bundle) => bundle,
        Err(e) => {
            error!("Failed to load model bundle from {}: {}", settings.model.path, e);
            std::process::exit(1);
        }
    };

    info!(
        "Model bundle loaded from {} ({} classifier)",
        settings.model.path,
        bundle.model_kind()
    );

    let app_state = AppState::new(bundle);

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
