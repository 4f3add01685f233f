use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use std::sync::Arc;
use tracing::{error, info};

use trip_screener::config::Settings;
use trip_screener::core::Screener;
use trip_screener::routes;
use trip_screener::routes::screen::AppState;
use trip_screener::services::{
    CatalogStore, EmbeddingProvider, Geocoder, HttpEmbeddingClient, PostgresCatalog,
    StaticGeocoder,
};

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .content_type("application/json")
            .body(serde_json::to_string(self).unwrap())
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(
    err: error::JsonPayloadError,
    req: &actix_web::HttpRequest,
) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration; logging is not up yet, so a bad config can only
    // panic with its message
    let settings = Settings::load().unwrap_or_else(|e| panic!("Configuration error: {}", e));

    // Initialize logging; RUST_LOG and LOG_FORMAT override the config file
    let log_format =
        std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.logging.format.clone());
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting Trip Screener service...");
    info!("Configuration loaded successfully");

    // Initialize catalog store
    let db_max_conn = settings.database.max_connections.unwrap_or(10);
    let db_min_conn = settings.database.min_connections.unwrap_or(1);

    let catalog: Arc<dyn CatalogStore> = Arc::new(
        PostgresCatalog::new(
            &settings.database.url,
            settings.database.catalog_table.clone(),
            db_max_conn,
            db_min_conn,
        )
        .await
        .unwrap_or_else(|e| {
            error!("Failed to connect to the catalog store: {}", e);
            panic!("Catalog store connection error: {}", e);
        }),
    );

    info!("Catalog store initialized (max: {} connections)", db_max_conn);

    // Initialize the embedding provider once; all requests share it
    let embeddings: Arc<dyn EmbeddingProvider> = Arc::new(HttpEmbeddingClient::new(
        settings.embedding.endpoint.clone(),
        settings.embedding.api_key.clone(),
        settings.embedding.model.clone(),
        settings.embedding.timeout_secs,
    ));

    info!(
        "Embedding provider initialized (model: {}, timeout: {}s)",
        settings.embedding.model, settings.embedding.timeout_secs
    );

    // Static geocoder with a process-lifetime cache
    let geocoder: Arc<dyn Geocoder> = Arc::new(StaticGeocoder::new());

    let screener = Arc::new(Screener::new(
        Arc::clone(&catalog),
        embeddings,
        geocoder,
        settings.screening,
    ));

    info!(
        "Screener initialized (radius: {}km, exclusion threshold: {}, top: {})",
        settings.screening.proximity_radius_km,
        settings.screening.semantic_exclusion_threshold,
        settings.screening.top_results_count
    );

    // Build application state
    let app_state = AppState { screener, catalog };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
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
