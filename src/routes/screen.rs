use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::core::Screener;
use crate::models::{ErrorResponse, HealthResponse, ScreenRequest, ScreenResponse};
use crate::services::CatalogStore;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub screener: Arc<Screener>,
    pub catalog: Arc<dyn CatalogStore>,
}

/// Configure all screening routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/screen", web::post().to(screen_products));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let catalog_healthy = state.catalog.health_check().await.is_ok();

    let status = if catalog_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Screen the catalog for one traveler
///
/// POST /api/v1/screen
///
/// Request body:
/// ```json
/// {
///   "hardConstraints": { "country": "IT", "age": 35, ... },
///   "softPreferences": { "preferenceText": "quiet lagoon tours", ... },
///   "topN": 5
/// }
/// ```
async fn screen_products(
    state: web::Data<AppState>,
    req: web::Json<ScreenRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for screen request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let top_n = req
        .top_n
        .map(usize::from)
        .unwrap_or_else(|| state.screener.default_top_n());

    tracing::info!("Screening products, top_n: {}", top_n);

    match state
        .screener
        .screen(&req.hard_constraints, &req.soft_preferences, top_n)
        .await
    {
        Ok(outcome) => {
            tracing::info!(
                "Returning {} products (catalog size {})",
                outcome.products.len(),
                outcome.counts.initial
            );
            let total_results = outcome.products.len();
            HttpResponse::Ok().json(ScreenResponse {
                products: outcome.products,
                counts: outcome.counts,
                total_results,
            })
        }
        Err(e) => {
            tracing::error!("Screening pipeline failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Screening failed".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}
