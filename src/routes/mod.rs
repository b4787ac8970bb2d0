//! Routers de la API

pub mod inspection_schedule_routes;
pub mod template_routes;
pub mod vehicle_routes;

use axum::{response::Json, routing::get, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::middleware::cors::cors_middleware;
use crate::state::AppState;

/// Construir el router completo de la aplicación
pub fn create_app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest(
            "/api/inspection-schedules",
            inspection_schedule_routes::create_inspection_schedule_router(),
        )
        .nest("/api/vehicles", vehicle_routes::create_vehicle_router())
        .nest(
            "/api/inspection-templates",
            template_routes::create_template_router(),
        )
        .layer(cors_middleware())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Endpoint de liveness sin autenticación
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "fleet-inspections",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
