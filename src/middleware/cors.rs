//! Middleware de CORS

use tower_http::cors::CorsLayer;

/// CORS permisivo; el frontend y la API viven en orígenes distintos
/// durante el desarrollo.
pub fn cors_middleware() -> CorsLayer {
    CorsLayer::very_permissive()
}
