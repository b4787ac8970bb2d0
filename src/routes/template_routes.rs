use axum::{extract::State, http::HeaderMap, routing::get, Json, Router};

use crate::controllers::fleet_controller::FleetController;
use crate::dto::common::ListResponse;
use crate::dto::template_dto::TemplateResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::authenticate;

pub fn create_template_router() -> Router<AppState> {
    Router::new().route("/", get(list_templates))
}

/// GET / - plantillas de inspección
async fn list_templates(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ListResponse<TemplateResponse>>, AppError> {
    authenticate(&headers, &state.config)?;

    let controller = FleetController::new(state.pool.clone());
    let templates = controller.list_templates().await?;

    Ok(Json(ListResponse::new(templates)))
}
