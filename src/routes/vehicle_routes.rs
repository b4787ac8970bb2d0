use axum::{extract::State, http::HeaderMap, routing::get, Json, Router};

use crate::controllers::fleet_controller::FleetController;
use crate::dto::common::ListResponse;
use crate::dto::vehicle_dto::VehicleResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::authenticate;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new().route("/", get(list_vehicles))
}

/// GET / - flota activa
async fn list_vehicles(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ListResponse<VehicleResponse>>, AppError> {
    authenticate(&headers, &state.config)?;

    let controller = FleetController::new(state.pool.clone());
    let vehicles = controller.list_active_vehicles().await?;

    Ok(Json(ListResponse::new(vehicles)))
}
