//! Rutas de /api/inspection-schedules
//!
//! Lado de lectura (vista expandida), lado de escritura (lotes
//! IGNORE/RESTORE) y la superficie de ajustes bajo /rules.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::HeaderMap,
    routing::{get, put},
    Json, Router,
};
use chrono::Utc;
use uuid::Uuid;

use crate::controllers::inspection_schedule_controller::InspectionScheduleController;
use crate::controllers::schedule_rules_controller::ScheduleRulesController;
use crate::dto::common::{ApiResponse, ListResponse};
use crate::dto::schedule_dto::{
    SaveScheduleRequest, ScheduleAction, ScheduleActionRequest, ScheduleResponse,
    ScheduledInspectionItem,
};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::authenticate;

pub fn create_inspection_schedule_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_scheduled_inspections).post(apply_schedule_action))
        .route("/rules", get(list_schedule_rules).post(create_schedule_rule))
        .route("/rules/:id", put(update_schedule_rule))
}

/// GET / - expansión de obligaciones en la ventana de observación
async fn list_scheduled_inspections(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ListResponse<ScheduledInspectionItem>>, AppError> {
    authenticate(&headers, &state.config)?;

    let controller = InspectionScheduleController::new(state.pool.clone());
    let items = controller.list_scheduled(Utc::now()).await?;

    Ok(Json(ListResponse::new(items)))
}

/// POST / - lote IGNORE/RESTORE sobre slots expandidos
async fn apply_schedule_action(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ApiResponse<()>>, AppError> {
    // El lado de escritura exige además un claim userId utilizable. La
    // autenticación va antes de interpretar el body: un body malformado
    // sin credenciales responde 401, no 400.
    let user_id = authenticate(&headers, &state.config)?.user_uuid()?;

    let request: ScheduleActionRequest = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {}", e)))?;

    let action = request.action.clone();
    let items = request.into_items();

    let Some(action) = action else {
        return Err(AppError::BadRequest("Missing parameters".to_string()));
    };
    if items.is_empty() {
        return Err(AppError::BadRequest("Missing parameters".to_string()));
    }
    let action = ScheduleAction::parse(&action)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown action '{}'", action)))?;

    let controller = InspectionScheduleController::new(state.pool.clone());
    controller.apply_actions(user_id, action, items).await?;

    Ok(Json(ApiResponse::ok()))
}

/// GET /rules - listado de programaciones (ajustes)
async fn list_schedule_rules(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ListResponse<ScheduleResponse>>, AppError> {
    authenticate(&headers, &state.config)?;

    let controller = ScheduleRulesController::new(state.pool.clone());
    let schedules = controller.list().await?;

    Ok(Json(ListResponse::new(schedules)))
}

/// POST /rules - alta de una programación
async fn create_schedule_rule(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<SaveScheduleRequest>,
) -> Result<Json<ApiResponse<ScheduleResponse>>, AppError> {
    authenticate(&headers, &state.config)?;

    let controller = ScheduleRulesController::new(state.pool.clone());
    let schedule = controller.create(request).await?;

    Ok(Json(ApiResponse::success(schedule)))
}

/// PUT /rules/:id - edición de una programación
async fn update_schedule_rule(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(request): Json<SaveScheduleRequest>,
) -> Result<Json<ApiResponse<ScheduleResponse>>, AppError> {
    authenticate(&headers, &state.config)?;

    let controller = ScheduleRulesController::new(state.pool.clone());
    let schedule = controller.update(id, request).await?;

    Ok(Json(ApiResponse::success(schedule)))
}
