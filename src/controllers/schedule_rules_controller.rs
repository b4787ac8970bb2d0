//! Superficie de ajustes: alta y edición de programaciones
//!
//! La validación de reglas ocurre aquí, al guardar: un atributo o tipo de
//! regla desconocido se rechaza con 400 en vez de no casar silenciosamente
//! durante la expansión.

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::schedule_dto::{SaveScheduleRequest, ScheduleResponse};
use crate::models::rule::ScheduleRule;
use crate::models::schedule::{FREQUENCY_TYPES, RULE_TYPES};
use crate::repositories::schedule_repository::ScheduleRepository;
use crate::repositories::template_repository::TemplateRepository;
use crate::utils::errors::AppError;

/// Validación de guardado de una programación
fn validate_save_request(request: &SaveScheduleRequest) -> Result<(), AppError> {
    request.validate()?;

    if !RULE_TYPES.contains(&request.rule_type.as_str()) {
        return Err(AppError::BadRequest(format!(
            "Unknown ruleType '{}'",
            request.rule_type
        )));
    }

    if let Some(frequency) = request.frequency_type.as_deref() {
        if !FREQUENCY_TYPES.contains(&frequency) {
            return Err(AppError::BadRequest(format!(
                "Unknown frequencyType '{}'",
                frequency
            )));
        }
    }

    // Al guardar, un payload de regla que no se puede interpretar es un
    // error del cliente; el motor solo tolera filas heredadas malformadas.
    ScheduleRule::parse(&request.rule_type, request.rule_value.as_deref())
        .map_err(|e| AppError::BadRequest(format!("Invalid rule: {}", e)))?;

    Ok(())
}

pub struct ScheduleRulesController {
    schedules: ScheduleRepository,
    templates: TemplateRepository,
}

impl ScheduleRulesController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            schedules: ScheduleRepository::new(pool.clone()),
            templates: TemplateRepository::new(pool),
        }
    }

    pub async fn list(&self) -> Result<Vec<ScheduleResponse>, AppError> {
        let schedules = self.schedules.find_all_with_template().await?;
        Ok(schedules.into_iter().map(ScheduleResponse::from).collect())
    }

    pub async fn create(&self, request: SaveScheduleRequest) -> Result<ScheduleResponse, AppError> {
        validate_save_request(&request)?;

        if !self.templates.exists(request.template_id).await? {
            return Err(AppError::NotFound("Template not found".to_string()));
        }

        let id = self.schedules.create(&request).await?;
        let created = self
            .schedules
            .find_by_id_with_template(id)
            .await?
            .ok_or_else(|| AppError::Internal("programación recién creada no encontrada".to_string()))?;

        Ok(ScheduleResponse::from(created))
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: SaveScheduleRequest,
    ) -> Result<ScheduleResponse, AppError> {
        validate_save_request(&request)?;

        if !self.templates.exists(request.template_id).await? {
            return Err(AppError::NotFound("Template not found".to_string()));
        }

        if !self.schedules.update(id, &request).await? {
            return Err(AppError::NotFound("Schedule not found".to_string()));
        }

        let updated = self
            .schedules
            .find_by_id_with_template(id)
            .await?
            .ok_or_else(|| AppError::Internal("programación actualizada no encontrada".to_string()))?;

        Ok(ScheduleResponse::from(updated))
    }
}
