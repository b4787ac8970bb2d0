use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::schedule_dto::SaveScheduleRequest;
use crate::models::schedule::ScheduleWithTemplate;
use crate::utils::errors::AppError;

const SELECT_WITH_TEMPLATE: &str = r#"
    SELECT s.id, s.template_id, s.schedule_enabled, s.rule_type, s.rule_value,
           s.frequency_type, s.frequency_interval, s.next_due_date,
           t.name AS template_name, t.category AS template_category,
           t.color AS template_color, t.is_active AS template_is_active
    FROM inspection_schedules s
    JOIN inspection_templates t ON t.id = s.template_id
"#;

pub struct ScheduleRepository {
    pool: PgPool,
}

impl ScheduleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Programaciones habilitadas con su plantilla (entrada del motor).
    /// Las deshabilitadas se filtran aquí: nunca llegan a la expansión.
    pub async fn find_enabled_with_template(&self) -> Result<Vec<ScheduleWithTemplate>, AppError> {
        let query = format!("{} WHERE s.schedule_enabled = TRUE ORDER BY s.created_at", SELECT_WITH_TEMPLATE);

        sqlx::query_as::<_, ScheduleWithTemplate>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Error consultando programaciones: {}", e)))
    }

    pub async fn find_all_with_template(&self) -> Result<Vec<ScheduleWithTemplate>, AppError> {
        let query = format!("{} ORDER BY s.created_at", SELECT_WITH_TEMPLATE);

        sqlx::query_as::<_, ScheduleWithTemplate>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Error listando programaciones: {}", e)))
    }

    pub async fn create(&self, request: &SaveScheduleRequest) -> Result<Uuid, AppError> {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO inspection_schedules
                (id, template_id, schedule_enabled, rule_type, rule_value,
                 frequency_type, frequency_interval, next_due_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(id)
        .bind(request.template_id)
        .bind(request.schedule_enabled)
        .bind(&request.rule_type)
        .bind(&request.rule_value)
        .bind(&request.frequency_type)
        .bind(request.frequency_interval)
        .bind(request.next_due_date)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Error creando programación: {}", e)))?;

        Ok(id)
    }

    pub async fn update(&self, id: Uuid, request: &SaveScheduleRequest) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE inspection_schedules
            SET template_id = $2, schedule_enabled = $3, rule_type = $4, rule_value = $5,
                frequency_type = $6, frequency_interval = $7, next_due_date = $8
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(request.template_id)
        .bind(request.schedule_enabled)
        .bind(&request.rule_type)
        .bind(&request.rule_value)
        .bind(&request.frequency_type)
        .bind(request.frequency_interval)
        .bind(request.next_due_date)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Error actualizando programación: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn find_by_id_with_template(
        &self,
        id: Uuid,
    ) -> Result<Option<ScheduleWithTemplate>, AppError> {
        let query = format!("{} WHERE s.id = $1", SELECT_WITH_TEMPLATE);

        sqlx::query_as::<_, ScheduleWithTemplate>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Error buscando programación: {}", e)))
    }
}
