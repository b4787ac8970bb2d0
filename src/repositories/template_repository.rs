use sqlx::PgPool;
use uuid::Uuid;

use crate::models::template::InspectionTemplate;
use crate::utils::errors::AppError;

pub struct TemplateRepository {
    pool: PgPool,
}

impl TemplateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> Result<Vec<InspectionTemplate>, AppError> {
        sqlx::query_as::<_, InspectionTemplate>(
            "SELECT id, name, category, color, is_active FROM inspection_templates ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Error listando plantillas: {}", e)))
    }

    pub async fn exists(&self, id: Uuid) -> Result<bool, AppError> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM inspection_templates WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| AppError::Database(format!("Error comprobando plantilla: {}", e)))?;

        Ok(result.0)
    }
}
