use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::inspection::{InspectionSlot, InspectionStatus};
use crate::utils::errors::AppError;

// Fila mínima para decidir entre crear y actualizar en un IGNORE
#[derive(Debug, sqlx::FromRow)]
pub struct ExistingInspection {
    pub id: Uuid,
    pub status: String,
}

pub struct InspectionRepository {
    pool: PgPool,
}

impl InspectionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inspecciones con fecha programada dentro de la ventana de observación
    pub async fn find_scheduled_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<InspectionSlot>, AppError> {
        sqlx::query_as::<_, InspectionSlot>(
            r#"
            SELECT vehicle_id, inspection_template_id, scheduled_date, status
            FROM inspections
            WHERE scheduled_date >= $1 AND scheduled_date <= $2
            ORDER BY created_at
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Error consultando inspecciones: {}", e)))
    }

    /// Primera inspección existente en un slot (vehículo, plantilla, día)
    pub async fn find_in_slot(
        &self,
        vehicle_id: Uuid,
        template_id: Uuid,
        slot_start: DateTime<Utc>,
        slot_end: DateTime<Utc>,
    ) -> Result<Option<ExistingInspection>, AppError> {
        sqlx::query_as::<_, ExistingInspection>(
            r#"
            SELECT id, status
            FROM inspections
            WHERE vehicle_id = $1 AND inspection_template_id = $2
              AND scheduled_date >= $3 AND scheduled_date <= $4
            ORDER BY created_at
            LIMIT 1
            "#,
        )
        .bind(vehicle_id)
        .bind(template_id)
        .bind(slot_start)
        .bind(slot_end)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Error buscando inspección del slot: {}", e)))
    }

    /// Crear el marcador CANCELLED de un slot ignorado. El índice único
    /// parcial sobre (vehículo, plantilla, día) hace el insert idempotente
    /// frente a peticiones IGNORE concurrentes.
    pub async fn create_cancelled(
        &self,
        vehicle_id: Uuid,
        template_id: Uuid,
        user_id: Uuid,
        title: &str,
        scheduled_date: DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO inspections
                (id, vehicle_id, inspection_template_id, user_id, title, status, scheduled_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (vehicle_id, inspection_template_id, (((scheduled_date AT TIME ZONE 'UTC'))::date))
                WHERE status = 'CANCELLED'
                DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(vehicle_id)
        .bind(template_id)
        .bind(user_id)
        .bind(title)
        .bind(InspectionStatus::Cancelled.as_str())
        .bind(scheduled_date)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Error creando inspección ignorada: {}", e)))?;

        Ok(())
    }

    pub async fn mark_cancelled(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE inspections SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(InspectionStatus::Cancelled.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Error cancelando inspección: {}", e)))?;

        Ok(())
    }

    /// Eliminar los marcadores CANCELLED de un slot (deshacer un ignore).
    /// No toca inspecciones en otros estados.
    pub async fn delete_cancelled_in_slot(
        &self,
        vehicle_id: Uuid,
        template_id: Uuid,
        slot_start: DateTime<Utc>,
        slot_end: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            DELETE FROM inspections
            WHERE vehicle_id = $1 AND inspection_template_id = $2
              AND scheduled_date >= $3 AND scheduled_date <= $4
              AND status = $5
            "#,
        )
        .bind(vehicle_id)
        .bind(template_id)
        .bind(slot_start)
        .bind(slot_end)
        .bind(InspectionStatus::Cancelled.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Error restaurando slot: {}", e)))?;

        Ok(result.rows_affected())
    }
}
