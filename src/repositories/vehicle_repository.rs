use sqlx::PgPool;

use crate::models::vehicle::{Vehicle, VEHICLE_STATUS_ACTIVE};
use crate::utils::errors::AppError;

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Vehículos ACTIVE; solo estos participan en la expansión.
    pub async fn find_active(&self) -> Result<Vec<Vehicle>, AppError> {
        sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT id, name, vin, vehicle_type, make, model, year,
                   vehicle_group, labels, status
            FROM vehicles
            WHERE status = $1
            ORDER BY name
            "#,
        )
        .bind(VEHICLE_STATUS_ACTIVE)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Error listando vehículos: {}", e)))
    }
}
