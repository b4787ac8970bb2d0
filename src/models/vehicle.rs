use sqlx::FromRow;
use uuid::Uuid;

/// Activo de la flota. Solo los vehículos ACTIVE participan en la expansión.
#[derive(Debug, Clone, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub name: String,
    pub vin: String,
    pub vehicle_type: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub vehicle_group: Option<String>,
    pub labels: Vec<String>,
    pub status: String,
}

pub const VEHICLE_STATUS_ACTIVE: &str = "ACTIVE";
