use serde::Serialize;
use uuid::Uuid;

use crate::models::vehicle::Vehicle;

// Response de vehículo para el listado de flota
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleResponse {
    pub id: Uuid,
    pub name: String,
    pub vin: String,
    #[serde(rename = "type")]
    pub vehicle_type: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub group: Option<String>,
    pub labels: Vec<String>,
    pub status: String,
}

impl From<Vehicle> for VehicleResponse {
    fn from(v: Vehicle) -> Self {
        Self {
            id: v.id,
            name: v.name,
            vin: v.vin,
            vehicle_type: v.vehicle_type,
            make: v.make,
            model: v.model,
            year: v.year,
            group: v.vehicle_group,
            labels: v.labels,
            status: v.status,
        }
    }
}
