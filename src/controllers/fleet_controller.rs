//! Listados de apoyo para la interfaz de programación

use sqlx::PgPool;

use crate::dto::template_dto::TemplateResponse;
use crate::dto::vehicle_dto::VehicleResponse;
use crate::repositories::template_repository::TemplateRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::AppError;

pub struct FleetController {
    vehicles: VehicleRepository,
    templates: TemplateRepository,
}

impl FleetController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            vehicles: VehicleRepository::new(pool.clone()),
            templates: TemplateRepository::new(pool),
        }
    }

    pub async fn list_active_vehicles(&self) -> Result<Vec<VehicleResponse>, AppError> {
        let vehicles = self.vehicles.find_active().await?;
        Ok(vehicles.into_iter().map(VehicleResponse::from).collect())
    }

    pub async fn list_templates(&self) -> Result<Vec<TemplateResponse>, AppError> {
        let templates = self.templates.find_all().await?;
        Ok(templates.into_iter().map(TemplateResponse::from).collect())
    }
}
