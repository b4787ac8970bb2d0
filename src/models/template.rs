use sqlx::FromRow;
use uuid::Uuid;

/// Plantilla de inspección (definición del formulario)
#[derive(Debug, Clone, FromRow)]
pub struct InspectionTemplate {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub color: Option<String>,
    pub is_active: bool,
}
