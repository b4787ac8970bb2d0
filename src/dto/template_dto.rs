use serde::Serialize;
use uuid::Uuid;

use crate::models::template::InspectionTemplate;

// Response de plantilla de inspección
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateResponse {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub is_active: bool,
}

impl From<InspectionTemplate> for TemplateResponse {
    fn from(t: InspectionTemplate) -> Self {
        Self {
            id: t.id,
            name: t.name,
            category: t.category,
            color: t.color,
            is_active: t.is_active,
        }
    }
}
