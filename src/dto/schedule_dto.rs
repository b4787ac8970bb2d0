use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::schedule::ScheduleWithTemplate;

/// Obligación expandida: una inspección debida para un vehículo en una
/// fecha. Tipo derivado, se recalcula en cada petición y nunca se persiste.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledInspectionItem {
    pub schedule_id: Uuid,
    pub template_id: Uuid,
    pub template_name: String,
    pub template_category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_color: Option<String>,
    pub vehicle_id: Uuid,
    pub vehicle_name: String,
    pub vehicle_vin: String,
    pub due_date: DateTime<Utc>,
    pub frequency_type: Option<String>,
    pub frequency_interval: Option<i32>,
    pub rule_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_ignored: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_completed: Option<bool>,
}

/// Acción del lote de mutación sobre slots expandidos
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleAction {
    Ignore,
    Restore,
}

impl ScheduleAction {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "IGNORE" => Some(Self::Ignore),
            "RESTORE" => Some(Self::Restore),
            _ => None,
        }
    }
}

/// Un elemento del lote: identifica el slot a ignorar/restaurar.
/// Los campos llegan como strings (ids y fecha ISO); un elemento con
/// campos ausentes o malformados se salta sin abortar el lote.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScheduleActionItem {
    pub vehicle_id: Option<String>,
    pub template_id: Option<String>,
    pub due_date: Option<String>,
    pub template_name: Option<String>,
}

/// Body del POST: `{action, items: [...]}` o un único elemento aplanado
/// `{action, vehicleId, templateId, dueDate}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleActionRequest {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub items: Option<Vec<ScheduleActionItem>>,
    #[serde(flatten)]
    pub item: ScheduleActionItem,
}

impl ScheduleActionRequest {
    /// Normalizar al formato de lista: el elemento aplanado se convierte
    /// en un lote de uno.
    pub fn into_items(self) -> Vec<ScheduleActionItem> {
        self.items.unwrap_or_else(|| vec![self.item])
    }
}

/// Request de alta/edición de una programación (superficie de ajustes)
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SaveScheduleRequest {
    pub template_id: Uuid,
    #[serde(default = "default_enabled")]
    pub schedule_enabled: bool,
    pub rule_type: String,
    #[serde(default)]
    pub rule_value: Option<String>,
    #[serde(default)]
    pub frequency_type: Option<String>,
    #[validate(range(min = 1, message = "frequencyInterval must be positive"))]
    #[serde(default)]
    pub frequency_interval: Option<i32>,
    #[serde(default)]
    pub next_due_date: Option<DateTime<Utc>>,
}

fn default_enabled() -> bool {
    true
}

/// Response de programación para la superficie de ajustes
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    pub id: Uuid,
    pub template_id: Uuid,
    pub template_name: String,
    pub schedule_enabled: bool,
    pub rule_type: String,
    pub rule_value: Option<String>,
    pub frequency_type: Option<String>,
    pub frequency_interval: Option<i32>,
    pub next_due_date: Option<DateTime<Utc>>,
}

impl From<ScheduleWithTemplate> for ScheduleResponse {
    fn from(s: ScheduleWithTemplate) -> Self {
        Self {
            id: s.id,
            template_id: s.template_id,
            template_name: s.template_name,
            schedule_enabled: s.schedule_enabled,
            rule_type: s.rule_type,
            rule_value: s.rule_value,
            frequency_type: s.frequency_type,
            frequency_interval: s.frequency_interval,
            next_due_date: s.next_due_date,
        }
    }
}
