use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Estado de una inspección registrada
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InspectionStatus {
    Draft,
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl InspectionStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "DRAFT" => Some(Self::Draft),
            "SCHEDULED" => Some(Self::Scheduled),
            "IN_PROGRESS" => Some(Self::InProgress),
            "COMPLETED" => Some(Self::Completed),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Scheduled => "SCHEDULED",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

/// Proyección mínima de una inspección para la reconciliación:
/// identifica el slot (vehículo, plantilla, fecha) y su estado.
#[derive(Debug, Clone, FromRow)]
pub struct InspectionSlot {
    pub vehicle_id: Uuid,
    pub inspection_template_id: Uuid,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub status: String,
}
