use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Programación recurrente unida a su plantilla (JOIN de lectura del motor)
#[derive(Debug, Clone, FromRow)]
pub struct ScheduleWithTemplate {
    pub id: Uuid,
    pub template_id: Uuid,
    pub schedule_enabled: bool,
    pub rule_type: String,
    pub rule_value: Option<String>,
    pub frequency_type: Option<String>,
    pub frequency_interval: Option<i32>,
    pub next_due_date: Option<DateTime<Utc>>,
    pub template_name: String,
    pub template_category: String,
    pub template_color: Option<String>,
    pub template_is_active: bool,
}

/// Frecuencia de recurrencia de una programación
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrequencyType {
    Daily,
    Weekly,
    Monthly,
    /// Basada en kilometraje: no dirigida por fechas, el motor emite una
    /// única ocurrencia de marcador por ventana.
    Mileage,
}

impl FrequencyType {
    /// Tipos desconocidos (o NULL) devuelven None y se tratan como
    /// no dirigidos por fechas, igual que Mileage.
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        match raw {
            Some("DAILY") => Some(Self::Daily),
            Some("WEEKLY") => Some(Self::Weekly),
            Some("MONTHLY") => Some(Self::Monthly),
            Some("MILEAGE") => Some(Self::Mileage),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Mileage => "MILEAGE",
        }
    }
}

pub const FREQUENCY_TYPES: [&str; 4] = ["DAILY", "WEEKLY", "MONTHLY", "MILEAGE"];
pub const RULE_TYPES: [&str; 3] = ["ALL_VEHICLES", "SPECIFIC_VEHICLE", "BY_ATTRIBUTE"];
