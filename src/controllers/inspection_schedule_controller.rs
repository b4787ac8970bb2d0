//! Orquestación del subsistema de programaciones de inspección
//!
//! Lado de lectura: carga en bloque programaciones, flota e inspecciones y
//! delega la expansión al motor puro. Lado de escritura: aplica lotes
//! IGNORE/RESTORE slot a slot.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::dto::schedule_dto::{ScheduleAction, ScheduleActionItem, ScheduledInspectionItem};
use crate::repositories::inspection_repository::InspectionRepository;
use crate::repositories::schedule_repository::ScheduleRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::recurrence::{self, day_end, day_start, ObservationWindow};
use crate::utils::errors::AppError;

/// Slot ya validado de un elemento del lote de mutación
struct SlotTarget {
    vehicle_id: Uuid,
    template_id: Uuid,
    scheduled_date: DateTime<Utc>,
    day: NaiveDate,
    template_name: Option<String>,
}

impl SlotTarget {
    /// Un elemento sin vehicleId, templateId o dueDate (o con valores que
    /// no se pueden interpretar) se descarta sin abortar el lote.
    fn from_item(item: ScheduleActionItem) -> Option<Self> {
        let vehicle_id: Uuid = item.vehicle_id?.parse().ok()?;
        let template_id: Uuid = item.template_id?.parse().ok()?;
        let scheduled_date = parse_due_date(&item.due_date?)?;

        Some(Self {
            vehicle_id,
            template_id,
            day: scheduled_date.date_naive(),
            scheduled_date,
            template_name: item.template_name,
        })
    }
}

/// Aceptar tanto instantes ISO-8601 completos como fechas sueltas
fn parse_due_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&Utc));
    }
    raw.parse::<NaiveDate>().ok().map(day_start)
}

pub struct InspectionScheduleController {
    schedules: ScheduleRepository,
    vehicles: VehicleRepository,
    inspections: InspectionRepository,
}

impl InspectionScheduleController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            schedules: ScheduleRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool.clone()),
            inspections: InspectionRepository::new(pool),
        }
    }

    /// Vista expandida de obligaciones para la ventana anclada en `now`
    pub async fn list_scheduled(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<ScheduledInspectionItem>, AppError> {
        let window = ObservationWindow::at(now);

        let schedules = self.schedules.find_enabled_with_template().await?;
        let vehicles = self.vehicles.find_active().await?;
        let inspections = self
            .inspections
            .find_scheduled_between(window.start_utc(), window.end_utc())
            .await?;

        Ok(recurrence::expand(now, &schedules, &vehicles, &inspections))
    }

    /// Aplicar un lote IGNORE/RESTORE. Cada elemento se procesa de forma
    /// independiente; los malformados se saltan.
    pub async fn apply_actions(
        &self,
        user_id: Uuid,
        action: ScheduleAction,
        items: Vec<ScheduleActionItem>,
    ) -> Result<(), AppError> {
        for item in items {
            let Some(target) = SlotTarget::from_item(item) else {
                debug!("elemento del lote sin campos requeridos, se salta");
                continue;
            };

            let slot_start = day_start(target.day);
            let slot_end = day_end(target.day);

            match action {
                ScheduleAction::Ignore => {
                    let existing = self
                        .inspections
                        .find_in_slot(target.vehicle_id, target.template_id, slot_start, slot_end)
                        .await?;

                    match existing {
                        Some(inspection) => {
                            self.inspections.mark_cancelled(inspection.id).await?;
                        }
                        None => {
                            let title = format!(
                                "Ignorée - {}",
                                target.template_name.as_deref().unwrap_or("Inspection")
                            );
                            self.inspections
                                .create_cancelled(
                                    target.vehicle_id,
                                    target.template_id,
                                    user_id,
                                    &title,
                                    target.scheduled_date,
                                )
                                .await?;
                        }
                    }
                }
                ScheduleAction::Restore => {
                    self.inspections
                        .delete_cancelled_in_slot(
                            target.vehicle_id,
                            target.template_id,
                            slot_start,
                            slot_end,
                        )
                        .await?;
                }
            }
        }

        Ok(())
    }
}
