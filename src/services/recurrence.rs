//! Motor de expansión de recurrencias
//!
//! Expande las programaciones de inspección habilitadas sobre la flota
//! activa dentro de una ventana de observación fija (30 días atrás a 7 días
//! adelante) y reconcilia cada obligación con las inspecciones ya
//! registradas para marcarla pendiente, completada o ignorada.
//!
//! Todo el módulo es puro: el instante "ahora" entra como parámetro y el
//! reloj de pared nunca se lee dentro de los bucles de expansión.

use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::{DateTime, Duration, Months, NaiveDate, NaiveTime, TimeZone, Utc};
use tracing::warn;
use uuid::Uuid;

use crate::dto::schedule_dto::ScheduledInspectionItem;
use crate::models::inspection::{InspectionSlot, InspectionStatus};
use crate::models::rule::ScheduleRule;
use crate::models::schedule::{FrequencyType, ScheduleWithTemplate};
use crate::models::vehicle::Vehicle;

/// Días hacia atrás para sacar a la superficie obligaciones perdidas
pub const MISSED_WINDOW_DAYS: i64 = 30;
/// Días hacia adelante para las obligaciones próximas
pub const ACTIVE_WINDOW_DAYS: i64 = 7;

/// Ventana de observación anclada en el "hoy" de la petición.
/// Se recalcula por petición; nunca se cachea.
#[derive(Debug, Clone, Copy)]
pub struct ObservationWindow {
    pub today: NaiveDate,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ObservationWindow {
    pub fn at(now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        Self {
            today,
            start: today - Duration::days(MISSED_WINDOW_DAYS),
            end: today + Duration::days(ACTIVE_WINDOW_DAYS),
        }
    }

    /// Último día de la sub-ventana perdida (ayer)
    fn missed_end(&self) -> NaiveDate {
        self.today - Duration::days(1)
    }

    /// Último día de la sub-ventana activa: 7 días contando hoy
    fn active_end(&self) -> NaiveDate {
        self.today + Duration::days(ACTIVE_WINDOW_DAYS - 1)
    }

    fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Límite inferior de la ventana como instante UTC (para la consulta)
    pub fn start_utc(&self) -> DateTime<Utc> {
        day_start(self.start)
    }

    /// Límite superior de la ventana como instante UTC (fin del último día)
    pub fn end_utc(&self) -> DateTime<Utc> {
        day_end(self.end)
    }
}

/// Medianoche UTC de un día calendario
pub fn day_start(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// Último instante del día calendario (23:59:59.999)
pub fn day_end(date: NaiveDate) -> DateTime<Utc> {
    day_start(date + Duration::days(1)) - Duration::milliseconds(1)
}

/// Serie de fechas de `start` a `end` (ambos inclusive) según la frecuencia.
///
/// MONTHLY usa aritmética de meses calendario con recorte: un ancla en día
/// 31 rueda 31 ene → 28/29 feb → 28/29 mar…, sin meses saltados ni
/// duplicados. Las frecuencias no dirigidas por fechas (MILEAGE,
/// desconocida, NULL) no se iteran aquí; ver `schedule_dates`.
fn date_series(
    frequency: FrequencyType,
    interval: u32,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<NaiveDate> {
    let step: Box<dyn Fn(NaiveDate) -> Option<NaiveDate>> = match frequency {
        FrequencyType::Daily => {
            Box::new(move |d| d.checked_add_signed(Duration::days(i64::from(interval))))
        }
        FrequencyType::Weekly => {
            Box::new(move |d| d.checked_add_signed(Duration::days(7 * i64::from(interval))))
        }
        FrequencyType::Monthly => Box::new(move |d| d.checked_add_months(Months::new(interval))),
        FrequencyType::Mileage => return Vec::new(),
    };

    let mut dates = Vec::new();
    let mut current = start;
    while current <= end {
        dates.push(current);
        match step(current) {
            Some(next) if next > current => current = next,
            _ => break,
        }
    }
    dates
}

/// Fechas de vencimiento de una programación dentro de la ventana.
///
/// La sub-ventana perdida se ancla siempre 30 días atrás; la activa en
/// `next_due_date` si existe y es futura, si no en hoy. El resultado se
/// deduplica y se recorta a la ventana de observación, de modo que un
/// ancla en el pasado no puede violar ni los límites ni la unicidad.
fn schedule_dates(schedule: &ScheduleWithTemplate, window: &ObservationWindow) -> Vec<NaiveDate> {
    let interval = schedule
        .frequency_interval
        .filter(|i| *i > 0)
        .unwrap_or(1) as u32;

    let mut dates: BTreeSet<NaiveDate> =
        match FrequencyType::parse(schedule.frequency_type.as_deref()) {
            Some(frequency) if frequency != FrequencyType::Mileage => {
                let missed = date_series(frequency, interval, window.start, window.missed_end());

                let anchor = schedule
                    .next_due_date
                    .map(|d| d.date_naive())
                    .filter(|d| *d > window.today)
                    .unwrap_or(window.today);
                let active = date_series(frequency, interval, anchor, window.active_end());

                missed.into_iter().chain(active).collect()
            }
            // MILEAGE, tipo desconocido o NULL: el vencimiento no lo dirigen
            // las fechas; una única ocurrencia de marcador al inicio de la
            // ventana en lugar de una serie.
            _ => BTreeSet::from([window.start]),
        };

    dates.retain(|d| window.contains(*d));

    // Si no se generó nada pero hay un ancla dentro de la ventana, se usa
    // como única fecha.
    if dates.is_empty() {
        if let Some(next_due) = schedule.next_due_date {
            let d = next_due.date_naive();
            if window.contains(d) {
                dates.insert(d);
            }
        }
    }

    dates.into_iter().collect()
}

/// Expandir las programaciones sobre la flota y reconciliar con las
/// inspecciones registradas. Salida plana, única por
/// `(plantilla, vehículo, día)` y ordenada por fecha ascendente.
pub fn expand(
    now: DateTime<Utc>,
    schedules: &[ScheduleWithTemplate],
    vehicles: &[Vehicle],
    inspections: &[InspectionSlot],
) -> Vec<ScheduledInspectionItem> {
    let window = ObservationWindow::at(now);

    // Índice (vehículo, plantilla, día) -> primer estado registrado.
    // Lineal sobre el prefetch una sola vez; los duplicados benignos del
    // lado de escritura se resuelven aquí quedándose con el primero.
    let mut recorded: HashMap<(Uuid, Uuid, NaiveDate), InspectionStatus> = HashMap::new();
    for inspection in inspections {
        let Some(date) = inspection.scheduled_date else {
            continue;
        };
        let Some(status) = InspectionStatus::parse(&inspection.status) else {
            continue;
        };
        recorded
            .entry((
                inspection.vehicle_id,
                inspection.inspection_template_id,
                date.date_naive(),
            ))
            .or_insert(status);
    }

    let mut seen: HashSet<(Uuid, Uuid, NaiveDate)> = HashSet::new();
    let mut items: Vec<ScheduledInspectionItem> = Vec::new();

    for schedule in schedules {
        if !schedule.schedule_enabled || !schedule.template_is_active {
            continue;
        }

        let rule = match ScheduleRule::parse(&schedule.rule_type, schedule.rule_value.as_deref()) {
            Ok(rule) => rule,
            Err(e) => {
                // Una regla malformada no envenena la vista del resto de la
                // flota: se registra y la programación no aporta nada.
                warn!(schedule_id = %schedule.id, error = %e, "regla de programación inválida, se omite");
                continue;
            }
        };

        let matching: Vec<&Vehicle> = vehicles.iter().filter(|v| rule.matches(v)).collect();
        if matching.is_empty() {
            continue;
        }

        let dates = schedule_dates(schedule, &window);

        for vehicle in &matching {
            for date in &dates {
                if !seen.insert((schedule.template_id, vehicle.id, *date)) {
                    continue;
                }

                let status = recorded
                    .get(&(vehicle.id, schedule.template_id, *date))
                    .copied();

                items.push(ScheduledInspectionItem {
                    schedule_id: schedule.id,
                    template_id: schedule.template_id,
                    template_name: schedule.template_name.clone(),
                    template_category: schedule.template_category.clone(),
                    template_color: schedule.template_color.clone(),
                    vehicle_id: vehicle.id,
                    vehicle_name: vehicle.name.clone(),
                    vehicle_vin: vehicle.vin.clone(),
                    due_date: day_start(*date),
                    frequency_type: schedule.frequency_type.clone(),
                    frequency_interval: schedule.frequency_interval,
                    rule_type: schedule.rule_type.clone(),
                    is_ignored: (status == Some(InspectionStatus::Cancelled)).then_some(true),
                    has_completed: matches!(
                        status,
                        Some(
                            InspectionStatus::Draft
                                | InspectionStatus::Scheduled
                                | InspectionStatus::InProgress
                                | InspectionStatus::Completed
                        )
                    )
                    .then_some(true),
                });
            }
        }
    }

    items.sort_by_key(|item| item.due_date);
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 15, 10, 30, 0).unwrap()
    }

    fn schedule(frequency: Option<&str>, interval: Option<i32>) -> ScheduleWithTemplate {
        ScheduleWithTemplate {
            id: Uuid::new_v4(),
            template_id: Uuid::from_u128(1),
            schedule_enabled: true,
            rule_type: "ALL_VEHICLES".to_string(),
            rule_value: None,
            frequency_type: frequency.map(str::to_string),
            frequency_interval: interval,
            next_due_date: None,
            template_name: "Contrôle".to_string(),
            template_category: "SECURITE".to_string(),
            template_color: None,
            template_is_active: true,
        }
    }

    fn vehicle(name: &str) -> Vehicle {
        Vehicle {
            id: Uuid::new_v4(),
            name: name.to_string(),
            vin: format!("VIN-{}", name),
            vehicle_type: Some("TRUCK".to_string()),
            make: None,
            model: None,
            year: None,
            vehicle_group: Some("Transport".to_string()),
            labels: vec![],
            status: "ACTIVE".to_string(),
        }
    }

    fn inspection(
        vehicle_id: Uuid,
        template_id: Uuid,
        date: DateTime<Utc>,
        status: &str,
    ) -> InspectionSlot {
        InspectionSlot {
            vehicle_id,
            inspection_template_id: template_id,
            scheduled_date: Some(date),
            status: status.to_string(),
        }
    }

    #[test]
    fn window_bounds_hold_for_daily_schedules() {
        let s = schedule(Some("DAILY"), Some(1));
        let v = vehicle("V1");
        let items = expand(now(), &[s], &[v], &[]);

        let window = ObservationWindow::at(now());
        assert!(!items.is_empty());
        for item in &items {
            let day = item.due_date.date_naive();
            assert!(
                day >= window.start && day <= window.end,
                "fuera de ventana: {}",
                day
            );
        }
    }

    #[test]
    fn disabled_schedule_emits_nothing() {
        let mut s = schedule(Some("DAILY"), Some(1));
        s.schedule_enabled = false;
        let items = expand(now(), &[s], &[vehicle("V1")], &[]);
        assert!(items.is_empty());
    }

    #[test]
    fn inactive_template_emits_nothing() {
        let mut s = schedule(Some("DAILY"), Some(1));
        s.template_is_active = false;
        let items = expand(now(), &[s], &[vehicle("V1")], &[]);
        assert!(items.is_empty());
    }

    #[test]
    fn no_duplicate_template_vehicle_day_triples() {
        // Dos programaciones de la misma plantilla generando fechas solapadas
        let s1 = schedule(Some("DAILY"), Some(1));
        let mut s2 = schedule(Some("WEEKLY"), Some(1));
        s2.template_id = s1.template_id;

        let v = vehicle("V1");
        let items = expand(now(), &[s1, s2], &[v], &[]);

        let mut seen = HashSet::new();
        for item in &items {
            assert!(
                seen.insert((item.template_id, item.vehicle_id, item.due_date.date_naive())),
                "triple duplicado en {}",
                item.due_date
            );
        }
    }

    #[test]
    fn weekly_end_to_end_count() {
        // S1 semanal, intervalo 1, ancla hoy: 5 fechas perdidas
        // (floor(30/7)+1) más hoy.
        let mut s = schedule(Some("WEEKLY"), Some(1));
        s.next_due_date = Some(day_start(now().date_naive()));
        let v = vehicle("V1");

        let items = expand(now(), &[s], &[v], &[]);
        assert_eq!(items.len(), 6);

        let today = now().date_naive();
        let days: Vec<NaiveDate> = items.iter().map(|i| i.due_date.date_naive()).collect();
        assert_eq!(
            days,
            vec![
                today - Duration::days(30),
                today - Duration::days(23),
                today - Duration::days(16),
                today - Duration::days(9),
                today - Duration::days(2),
                today,
            ]
        );
    }

    #[test]
    fn future_anchor_shifts_active_dates() {
        let mut s = schedule(Some("WEEKLY"), Some(1));
        s.next_due_date = Some(day_start(now().date_naive() + Duration::days(3)));

        let items = expand(now(), &[s], &[vehicle("V1")], &[]);
        let today = now().date_naive();
        let active: Vec<NaiveDate> = items
            .iter()
            .map(|i| i.due_date.date_naive())
            .filter(|d| *d >= today)
            .collect();
        assert_eq!(active, vec![today + Duration::days(3)]);
    }

    #[test]
    fn mileage_schedule_emits_single_placeholder_per_vehicle() {
        let s = schedule(Some("MILEAGE"), None);
        let v1 = vehicle("V1");
        let v2 = vehicle("V2");

        let items = expand(now(), &[s], &[v1, v2], &[]);
        assert_eq!(items.len(), 2);

        let window = ObservationWindow::at(now());
        for item in &items {
            assert_eq!(item.due_date.date_naive(), window.start);
        }
    }

    #[test]
    fn null_frequency_behaves_like_mileage() {
        let s = schedule(None, None);
        let items = expand(now(), &[s], &[vehicle("V1")], &[]);
        assert_eq!(items.len(), 1);
        assert_eq!(
            items[0].due_date.date_naive(),
            ObservationWindow::at(now()).start
        );
    }

    #[test]
    fn reconciliation_flags_ignored_and_completed() {
        let s = schedule(Some("DAILY"), Some(1));
        let template = s.template_id;
        let v = vehicle("V1");
        let today = now().date_naive();

        // Hora no-medianoche a propósito: la reconciliación es por día
        let inspections = vec![
            inspection(
                v.id,
                template,
                day_start(today) + Duration::hours(14),
                "CANCELLED",
            ),
            inspection(
                v.id,
                template,
                day_start(today - Duration::days(1)) + Duration::hours(9),
                "COMPLETED",
            ),
            inspection(v.id, template, day_start(today - Duration::days(2)), "DRAFT"),
        ];

        let items = expand(now(), &[s], &[v.clone()], &inspections);
        let by_day: HashMap<NaiveDate, &ScheduledInspectionItem> = items
            .iter()
            .map(|i| (i.due_date.date_naive(), i))
            .collect();

        assert_eq!(by_day[&today].is_ignored, Some(true));
        assert_eq!(by_day[&today].has_completed, None);
        assert_eq!(by_day[&(today - Duration::days(1))].has_completed, Some(true));
        assert_eq!(by_day[&(today - Duration::days(1))].is_ignored, None);
        assert_eq!(by_day[&(today - Duration::days(2))].has_completed, Some(true));
        assert_eq!(by_day[&(today - Duration::days(3))].is_ignored, None);
        assert_eq!(by_day[&(today - Duration::days(3))].has_completed, None);
    }

    #[test]
    fn scheduled_status_counts_as_handled() {
        // Cualquier estado no cancelado marca la obligación como atendida;
        // SCHEDULED incluido, aunque la inspección aún no haya ocurrido.
        let s = schedule(Some("DAILY"), Some(1));
        let template = s.template_id;
        let v = vehicle("V1");
        let today = now().date_naive();

        let inspections = vec![inspection(v.id, template, day_start(today), "SCHEDULED")];

        let items = expand(now(), &[s], &[v], &inspections);
        let item = items
            .iter()
            .find(|i| i.due_date.date_naive() == today)
            .unwrap();
        assert_eq!(item.has_completed, Some(true));
        assert_eq!(item.is_ignored, None);
    }

    #[test]
    fn attribute_rule_filters_fleet() {
        let mut s = schedule(Some("DAILY"), Some(1));
        s.rule_type = "BY_ATTRIBUTE".to_string();
        s.rule_value = Some(r#"{"attribute":"group","value":"Transport"}"#.to_string());

        let transport = vehicle("V1");
        let mut livraison = vehicle("V2");
        livraison.vehicle_group = Some("Livraison".to_string());

        let items = expand(now(), &[s], &[transport.clone(), livraison], &[]);
        assert!(!items.is_empty());
        assert!(items.iter().all(|i| i.vehicle_id == transport.id));
    }

    #[test]
    fn malformed_rule_contributes_nothing() {
        let mut s = schedule(Some("DAILY"), Some(1));
        s.rule_type = "BY_ATTRIBUTE".to_string();
        s.rule_value = Some("{json roto".to_string());

        let items = expand(now(), &[s], &[vehicle("V1")], &[]);
        assert!(items.is_empty());
    }

    #[test]
    fn output_is_sorted_ascending() {
        let s1 = schedule(Some("WEEKLY"), Some(1));
        let mut s2 = schedule(Some("DAILY"), Some(3));
        s2.template_id = Uuid::from_u128(2);

        let items = expand(now(), &[s1, s2], &[vehicle("V1")], &[]);
        assert!(items.windows(2).all(|w| w[0].due_date <= w[1].due_date));
    }

    #[test]
    fn monthly_series_rolls_day_31_without_skipping_months() {
        let start = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 12, 31).unwrap();

        let dates = date_series(FrequencyType::Monthly, 1, start, end);
        assert_eq!(dates.len(), 12);

        // Un vencimiento por mes, sin saltos ni duplicados
        let months: Vec<u32> = dates.iter().map(|d| chrono::Datelike::month(d)).collect();
        assert_eq!(months, (1..=12).collect::<Vec<u32>>());

        assert_eq!(dates[1], NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());
        assert_eq!(dates[2], NaiveDate::from_ymd_opt(2026, 3, 28).unwrap());
    }

    #[test]
    fn monthly_interval_respects_multiplier() {
        let start = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 12, 31).unwrap();

        let dates = date_series(FrequencyType::Monthly, 3, start, end);
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
                NaiveDate::from_ymd_opt(2026, 4, 15).unwrap(),
                NaiveDate::from_ymd_opt(2026, 7, 15).unwrap(),
                NaiveDate::from_ymd_opt(2026, 10, 15).unwrap(),
            ]
        );
    }

    #[test]
    fn zero_or_negative_interval_defaults_to_one() {
        let s = schedule(Some("DAILY"), Some(0));
        let items = expand(now(), &[s], &[vehicle("V1")], &[]);
        // 30 días perdidos + 7 activos, paso de 1 día
        assert_eq!(items.len(), 37);
    }

    #[test]
    fn denormalized_fields_are_carried() {
        let mut s = schedule(Some("WEEKLY"), Some(2));
        s.template_color = Some("#ff0000".to_string());
        let v = vehicle("Fourgon 7");

        let items = expand(now(), &[s.clone()], &[v.clone()], &[]);
        let item = &items[0];
        assert_eq!(item.schedule_id, s.id);
        assert_eq!(item.template_name, "Contrôle");
        assert_eq!(item.template_category, "SECURITE");
        assert_eq!(item.template_color.as_deref(), Some("#ff0000"));
        assert_eq!(item.vehicle_name, "Fourgon 7");
        assert_eq!(item.vehicle_vin, "VIN-Fourgon 7");
        assert_eq!(item.frequency_type.as_deref(), Some("WEEKLY"));
        assert_eq!(item.frequency_interval, Some(2));
        assert_eq!(item.rule_type, "ALL_VEHICLES");
    }
}
