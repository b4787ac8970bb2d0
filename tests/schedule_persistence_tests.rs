//! Tests de persistencia del lote IGNORE/RESTORE
//!
//! Ejercitan el ciclo completo contra una base de datos real: ignorar un
//! slot, verlo marcado en la expansión, restaurarlo y comprobar que el
//! marcador desaparece. Requieren `DATABASE_URL`; sin ella cada test
//! retorna sin ejecutar nada. Cada test siembra vehículo, plantilla y
//! programación con ids frescos, así pueden correr sobre una base
//! compartida sin pisarse.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{Duration, NaiveDate, Utc};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use fleet_inspections::config::environment::EnvironmentConfig;
use fleet_inspections::repositories::inspection_repository::InspectionRepository;
use fleet_inspections::routes::create_app_router;
use fleet_inspections::services::recurrence::{day_end, day_start};
use fleet_inspections::state::AppState;
use fleet_inspections::utils::jwt::generate_token;

const JWT_SECRET: &str = "secreto-de-persistencia";

async fn test_pool() -> Option<PgPool> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .ok()?;
    sqlx::migrate!("./migrations").run(&pool).await.ok()?;
    Some(pool)
}

struct Fixture {
    pool: PgPool,
    app: Router,
    vehicle_id: Uuid,
    template_id: Uuid,
}

impl Fixture {
    /// Vehículo + plantilla + programación diaria SPECIFIC_VEHICLE, todo
    /// con ids frescos para aislar el test.
    async fn seed(pool: PgPool) -> Self {
        let vehicle_id = Uuid::new_v4();
        let template_id = Uuid::new_v4();
        let tag = &vehicle_id.to_string()[..8];

        sqlx::query("INSERT INTO vehicles (id, name, vin) VALUES ($1, $2, $3)")
            .bind(vehicle_id)
            .bind(format!("Camion {}", tag))
            .bind(format!("VIN{}", tag))
            .execute(&pool)
            .await
            .unwrap();

        sqlx::query("INSERT INTO inspection_templates (id, name, category) VALUES ($1, $2, $3)")
            .bind(template_id)
            .bind(format!("Contrôle {}", tag))
            .bind("SECURITE")
            .execute(&pool)
            .await
            .unwrap();

        sqlx::query(
            r#"
            INSERT INTO inspection_schedules
                (template_id, rule_type, rule_value, frequency_type, frequency_interval)
            VALUES ($1, 'SPECIFIC_VEHICLE', $2, 'DAILY', 1)
            "#,
        )
        .bind(template_id)
        .bind(vehicle_id.to_string())
        .execute(&pool)
        .await
        .unwrap();

        let config = EnvironmentConfig {
            environment: "test".to_string(),
            port: 0,
            host: "127.0.0.1".to_string(),
            jwt_secret: JWT_SECRET.to_string(),
        };
        let app = create_app_router(AppState::new(pool.clone(), config));

        Self {
            pool,
            app,
            vehicle_id,
            template_id,
        }
    }

    fn bearer(&self) -> String {
        format!(
            "Bearer {}",
            generate_token(Uuid::new_v4(), JWT_SECRET, 3600).expect("token")
        )
    }

    /// Ítem de la expansión para nuestro slot (vehículo, plantilla, día)
    async fn expanded_item(&self, day: NaiveDate) -> Option<Value> {
        let response = self
            .app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/inspection-schedules")
                    .header(header::AUTHORIZATION, self.bearer())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        let prefix = day.format("%Y-%m-%d").to_string();

        body["data"].as_array().unwrap().iter().cloned().find(|item| {
            item["vehicleId"] == self.vehicle_id.to_string()
                && item["templateId"] == self.template_id.to_string()
                && item["dueDate"].as_str().unwrap_or("").starts_with(&prefix)
        })
    }

    async fn post_action(&self, action: &str, due_date: &str) {
        let response = self
            .app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/inspection-schedules")
                    .header(header::AUTHORIZATION, self.bearer())
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({
                            "action": action,
                            "items": [{
                                "vehicleId": self.vehicle_id.to_string(),
                                "templateId": self.template_id.to_string(),
                                "dueDate": due_date,
                                "templateName": "Contrôle"
                            }]
                        })
                        .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    async fn rows_in_slot(&self, day: NaiveDate, status: Option<&str>) -> i64 {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM inspections
            WHERE vehicle_id = $1 AND inspection_template_id = $2
              AND scheduled_date >= $3 AND scheduled_date <= $4
              AND ($5::text IS NULL OR status = $5)
            "#,
        )
        .bind(self.vehicle_id)
        .bind(self.template_id)
        .bind(day_start(day))
        .bind(day_end(day))
        .bind(status)
        .fetch_one(&self.pool)
        .await
        .unwrap();
        count
    }
}

#[tokio::test]
async fn ignore_then_restore_round_trip() {
    let Some(pool) = test_pool().await else { return };
    let fx = Fixture::seed(pool).await;

    let today = Utc::now().date_naive();
    let due = day_start(today).to_rfc3339();

    // Estado inicial: obligación pendiente, sin marcas
    let item = fx.expanded_item(today).await.expect("obligación de hoy");
    assert!(item.get("isIgnored").is_none());
    assert!(item.get("hasCompleted").is_none());

    // IGNORE crea el marcador CANCELLED y la expansión lo refleja
    fx.post_action("IGNORE", &due).await;
    let item = fx.expanded_item(today).await.unwrap();
    assert_eq!(item["isIgnored"], true);
    assert_eq!(fx.rows_in_slot(today, Some("CANCELLED")).await, 1);

    // Un segundo IGNORE sobre el mismo slot no duplica el marcador
    fx.post_action("IGNORE", &due).await;
    assert_eq!(fx.rows_in_slot(today, None).await, 1);

    // RESTORE borra el marcador y la obligación vuelve a pendiente
    fx.post_action("RESTORE", &due).await;
    let item = fx.expanded_item(today).await.unwrap();
    assert!(item.get("isIgnored").is_none());
    assert_eq!(fx.rows_in_slot(today, None).await, 0);
}

#[tokio::test]
async fn concurrent_cancelled_inserts_collapse_to_one_row() {
    let Some(pool) = test_pool().await else { return };
    let fx = Fixture::seed(pool.clone()).await;
    let repo = InspectionRepository::new(pool);

    // Dos inserts del mismo día calendario a horas distintas: el índice
    // único parcial hace el segundo un no-op en vez de un duplicado.
    let today = Utc::now().date_naive();
    let user = Uuid::new_v4();
    repo.create_cancelled(
        fx.vehicle_id,
        fx.template_id,
        user,
        "Ignorée - Contrôle",
        day_start(today) + Duration::hours(8),
    )
    .await
    .unwrap();
    repo.create_cancelled(
        fx.vehicle_id,
        fx.template_id,
        user,
        "Ignorée - Contrôle",
        day_start(today) + Duration::hours(14),
    )
    .await
    .unwrap();

    assert_eq!(fx.rows_in_slot(today, Some("CANCELLED")).await, 1);
}

#[tokio::test]
async fn ignore_marks_preexisting_row_instead_of_inserting() {
    let Some(pool) = test_pool().await else { return };
    let fx = Fixture::seed(pool).await;

    let today = Utc::now().date_naive();
    sqlx::query(
        r#"
        INSERT INTO inspections
            (vehicle_id, inspection_template_id, user_id, title, status, scheduled_date)
        VALUES ($1, $2, $3, 'Contrôle', 'DRAFT', $4)
        "#,
    )
    .bind(fx.vehicle_id)
    .bind(fx.template_id)
    .bind(Uuid::new_v4())
    .bind(day_start(today))
    .execute(&fx.pool)
    .await
    .unwrap();

    fx.post_action("IGNORE", &day_start(today).to_rfc3339()).await;

    // La fila existente cambia a CANCELLED; no se inserta una segunda
    assert_eq!(fx.rows_in_slot(today, None).await, 1);
    assert_eq!(fx.rows_in_slot(today, Some("CANCELLED")).await, 1);
    let item = fx.expanded_item(today).await.unwrap();
    assert_eq!(item["isIgnored"], true);
}

#[tokio::test]
async fn restore_leaves_non_cancelled_rows_alone() {
    let Some(pool) = test_pool().await else { return };
    let fx = Fixture::seed(pool).await;

    let today = Utc::now().date_naive();
    sqlx::query(
        r#"
        INSERT INTO inspections
            (vehicle_id, inspection_template_id, user_id, title, status, scheduled_date)
        VALUES ($1, $2, $3, 'Contrôle', 'COMPLETED', $4)
        "#,
    )
    .bind(fx.vehicle_id)
    .bind(fx.template_id)
    .bind(Uuid::new_v4())
    .bind(day_start(today))
    .execute(&fx.pool)
    .await
    .unwrap();

    fx.post_action("RESTORE", &day_start(today).to_rfc3339()).await;

    // RESTORE solo borra marcadores CANCELLED; la inspección hecha queda
    assert_eq!(fx.rows_in_slot(today, Some("COMPLETED")).await, 1);
    let item = fx.expanded_item(today).await.unwrap();
    assert_eq!(item["hasCompleted"], true);
}
