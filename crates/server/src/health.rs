use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use shopassist_core::CatalogHealth;

#[derive(Clone)]
pub struct HealthState {
    catalog: CatalogHealth,
}

impl HealthState {
    pub fn new(catalog: CatalogHealth) -> Self {
        Self { catalog }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub catalog: HealthCheck,
    pub checked_at: String,
}

pub fn router(state: HealthState) -> Router {
    Router::new().route("/health", get(health)).with_state(state)
}

/// Always answers 200: with an empty catalog the handlers still respond, they
/// just never find anything.
pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let catalog = catalog_check(&state.catalog);
    let ready = catalog.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "shopassist action server running".to_string(),
        },
        catalog,
        checked_at: Utc::now().to_rfc3339(),
    };

    (StatusCode::OK, Json(payload))
}

fn catalog_check(health: &CatalogHealth) -> HealthCheck {
    match health {
        CatalogHealth::Healthy { item_count } => {
            HealthCheck { status: "ready", detail: format!("{item_count} products loaded") }
        }
        CatalogHealth::Degraded { reason } => {
            HealthCheck { status: "degraded", detail: format!("catalog unavailable: {reason}") }
        }
    }
}
