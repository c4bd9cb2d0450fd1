//! Health check endpoint handlers.

use axum::{extract::State, http::StatusCode, Json};
use persistence::schema::MIGRATIONS;
use serde::Serialize;

use crate::app::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: DatabaseHealth,
    pub schema: SchemaHealth,
}

/// Database health status.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseHealth {
    pub connected: bool,
    pub latency_ms: Option<u64>,
}

/// Schema migration status.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SchemaHealth {
    /// Migrations this build knows about.
    pub known_migrations: usize,
    /// Migrations recorded in the database, if it could be read.
    pub applied_migrations: Option<usize>,
}

impl SchemaHealth {
    fn is_current(&self) -> bool {
        self.applied_migrations
            .is_some_and(|applied| applied >= self.known_migrations)
    }
}

/// Simple status response for liveness/readiness probes.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

/// Full health check endpoint.
///
/// Reports database connectivity and whether every known migration is
/// recorded. Also refreshes the connection pool gauges.
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, StatusCode> {
    let start = std::time::Instant::now();
    let db_connected = sqlx::query("SELECT 1").execute(&state.pool).await.is_ok();
    let latency_ms = start.elapsed().as_millis() as u64;

    persistence::metrics::record_pool_metrics(&state.pool);

    let schema = SchemaHealth {
        known_migrations: MIGRATIONS.len(),
        applied_migrations: state.schema.applied().await.ok().map(|ids| ids.len()),
    };

    let healthy = db_connected && schema.is_current();
    let response = HealthResponse {
        status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: DatabaseHealth {
            connected: db_connected,
            latency_ms: db_connected.then_some(latency_ms),
        },
        schema,
    };

    if healthy {
        Ok(Json(response))
    } else {
        tracing::warn!(?response, "Health check failed");
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}

/// Liveness probe endpoint.
///
/// Returns 200 OK if the process is running.
pub async fn live() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "alive".to_string(),
    })
}

/// Readiness probe endpoint.
///
/// Returns 200 OK if the service can accept traffic (database connected).
pub async fn ready(State(state): State<AppState>) -> Result<Json<StatusResponse>, StatusCode> {
    let db_connected = sqlx::query("SELECT 1").execute(&state.pool).await.is_ok();

    if db_connected {
        Ok(Json(StatusResponse {
            status: "ready".to_string(),
        }))
    } else {
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}
