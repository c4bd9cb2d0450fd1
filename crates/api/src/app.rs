use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use persistence::repositories::CheckinRepository;
use persistence::SchemaManager;
use sqlx::PgPool;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, trace_id};
use crate::routes::{checkins, health};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub checkins: CheckinRepository,
    pub schema: SchemaManager,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let state = AppState {
        checkins: CheckinRepository::new(pool.clone()),
        schema: SchemaManager::new(pool.clone()),
        pool,
    };

    let cors = cors_layer(&config.security.cors_origins);

    // Guest-facing routes; lock codes only leave through the gate
    let guest_routes = Router::new()
        .route("/api/v1/checkins", post(checkins::create_checkin))
        .route("/api/v1/checkins/:id", get(checkins::get_checkin))
        .route(
            "/api/v1/apartments/:apartment_id/bookings/:booking_token",
            get(checkins::get_booking_checkin),
        );

    // Staff routes
    let staff_routes = Router::new()
        .route(
            "/api/v1/apartments/:apartment_id/checkins",
            get(checkins::list_apartment_checkins),
        )
        .route("/api/v1/arrivals", get(checkins::list_arrivals))
        .route("/api/v1/checkins/:id/lock", put(checkins::set_lock_access));

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(guest_routes)
        .merge(staff_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}

/// Any origin when none are configured, otherwise only the listed ones.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins.iter().filter_map(|o| o.parse().ok()))
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}
