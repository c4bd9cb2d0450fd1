//! Database metrics collection.

use metrics::{counter, gauge, histogram};
use sqlx::PgPool;
use std::time::Instant;

/// Record database query duration.
pub fn record_query_duration(query_name: &'static str, duration_secs: f64) {
    histogram!("database_query_duration_seconds", "query" => query_name).record(duration_secs);
}

/// Record database connection pool metrics.
pub fn record_pool_metrics(pool: &PgPool) {
    let size = pool.size() as usize;
    let idle = pool.num_idle();
    let active = size.saturating_sub(idle);

    gauge!("database_connections_active").set(active as f64);
    gauge!("database_connections_idle").set(idle as f64);
    gauge!("database_connections_total").set(size as f64);
}

/// Count a stored check-in submission.
pub fn record_checkin_created() {
    counter!("checkins_created_total").increment(1);
}

/// Count a lock access update, labelled by the resulting visibility.
pub fn record_lock_access_updated(visible: bool) {
    counter!(
        "checkin_lock_access_updates_total",
        "visible" => if visible { "true" } else { "false" }
    )
    .increment(1);
}

/// Times one query and records it on [`QueryTimer::record`].
///
/// ```ignore
/// let timer = QueryTimer::new("get_checkin");
/// let result = sqlx::query_as::<_, CheckinEntity>(...).fetch_optional(&pool).await;
/// timer.record();
/// ```
pub struct QueryTimer {
    query_name: &'static str,
    start: Instant,
}

impl QueryTimer {
    pub fn new(query_name: &'static str) -> Self {
        Self {
            query_name,
            start: Instant::now(),
        }
    }

    /// Record the elapsed duration to metrics.
    pub fn record(self) {
        record_query_duration(self.query_name, self.start.elapsed().as_secs_f64());
    }
}
