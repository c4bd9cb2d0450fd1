//! Database connection pool management.

use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;
use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;

/// Database configuration.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

/// Creates a PostgreSQL connection pool with the given configuration.
///
/// The pool is the process-wide handle for every repository; create it once
/// at startup and call [`PgPool::close`] on shutdown.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let options = connect_options(&config.url)?;
    tracing::info!(
        host = options.get_host(),
        ssl_mode = ?options.get_ssl_mode(),
        max_connections = config.max_connections,
        "Connecting to database"
    );

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .connect_with(options)
        .await
}

/// Parses a connection string and selects the transport mode.
///
/// An explicit `sslmode` in the URL always wins. Otherwise local endpoints
/// (loopback, `localhost`, unix sockets) are permissive and everything else
/// requires TLS.
pub fn connect_options(url: &str) -> Result<PgConnectOptions, sqlx::Error> {
    let options = PgConnectOptions::from_str(url)?;
    if has_explicit_ssl_mode(url) {
        return Ok(options);
    }

    let local = options.get_socket().is_some() || is_local_host(options.get_host());
    Ok(options.ssl_mode(transport_mode(local)))
}

/// Transport mode for an endpoint without an explicit `sslmode`.
pub fn transport_mode(local: bool) -> PgSslMode {
    if local {
        PgSslMode::Prefer
    } else {
        PgSslMode::Require
    }
}

/// Whether a host name refers to this machine.
pub fn is_local_host(host: &str) -> bool {
    if host.starts_with('/') || host.eq_ignore_ascii_case("localhost") {
        return true;
    }
    host.trim_start_matches('[')
        .trim_end_matches(']')
        .parse::<IpAddr>()
        .map(|ip| ip.is_loopback())
        .unwrap_or(false)
}

fn has_explicit_ssl_mode(url: &str) -> bool {
    url.split_once('?')
        .map(|(_, query)| {
            query.split('&').any(|pair| {
                let key = pair.split('=').next().unwrap_or_default();
                key.eq_ignore_ascii_case("sslmode") || key.eq_ignore_ascii_case("ssl-mode")
            })
        })
        .unwrap_or(false)
}
