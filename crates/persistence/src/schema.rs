//! Forward-only schema management for the check-in table.
//!
//! Runs once at process start, before any request is served. The baseline
//! table is created first, then every additive step in [`MIGRATIONS`] is
//! applied in order. Steps are idempotent DDL (`IF NOT EXISTS`) and are also
//! recorded in `schema_migrations`, so re-running against an up-to-date
//! database changes nothing.
//!
//! New columns are introduced by appending a step, never by editing the
//! baseline.

use std::collections::HashSet;

use sqlx::{PgConnection, PgPool};
use tracing::{debug, info};

/// Name of the check-in table.
pub const CHECKINS_TABLE: &str = "checkins";

/// Table recording which migration ids have been applied.
pub const MIGRATIONS_TABLE: &str = "schema_migrations";

/// Advisory lock key serializing concurrent startups against one database.
const MIGRATION_LOCK_KEY: i64 = 0x0063_6865_636b_696e;

const BASELINE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS checkins (
    id BIGSERIAL PRIMARY KEY,
    apartment_id TEXT NOT NULL,
    booking_token TEXT NOT NULL,
    full_name TEXT NOT NULL,
    email TEXT NOT NULL,
    phone TEXT NOT NULL,
    arrival_date DATE NOT NULL,
    arrival_time TIME NOT NULL,
    departure_date DATE NOT NULL,
    departure_time TIME NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const TRACKING_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_migrations (
    id TEXT PRIMARY KEY,
    applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

/// A column added by an additive migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    /// SQL type, including any `NOT NULL` constraint.
    pub sql_type: &'static str,
    /// SQL default expression, if any.
    pub default: Option<&'static str>,
}

/// What a migration does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationStep {
    /// Create the check-in table with its baseline columns.
    Baseline,
    /// Add one column to the check-in table.
    AddColumn(ColumnSpec),
}

/// An identified step in the ordered migration list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Migration {
    pub id: &'static str,
    pub step: MigrationStep,
}

/// Every migration, in apply order. Append only.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        id: "0001_baseline",
        step: MigrationStep::Baseline,
    },
    Migration {
        id: "0002_lock_code",
        step: MigrationStep::AddColumn(ColumnSpec {
            name: "lock_code",
            sql_type: "TEXT",
            default: None,
        }),
    },
    Migration {
        id: "0003_lock_visible",
        step: MigrationStep::AddColumn(ColumnSpec {
            name: "lock_visible",
            sql_type: "BOOLEAN NOT NULL",
            default: Some("FALSE"),
        }),
    },
];

/// Schema evolution failure. Always fatal to startup.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("migration step `{step}` failed: {source}")]
    Step {
        step: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("invalid column identifier `{0}`")]
    InvalidIdentifier(String),
}

impl MigrationError {
    fn step(step: impl Into<String>) -> impl FnOnce(sqlx::Error) -> Self {
        let step = step.into();
        move |source| Self::Step { step, source }
    }
}

/// Outcome of [`SchemaManager::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Steps recorded by this run.
    pub newly_applied: Vec<&'static str>,
    /// Steps that a previous run had already recorded.
    pub already_applied: Vec<&'static str>,
}

/// A column as reported by the database catalog.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ColumnInfo {
    pub column_name: String,
    pub data_type: String,
    pub is_nullable: String,
    pub column_default: Option<String>,
}

/// Applies the check-in schema to a database.
#[derive(Clone)]
pub struct SchemaManager {
    pool: PgPool,
}

impl SchemaManager {
    /// Creates a new SchemaManager with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the check-in table with its baseline columns if absent.
    pub async fn ensure_baseline(&self) -> Result<(), MigrationError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(MigrationError::step("0001_baseline"))?;
        apply_step(&mut conn, &MigrationStep::Baseline)
            .await
            .map_err(MigrationError::step("0001_baseline"))
    }

    /// Adds a column to the check-in table if it does not exist yet.
    ///
    /// Safe to call on every startup; a column added by an earlier or
    /// concurrent run is left untouched.
    pub async fn ensure_column(&self, column: &ColumnSpec) -> Result<(), MigrationError> {
        let step = format!("add_column:{}", column.name);
        let sql = add_column_sql(CHECKINS_TABLE, column)?;
        sqlx::query(&sql)
            .execute(&self.pool)
            .await
            .map_err(MigrationError::step(step))?;
        Ok(())
    }

    /// Applies every step in [`MIGRATIONS`], in order, inside one transaction.
    ///
    /// The transaction holds an advisory lock so concurrent startups apply
    /// the list one after another rather than interleaving.
    pub async fn run(&self) -> Result<MigrationReport, MigrationError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(MigrationError::step("begin"))?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(MIGRATION_LOCK_KEY)
            .execute(&mut *tx)
            .await
            .map_err(MigrationError::step("advisory_lock"))?;

        sqlx::query(TRACKING_SQL)
            .execute(&mut *tx)
            .await
            .map_err(MigrationError::step("tracking_table"))?;

        let applied: HashSet<String> = load_applied(&mut tx)
            .await
            .map_err(MigrationError::step("load_applied"))?
            .into_iter()
            .collect();

        let mut report = MigrationReport::default();
        for migration in MIGRATIONS {
            if applied.contains(migration.id) {
                debug!(migration = migration.id, "Migration already applied");
                report.already_applied.push(migration.id);
                continue;
            }

            apply_step(&mut tx, &migration.step)
                .await
                .map_err(MigrationError::step(migration.id))?;

            sqlx::query(
                r#"
                INSERT INTO schema_migrations (id) VALUES ($1)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(migration.id)
            .execute(&mut *tx)
            .await
            .map_err(MigrationError::step(migration.id))?;

            info!(migration = migration.id, "Migration applied");
            report.newly_applied.push(migration.id);
        }

        tx.commit().await.map_err(MigrationError::step("commit"))?;
        Ok(report)
    }

    /// Migration ids recorded as applied, in id order.
    pub async fn applied(&self) -> Result<Vec<String>, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        load_applied(&mut conn).await
    }

    /// Columns of the check-in table, in ordinal order.
    pub async fn columns(&self) -> Result<Vec<ColumnInfo>, sqlx::Error> {
        sqlx::query_as::<_, ColumnInfo>(
            r#"
            SELECT column_name::TEXT AS column_name,
                   data_type::TEXT AS data_type,
                   is_nullable::TEXT AS is_nullable,
                   column_default::TEXT AS column_default
            FROM information_schema.columns
            WHERE table_schema = current_schema() AND table_name = $1
            ORDER BY ordinal_position
            "#,
        )
        .bind(CHECKINS_TABLE)
        .fetch_all(&self.pool)
        .await
    }
}

async fn apply_step(conn: &mut PgConnection, step: &MigrationStep) -> Result<(), sqlx::Error> {
    match step {
        MigrationStep::Baseline => {
            sqlx::query(BASELINE_SQL).execute(&mut *conn).await?;
        }
        MigrationStep::AddColumn(column) => {
            let sql = add_column_sql(CHECKINS_TABLE, column)
                .map_err(|e| sqlx::Error::Configuration(e.to_string().into()))?;
            sqlx::query(&sql).execute(&mut *conn).await?;
        }
    }
    Ok(())
}

async fn load_applied(conn: &mut PgConnection) -> Result<Vec<String>, sqlx::Error> {
    let exists: (bool,) = sqlx::query_as("SELECT to_regclass($1::TEXT) IS NOT NULL")
        .bind(MIGRATIONS_TABLE)
        .fetch_one(&mut *conn)
        .await?;
    if !exists.0 {
        return Ok(Vec::new());
    }

    let rows: Vec<(String,)> = sqlx::query_as("SELECT id FROM schema_migrations ORDER BY id")
        .fetch_all(&mut *conn)
        .await?;
    Ok(rows.into_iter().map(|(id,)| id).collect())
}

/// Builds the idempotent `ALTER TABLE` statement for a column.
///
/// Identifiers are interpolated, so both must be plain SQL identifiers.
pub fn add_column_sql(table: &str, column: &ColumnSpec) -> Result<String, MigrationError> {
    for ident in [table, column.name] {
        if !is_sql_identifier(ident) {
            return Err(MigrationError::InvalidIdentifier(ident.to_string()));
        }
    }

    let mut sql = format!(
        "ALTER TABLE {table} ADD COLUMN IF NOT EXISTS {} {}",
        column.name, column.sql_type
    );
    if let Some(default) = column.default {
        sql.push_str(" DEFAULT ");
        sql.push_str(default);
    }
    Ok(sql)
}

/// Lowercase ASCII identifier, at most 63 bytes (the Postgres limit).
fn is_sql_identifier(ident: &str) -> bool {
    let mut chars = ident.chars();
    let starts_ok = matches!(chars.next(), Some(c) if c.is_ascii_lowercase() || c == '_');
    starts_ok
        && ident.len() <= 63
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}
