//! Check-in repository for database operations.

use chrono::NaiveDate;
use sqlx::PgPool;

use domain::models::{CheckinRecord, NewCheckin};
use shared::validation::non_blank;

use crate::entities::CheckinEntity;
use crate::error::StoreError;
use crate::metrics::{record_checkin_created, record_lock_access_updated, QueryTimer};

/// Repository for check-in records.
///
/// Every method is a single statement, so each mutation is committed before
/// it returns. Resubmitting a booking inserts a new row; lookups by booking
/// return the newest one.
#[derive(Clone)]
pub struct CheckinRepository {
    pool: PgPool,
}

impl CheckinRepository {
    /// Creates a new CheckinRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Validate and insert a new check-in.
    ///
    /// Returns the stored record, including its generated id and `created_at`.
    pub async fn create(&self, new: NewCheckin) -> Result<CheckinRecord, StoreError> {
        let new = new.into_validated()?;

        let timer = QueryTimer::new("create_checkin");
        let result = sqlx::query_as::<_, CheckinEntity>(
            r#"
            INSERT INTO checkins (apartment_id, booking_token, full_name, email, phone,
                                  arrival_date, arrival_time, departure_date, departure_time)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(&new.apartment_id)
        .bind(&new.booking_token)
        .bind(&new.full_name)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(new.arrival_date)
        .bind(new.arrival_time)
        .bind(new.departure_date)
        .bind(new.departure_time)
        .fetch_one(&self.pool)
        .await;
        timer.record();

        let entity = result?;
        record_checkin_created();
        tracing::info!(
            checkin_id = entity.id,
            apartment_id = %entity.apartment_id,
            "Check-in created"
        );
        Ok(entity.into())
    }

    /// Find a check-in by id.
    pub async fn get(&self, id: i64) -> Result<Option<CheckinRecord>, StoreError> {
        let timer = QueryTimer::new("get_checkin");
        let result = sqlx::query_as::<_, CheckinEntity>(
            r#"
            SELECT * FROM checkins WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(result?.map(Into::into))
    }

    /// Find the most recent check-in for a booking at an apartment.
    pub async fn find_by_booking_token(
        &self,
        apartment_id: &str,
        booking_token: &str,
    ) -> Result<Option<CheckinRecord>, StoreError> {
        let timer = QueryTimer::new("find_checkin_by_booking_token");
        let result = sqlx::query_as::<_, CheckinEntity>(
            r#"
            SELECT * FROM checkins
            WHERE apartment_id = $1 AND booking_token = $2
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(apartment_id.trim())
        .bind(booking_token.trim())
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(result?.map(Into::into))
    }

    /// Set the lock code and its visibility on an existing check-in.
    ///
    /// A blank code is stored as absent. Concurrent updates are last write wins.
    pub async fn set_lock_access(
        &self,
        id: i64,
        code: Option<&str>,
        visible: bool,
    ) -> Result<CheckinRecord, StoreError> {
        let code = non_blank(code);

        let timer = QueryTimer::new("set_checkin_lock_access");
        let result = sqlx::query_as::<_, CheckinEntity>(
            r#"
            UPDATE checkins SET
                lock_code = $2,
                lock_visible = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(code.as_deref())
        .bind(visible)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        let entity = result?.ok_or(StoreError::NotFound(id))?;
        record_lock_access_updated(visible);
        tracing::info!(
            checkin_id = id,
            has_code = entity.lock_code.is_some(),
            visible,
            "Lock access updated"
        );
        Ok(entity.into())
    }

    /// List every check-in for an apartment, latest arrival first.
    pub async fn list_by_apartment(
        &self,
        apartment_id: &str,
    ) -> Result<Vec<CheckinRecord>, StoreError> {
        let timer = QueryTimer::new("list_checkins_by_apartment");
        let result = sqlx::query_as::<_, CheckinEntity>(
            r#"
            SELECT * FROM checkins
            WHERE apartment_id = $1
            ORDER BY arrival_date DESC, arrival_time DESC, id DESC
            "#,
        )
        .bind(apartment_id.trim())
        .fetch_all(&self.pool)
        .await;
        timer.record();
        Ok(result?.into_iter().map(Into::into).collect())
    }

    /// List check-ins arriving within an inclusive date window, earliest first.
    pub async fn list_arrivals_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<CheckinRecord>, StoreError> {
        let timer = QueryTimer::new("list_checkin_arrivals");
        let result = sqlx::query_as::<_, CheckinEntity>(
            r#"
            SELECT * FROM checkins
            WHERE arrival_date BETWEEN $1 AND $2
            ORDER BY arrival_date, arrival_time, id
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        Ok(result?.into_iter().map(Into::into).collect())
    }
}
