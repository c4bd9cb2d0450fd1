//! Check-in entity (database row mapping).

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::FromRow;

use domain::models::CheckinRecord;

/// Database row mapping for the checkins table.
#[derive(Debug, Clone, FromRow)]
pub struct CheckinEntity {
    pub id: i64,
    pub apartment_id: String,
    pub booking_token: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub arrival_date: NaiveDate,
    pub arrival_time: NaiveTime,
    pub departure_date: NaiveDate,
    pub departure_time: NaiveTime,
    pub lock_code: Option<String>,
    pub lock_visible: bool,
    pub created_at: DateTime<Utc>,
}

impl From<CheckinEntity> for CheckinRecord {
    fn from(entity: CheckinEntity) -> Self {
        Self {
            id: entity.id,
            apartment_id: entity.apartment_id,
            booking_token: entity.booking_token,
            full_name: entity.full_name,
            email: entity.email,
            phone: entity.phone,
            arrival_date: entity.arrival_date,
            arrival_time: entity.arrival_time,
            departure_date: entity.departure_date,
            departure_time: entity.departure_time,
            lock_code: entity.lock_code,
            lock_visible: entity.lock_visible,
            created_at: entity.created_at,
        }
    }
}
