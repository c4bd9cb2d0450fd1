//! Common test utilities for persistence integration tests.
//!
//! These tests run against a real PostgreSQL database named by the
//! `TEST_DATABASE_URL` environment variable. When it is unset the tests
//! return early so the unit suite still runs without a database.

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveTime};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use persistence::SchemaManager;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

/// Connect to the test database and bring its schema up to date.
///
/// Returns `None` when `TEST_DATABASE_URL` is not set.
pub async fn migrated_test_pool() -> Option<PgPool> {
    let database_url = std::env::var("TEST_DATABASE_URL").ok()?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    SchemaManager::new(pool.clone())
        .run()
        .await
        .expect("Failed to migrate test database");

    Some(pool)
}

/// An apartment id no other test uses, so tests can share one database.
pub fn unique_apartment_id() -> String {
    format!("apt-{}", uuid::Uuid::new_v4())
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

/// A valid submission with generated guest details.
pub fn new_checkin(apartment_id: &str, booking_token: &str) -> domain::models::NewCheckin {
    domain::models::NewCheckin {
        apartment_id: apartment_id.to_string(),
        booking_token: booking_token.to_string(),
        full_name: Name().fake(),
        email: SafeEmail().fake(),
        phone: PhoneNumber().fake(),
        arrival_date: date(2024, 6, 1),
        arrival_time: time(15, 0),
        departure_date: date(2024, 6, 3),
        departure_time: time(11, 0),
    }
}

/// Remove every row created for an apartment.
pub async fn cleanup_apartment(pool: &PgPool, apartment_id: &str) {
    sqlx::query("DELETE FROM checkins WHERE apartment_id = $1")
        .bind(apartment_id)
        .execute(pool)
        .await
        .expect("Failed to clean up test check-ins");
}
