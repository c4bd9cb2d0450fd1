//! Check-in domain model.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::services::lock_access;
use shared::validation::{non_blank, trimmed, validate_date_range, validate_stay_window};

/// One guest's stay window for a booking.
///
/// Intentionally not `Serialize`: anything leaving the service goes through
/// [`GuestCheckinView`] or [`StaffCheckinView`] so the lock code is gated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckinRecord {
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

/// Request payload for a guest check-in submission.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewCheckin {
    #[validate(length(min = 1, message = "Apartment is required"))]
    pub apartment_id: String,

    #[validate(length(min = 1, message = "Booking token is required"))]
    pub booking_token: String,

    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,

    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,

    pub arrival_date: NaiveDate,
    pub arrival_time: NaiveTime,
    pub departure_date: NaiveDate,
    pub departure_time: NaiveTime,
}

impl NewCheckin {
    /// Returns a copy with every text field trimmed.
    pub fn normalized(&self) -> Self {
        Self {
            apartment_id: trimmed(&self.apartment_id),
            booking_token: trimmed(&self.booking_token),
            full_name: trimmed(&self.full_name),
            email: trimmed(&self.email),
            phone: trimmed(&self.phone),
            ..self.clone()
        }
    }

    /// Normalizes and validates the submission.
    ///
    /// Collects every violation rather than stopping at the first one, so a
    /// caller can report all offending fields together.
    pub fn into_validated(self) -> Result<Self, CheckinValidationError> {
        let normalized = self.normalized();

        let mut violations = match normalized.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => FieldViolation::from_errors(&errors),
        };

        if let Err(err) = validate_stay_window(normalized.arrival_date, normalized.departure_date)
        {
            let message = err
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| err.code.to_string());
            for field in ["arrival_date", "departure_date"] {
                violations.push(FieldViolation {
                    field: field.to_string(),
                    message: message.clone(),
                });
            }
        }

        if violations.is_empty() {
            Ok(normalized)
        } else {
            violations.sort_by(|a, b| a.field.cmp(&b.field));
            Err(CheckinValidationError { violations })
        }
    }
}

/// A single rejected field with a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    fn from_errors(errors: &ValidationErrors) -> Vec<Self> {
        errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| FieldViolation {
                    field: field.to_string(),
                    message: e
                        .message
                        .clone()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                })
            })
            .collect()
    }
}

/// A check-in submission violated a required-field or date-ordering rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid check-in: {}", distinct_fields(.violations).join(", "))]
pub struct CheckinValidationError {
    pub violations: Vec<FieldViolation>,
}

fn distinct_fields(violations: &[FieldViolation]) -> Vec<&str> {
    let mut fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
    fields.sort_unstable();
    fields.dedup();
    fields
}

impl CheckinValidationError {
    /// Distinct offending field names, in sorted order.
    pub fn fields(&self) -> Vec<&str> {
        distinct_fields(&self.violations)
    }

    /// Whether the given field was rejected.
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

/// Request payload for a staff lock-access update.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetLockAccessRequest {
    /// New lock code; `null` or blank clears it.
    #[serde(default)]
    pub code: Option<String>,
    pub visible: bool,
}

impl SetLockAccessRequest {
    /// The code as it will be stored (trimmed, blank collapsed to `None`).
    pub fn normalized_code(&self) -> Option<String> {
        non_blank(self.code.as_deref())
    }
}

/// Query parameters for listing arrivals in a date window.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_arrivals_query"))]
pub struct ArrivalsQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

fn validate_arrivals_query(query: &ArrivalsQuery) -> Result<(), validator::ValidationError> {
    validate_date_range(query.from, query.to)
}

/// Guest-facing representation. The lock code only appears once disclosable.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestCheckinView {
    pub id: i64,
    pub apartment_id: String,
    pub booking_token: String,
    pub full_name: String,
    pub arrival_date: NaiveDate,
    pub arrival_time: NaiveTime,
    pub departure_date: NaiveDate,
    pub departure_time: NaiveTime,
    pub lock_code_available: bool,
    pub lock_code: Option<String>,
}

impl From<&CheckinRecord> for GuestCheckinView {
    fn from(record: &CheckinRecord) -> Self {
        let revealed = lock_access::revealed_code(record);
        Self {
            id: record.id,
            apartment_id: record.apartment_id.clone(),
            booking_token: record.booking_token.clone(),
            full_name: record.full_name.clone(),
            arrival_date: record.arrival_date,
            arrival_time: record.arrival_time,
            departure_date: record.departure_date,
            departure_time: record.departure_time,
            lock_code_available: revealed.is_available(),
            lock_code: revealed.code().map(str::to_string),
        }
    }
}

/// Staff/manager representation, including the staged code and its flag.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffCheckinView {
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
    pub disclosable: bool,
    pub created_at: DateTime<Utc>,
}

impl From<CheckinRecord> for StaffCheckinView {
    fn from(record: CheckinRecord) -> Self {
        let disclosable = lock_access::is_disclosable(&record);
        Self {
            id: record.id,
            apartment_id: record.apartment_id,
            booking_token: record.booking_token,
            full_name: record.full_name,
            email: record.email,
            phone: record.phone,
            arrival_date: record.arrival_date,
            arrival_time: record.arrival_time,
            departure_date: record.departure_date,
            departure_time: record.departure_time,
            lock_code: record.lock_code,
            lock_visible: record.lock_visible,
            disclosable,
            created_at: record.created_at,
        }
    }
}

/// Response for listing check-ins.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCheckinsResponse {
    pub checkins: Vec<StaffCheckinView>,
    pub total: usize,
}
