//! Common validation utilities.

use chrono::NaiveDate;
use validator::ValidationError;

/// Trims surrounding whitespace, returning an owned string.
pub fn trimmed(value: &str) -> String {
    value.trim().to_string()
}

/// Trims an optional value and collapses blank input to `None`.
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Validates that a stay does not end before it starts.
///
/// Same-day stays (departure on the arrival date) are allowed.
pub fn validate_stay_window(
    arrival_date: NaiveDate,
    departure_date: NaiveDate,
) -> Result<(), ValidationError> {
    if departure_date >= arrival_date {
        Ok(())
    } else {
        let mut err = ValidationError::new("stay_window");
        err.message = Some("Departure date must not be before arrival date".into());
        Err(err)
    }
}

/// Validates that a date range query is well formed (`from <= to`).
pub fn validate_date_range(from: NaiveDate, to: NaiveDate) -> Result<(), ValidationError> {
    if from <= to {
        Ok(())
    } else {
        let mut err = ValidationError::new("date_range");
        err.message = Some("Range start must not be after range end".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_trimmed() {
        assert_eq!(trimmed("  Ada Lovelace \t"), "Ada Lovelace");
        assert_eq!(trimmed("   "), "");
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some(" 4821 ")), Some("4821".to_string()));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(Some("")), None);
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn test_validate_stay_window_valid() {
        assert!(validate_stay_window(date(2024, 6, 1), date(2024, 6, 3)).is_ok());
    }

    #[test]
    fn test_validate_stay_window_same_day() {
        assert!(validate_stay_window(date(2024, 6, 1), date(2024, 6, 1)).is_ok());
    }

    #[test]
    fn test_validate_stay_window_reversed() {
        let err = validate_stay_window(date(2024, 6, 5), date(2024, 6, 1)).unwrap_err();
        assert_eq!(err.code, "stay_window");
        assert!(err.message.is_some());
    }

    #[test]
    fn test_validate_date_range() {
        assert!(validate_date_range(date(2024, 6, 1), date(2024, 6, 30)).is_ok());
        assert!(validate_date_range(date(2024, 6, 1), date(2024, 6, 1)).is_ok());
        assert!(validate_date_range(date(2024, 7, 1), date(2024, 6, 1)).is_err());
    }
}
