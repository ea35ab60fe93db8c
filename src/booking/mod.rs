//! Stay arithmetic for bookings.
//!
//! A stay is the half-open date range `[check_in, check_out)`. Its length is
//! counted in whole nights and must be at least one; the price of a stay is
//! the room's nightly rate times that count.
//!
//! Timestamps carry no weight below the day: `2024-01-01T22:00:00Z` to
//! `2024-01-03T08:00:00Z` is two nights, never a fractional count. Partial
//! days are not billed.

use chrono::{DateTime, NaiveDate};
use thiserror::Error;

/// Date format used on the wire and in the `bookings` table
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StayError {
    #[error("Invalid {field} date '{value}'. Expected YYYY-MM-DD")]
    InvalidDate { field: &'static str, value: String },
    #[error("Check-out must be after check-in")]
    InvalidRange,
}

/// A validated stay of at least one night
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stay {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

/// Parse a calendar date. RFC 3339 timestamps are accepted and truncated to
/// their date.
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, StayError> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.date_naive()))
        .map_err(|_| StayError::InvalidDate {
            field,
            value: value.to_string(),
        })
}

impl Stay {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Result<Self, StayError> {
        if (check_out - check_in).num_days() < 1 {
            return Err(StayError::InvalidRange);
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    pub fn parse(check_in: &str, check_out: &str) -> Result<Self, StayError> {
        let check_in = parse_date("checkIn", check_in)?;
        let check_out = parse_date("checkOut", check_out)?;
        Self::new(check_in, check_out)
    }

    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    /// Whole nights between check-in and check-out (always >= 1)
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// Total price at the given nightly rate
    pub fn total_price(&self, nightly_rate: f64) -> f64 {
        nightly_rate * self.nights() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn test_two_night_stay_at_100() {
        let stay = Stay::parse("2024-01-01", "2024-01-03").unwrap();
        assert_eq!(stay.nights(), 2);
        assert_eq!(stay.total_price(100.0), 200.0);
    }

    #[test]
    fn test_same_day_is_rejected() {
        assert_eq!(
            Stay::parse("2024-01-01", "2024-01-01"),
            Err(StayError::InvalidRange)
        );
    }

    #[test]
    fn test_reversed_range_is_rejected() {
        for (check_in, check_out) in [
            ("2024-01-05", "2024-01-04"),
            ("2024-03-01", "2024-02-01"),
            ("2025-01-01", "2024-12-31"),
        ] {
            assert_eq!(
                Stay::parse(check_in, check_out),
                Err(StayError::InvalidRange),
                "{} -> {}",
                check_in,
                check_out
            );
        }
    }

    #[test]
    fn test_price_is_rate_times_nights_across_month_and_leap_day() {
        let stay = Stay::new(date("2024-02-27"), date("2024-03-02")).unwrap();
        assert_eq!(stay.nights(), 4);
        assert_eq!(stay.total_price(89.5), 358.0);
    }

    #[test]
    fn test_rfc3339_timestamps_truncate_to_dates() {
        let stay = Stay::parse("2024-01-01T15:00:00Z", "2024-01-02T11:00:00Z").unwrap();
        assert_eq!(stay.check_in(), date("2024-01-01"));
        assert_eq!(stay.check_out(), date("2024-01-02"));
        assert_eq!(stay.nights(), 1);

        // 34 hours across two date boundaries bills two whole nights
        let stay = Stay::parse("2024-01-01T22:00:00Z", "2024-01-03T08:00:00Z").unwrap();
        assert_eq!(stay.nights(), 2);
        assert_eq!(stay.total_price(100.0), 200.0);
    }

    #[test]
    fn test_unparseable_date_names_the_field() {
        let err = Stay::parse("2024-01-01", "next tuesday").unwrap_err();
        assert_eq!(
            err,
            StayError::InvalidDate {
                field: "checkOut",
                value: "next tuesday".to_string()
            }
        );
        assert!(err.to_string().contains("checkOut"));
    }
}
