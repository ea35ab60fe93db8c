//! Input validation for API requests.
//!
//! Catalog write endpoints receive multipart text fields, so most checks take
//! the raw string and return the parsed value or a message for that field.
//!
//! For collecting multiple validation errors and returning them as an ApiError,
//! use the `ValidationErrorBuilder` from the `error` module.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Pragmatic email shape check: local@domain.tld, no whitespace
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[^\s@]+@[^\s@]+\.[^\s@]+$"
    ).unwrap();
}

/// Validate an email address
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email is too long (max 254 characters)".to_string());
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err("Invalid email address".to_string());
    }

    Ok(())
}

/// Validate a required free-text field, returning it trimmed
pub fn validate_text(label: &str, value: &str, max_len: usize) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{} is required", label));
    }
    if trimmed.chars().count() > max_len {
        return Err(format!("{} is too long (max {} characters)", label, max_len));
    }
    Ok(trimmed.to_string())
}

/// Parse a non-negative integer (room counts, occupancy)
pub fn parse_count(label: &str, raw: &str) -> Result<i64, String> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("{} must be a whole number", label))?;
    if value < 0 {
        return Err(format!("{} cannot be negative", label));
    }
    Ok(value)
}

/// Parse a nightly price
pub fn parse_price(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| "Price must be a number".to_string())?;
    if !value.is_finite() {
        return Err("Price must be a number".to_string());
    }
    if value < 0.0 {
        return Err("Price cannot be negative".to_string());
    }
    Ok(value)
}

/// Parse an amenities field: a JSON array of strings. Blank means none.
pub fn parse_amenities(raw: &str) -> Result<Vec<String>, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Vec::new());
    }

    let amenities: Vec<String> = serde_json::from_str(raw)
        .map_err(|_| "Amenities must be a JSON array of strings".to_string())?;

    Ok(amenities
        .into_iter()
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .collect())
}
