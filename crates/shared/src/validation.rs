//! Validation and parsing of the spend-limit profile fields.
//!
//! Both fields are stored as free text in the user-attribute store, so the
//! same parsing is used when an administrator saves them and when the
//! evaluator reads them back.

use rust_decimal::Decimal;
use std::str::FromStr;
use validator::ValidationError;

/// Upper bound for the spend limit period accepted from the admin surface (10 years).
pub const MAX_WINDOW_DAYS: i64 = 3650;

/// Parses a stored maximum spend amount.
///
/// Returns `None` for empty, non-numeric or negative input.
pub fn parse_spend_amount(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .ok()
        .filter(|amount| !amount.is_sign_negative())
}

/// Parses a stored spend limit period.
///
/// Only positive whole numbers of days are accepted.
pub fn parse_window_days(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|days| *days > 0)
}

/// Validates the maximum spend amount submitted by an administrator.
///
/// An empty value is allowed and clears the cap.
pub fn validate_spend_amount(raw: &str) -> Result<(), ValidationError> {
    if raw.trim().is_empty() || parse_spend_amount(raw).is_some() {
        Ok(())
    } else {
        let mut err = ValidationError::new("spend_amount_invalid");
        err.message = Some("Maximum spend amount must be a non-negative number".into());
        Err(err)
    }
}

/// Validates the spend limit period submitted by an administrator.
///
/// Zero is allowed and disables the cap.
pub fn validate_window_days(days: i64) -> Result<(), ValidationError> {
    if (0..=MAX_WINDOW_DAYS).contains(&days) {
        Ok(())
    } else {
        let mut err = ValidationError::new("spend_limit_period_range");
        err.message = Some("Spend limit period must be between 0 and 3650 days".into());
        Err(err)
    }
}
