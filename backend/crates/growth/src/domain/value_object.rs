//! Value Objects
//!
//! Validated form fields for accounts and growth records. Inputs arrive as
//! multipart text, so every constructor takes the raw string.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use crate::error::{GrowthError, GrowthResult};

/// Maximum account name length (in characters)
pub const ACCOUNT_NAME_MAX_LENGTH: usize = 100;

/// Maximum memo length (in characters)
pub const MEMO_MAX_LENGTH: usize = 1000;

/// Wire and storage format for dates
const DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// Account Name
// ============================================================================

/// Display name of an account (child)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AccountName(String);

impl AccountName {
    pub fn new(raw: &str) -> GrowthResult<Self> {
        let name = raw.trim();

        if name.is_empty() {
            return Err(GrowthError::Validation("Name is required".to_string()));
        }
        if name.chars().count() > ACCOUNT_NAME_MAX_LENGTH {
            return Err(GrowthError::Validation(format!(
                "Name must be at most {} characters",
                ACCOUNT_NAME_MAX_LENGTH
            )));
        }
        if name.chars().any(char::is_control) {
            return Err(GrowthError::Validation(
                "Name contains invalid characters".to_string(),
            ));
        }

        Ok(Self(name.to_string()))
    }

    pub fn from_db(name: String) -> Self {
        Self(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Dates
// ============================================================================

/// Parse a `YYYY-MM-DD` date; `field` names the input in the error
pub fn parse_date(field: &str, raw: &str) -> GrowthResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| {
        GrowthError::Validation(format!("{} must be a date in YYYY-MM-DD format", field))
    })
}

// ============================================================================
// Measurement
// ============================================================================

/// Height (cm) or weight (kg): finite and strictly positive
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Measurement(f64);

impl Measurement {
    pub fn new(field: &str, value: f64) -> GrowthResult<Self> {
        if !value.is_finite() || value <= 0.0 {
            return Err(GrowthError::Validation(format!(
                "{} must be a positive number",
                field
            )));
        }
        Ok(Self(value))
    }

    /// Parse from form text
    pub fn parse(field: &str, raw: &str) -> GrowthResult<Self> {
        let value = raw.trim().parse::<f64>().map_err(|_| {
            GrowthError::Validation(format!("{} must be a positive number", field))
        })?;
        Self::new(field, value)
    }

    pub fn from_db(value: f64) -> Self {
        Self(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

// ============================================================================
// Memo
// ============================================================================

/// Free-text note on a record; empty when not given
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Memo(String);

impl Memo {
    pub fn new(raw: Option<&str>) -> GrowthResult<Self> {
        let memo = raw.unwrap_or_default();
        if memo.chars().count() > MEMO_MAX_LENGTH {
            return Err(GrowthError::Validation(format!(
                "Memo must be at most {} characters",
                MEMO_MAX_LENGTH
            )));
        }
        Ok(Self(memo.to_string()))
    }

    pub fn from_db(memo: String) -> Self {
        Self(memo)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_name() {
        assert_eq!(AccountName::new("  たろう ").unwrap().as_str(), "たろう");
        assert!(AccountName::new("   ").is_err());
        assert!(AccountName::new(&"a".repeat(ACCOUNT_NAME_MAX_LENGTH)).is_ok());
        assert!(AccountName::new(&"a".repeat(ACCOUNT_NAME_MAX_LENGTH + 1)).is_err());
        assert!(AccountName::new("ta\u{0000}ro").is_err());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("date", "2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        for raw in ["2023-02-29", "2024/01/01", "01-01-2024", "", "yesterday"] {
            let err = parse_date("date", raw).unwrap_err();
            assert!(matches!(err, GrowthError::Validation(msg) if msg.starts_with("date")));
        }
    }

    #[test]
    fn test_measurement() {
        assert_eq!(Measurement::parse("height", " 98.5 ").unwrap().value(), 98.5);
        for raw in ["0", "-1", "NaN", "inf", "abc", ""] {
            assert!(
                Measurement::parse("weight", raw).is_err(),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_memo() {
        assert_eq!(Memo::new(None).unwrap().as_str(), "");
        assert_eq!(Memo::new(Some("first steps")).unwrap().as_str(), "first steps");
        assert!(Memo::new(Some(&"あ".repeat(MEMO_MAX_LENGTH))).is_ok());
        assert!(Memo::new(Some(&"あ".repeat(MEMO_MAX_LENGTH + 1))).is_err());
    }
}
