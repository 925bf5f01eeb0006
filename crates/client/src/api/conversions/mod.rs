//! Translation between wire records and display types.
//!
//! All mappings are total: a missing field takes a documented default. A
//! field that is present but malformed (a price of `"abc"`, a negative
//! stock) fails the whole translation with a [`ValidationError`] naming the
//! field and the offending value.

mod analytics;
mod customers;
mod orders;
mod products;

pub use analytics::*;
pub use customers::*;
pub use orders::*;
pub use products::*;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use thiserror::Error;
use tillpoint_core::Money;

use super::records::WireNumber;

/// A wire value that cannot be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid value {value:?} for `{field}`")]
pub struct ValidationError {
    /// Field path, e.g. `items[2].price`.
    pub field: String,
    /// The raw value as received.
    pub value: String,
}

impl ValidationError {
    pub(crate) fn new(field: impl Into<String>, value: impl ToString) -> Self {
        Self {
            field: field.into(),
            value: value.to_string(),
        }
    }
}

/// Error produced by the translators.
pub type TranslateError = ValidationError;

/// Monetary field; missing means zero.
pub(crate) fn money(field: &str, value: Option<&WireNumber>) -> Result<Money, ValidationError> {
    Ok(optional_money(field, value)?.unwrap_or(Money::ZERO))
}

/// Monetary field that may be absent (or `null`, or an empty string).
pub(crate) fn optional_money(
    field: &str,
    value: Option<&WireNumber>,
) -> Result<Option<Money>, ValidationError> {
    match value {
        None => Ok(None),
        Some(WireNumber::Int(n)) => Ok(Some(Money::new(Decimal::from(*n)))),
        Some(WireNumber::Float(f)) => Money::try_from_f64(*f)
            .map(Some)
            .map_err(|_| ValidationError::new(field, f)),
        Some(WireNumber::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(WireNumber::Text(s)) => Money::parse(s)
            .map(Some)
            .map_err(|_| ValidationError::new(field, s)),
    }
}

/// Non-negative integral count; missing means zero.
pub(crate) fn count(field: &str, value: Option<&WireNumber>) -> Result<u32, ValidationError> {
    let n = count_u64(field, value)?;
    u32::try_from(n).map_err(|_| ValidationError::new(field, n))
}

/// Non-negative integral count as `u64`; missing means zero.
pub(crate) fn count_u64(field: &str, value: Option<&WireNumber>) -> Result<u64, ValidationError> {
    match value {
        None => Ok(0),
        Some(WireNumber::Int(n)) => u64::try_from(*n).map_err(|_| ValidationError::new(field, n)),
        Some(WireNumber::Float(f)) => {
            if f.is_finite() && *f >= 0.0 && f.fract() == 0.0 {
                Decimal::try_from(*f)
                    .ok()
                    .and_then(|d| d.to_u64())
                    .ok_or_else(|| ValidationError::new(field, f))
            } else {
                Err(ValidationError::new(field, f))
            }
        }
        Some(WireNumber::Text(s)) if s.trim().is_empty() => Ok(0),
        Some(WireNumber::Text(s)) => {
            let trimmed = s.trim();
            trimmed
                .parse::<u64>()
                .ok()
                .or_else(|| {
                    trimmed
                        .parse::<Decimal>()
                        .ok()
                        .filter(|d| d.fract().is_zero())
                        .and_then(|d| d.to_u64())
                })
                .ok_or_else(|| ValidationError::new(field, s))
        }
    }
}

/// Floating-point ratio such as a growth percentage; missing means zero.
pub(crate) fn ratio(field: &str, value: Option<&WireNumber>) -> Result<f64, ValidationError> {
    let parsed = match value {
        None => return Ok(0.0),
        #[allow(clippy::cast_precision_loss)]
        Some(WireNumber::Int(n)) => *n as f64,
        Some(WireNumber::Float(f)) => *f,
        Some(WireNumber::Text(s)) if s.trim().is_empty() => return Ok(0.0),
        Some(WireNumber::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| ValidationError::new(field, s))?,
    };
    if parsed.is_finite() {
        Ok(parsed)
    } else {
        Err(ValidationError::new(field, parsed))
    }
}

/// ISO-8601 timestamp. Naive timestamps are taken as UTC.
pub(crate) fn timestamp(
    field: &str,
    value: Option<&str>,
) -> Result<Option<DateTime<Utc>>, ValidationError> {
    let Some(raw) = value.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(Some(naive.and_utc()));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc()));
    }
    Err(ValidationError::new(field, raw))
}

/// Calendar date, or the date part of a timestamp.
pub(crate) fn date(field: &str, value: Option<&str>) -> Result<Option<NaiveDate>, ValidationError> {
    let Some(raw) = value.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(Some(date));
    }
    Ok(timestamp(field, Some(raw))?.map(|dt| dt.date_naive()))
}

/// Borrow an optional string, treating `None` as empty.
pub(crate) fn text(value: Option<&String>) -> String {
    value.cloned().unwrap_or_default()
}
