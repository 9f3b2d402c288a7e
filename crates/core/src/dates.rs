//! Calendar date helpers shared by the query layer and the HTTP routes.
//!
//! Observation dates are stored as ISO `YYYY-MM-DD` text, so string order and
//! date order agree and windows can be pushed down to SQL as plain text.

use time::{macros::format_description, Date, Duration};

/// Length of the trailing window used by the "latest year" queries
pub const TRAILING_WINDOW_DAYS: i64 = 365;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum DateError {
    #[error("'{0}' is not shaped like YYYY-MM-DD")]
    Shape(String),
    #[error("'{value}' is not a valid calendar date: {reason}")]
    Calendar { value: String, reason: String },
}

/// Parse a strict `YYYY-MM-DD` date.
///
/// Four-digit year, two-digit month and day, nothing before or after.
pub fn parse_iso_date(value: &str) -> Result<Date, DateError> {
    let bytes = value.as_bytes();
    let shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return Err(DateError::Shape(value.to_owned()));
    }

    Date::parse(value, format_description!("[year]-[month]-[day]")).map_err(|e| {
        DateError::Calendar {
            value: value.to_owned(),
            reason: e.to_string(),
        }
    })
}

/// Render a date the way the store keeps it.
pub fn format_iso_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// First day of the trailing window ending at `last`, inclusive.
pub fn trailing_year_start(last: Date) -> Date {
    last.checked_sub(Duration::days(TRAILING_WINDOW_DAYS))
        .unwrap_or(Date::MIN)
}

pub fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
