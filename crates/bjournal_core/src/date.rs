//! Day keys and date parsing.
//!
//! Every daily log is identified by its *day key*, the `DD.MM.YYYY` rendering
//! of its calendar date. The key doubles as the cache key inside
//! [`LogStore`](crate::store::LogStore) and as the stem of the day's file name
//! (`19.02.2022.yaml`).
//!
//! # Key Functions
//!
//! - [`day_key()`]: Format a date as its day key
//! - [`parse_day_key()`]: Strictly parse a day key back into a date
//! - [`parse_date()`]: Parse user input (day key, ISO, or natural language)
//! - [`day_title()`]: Short `DD.MM Ddd` title used by list panes

use chrono::{Local, NaiveDate};
use chrono_english::{Dialect, parse_date_string};

use crate::error::{JournalError, Result};

const DAY_KEY_FORMAT: &str = "%d.%m.%Y";
const DAY_KEY_LEN: usize = 10;

/// Format a date as its canonical day key (`DD.MM.YYYY`).
pub fn day_key(date: &NaiveDate) -> String {
    date.format(DAY_KEY_FORMAT).to_string()
}

/// Parse a day key. Only the exact `DD.MM.YYYY` shape is accepted; unpadded
/// fields, impossible dates and arbitrary file stems yield `None`.
pub fn parse_day_key(key: &str) -> Option<NaiveDate> {
    if key.len() != DAY_KEY_LEN {
        return None;
    }
    let date = NaiveDate::parse_from_str(key, DAY_KEY_FORMAT).ok()?;
    (day_key(&date) == key).then_some(date)
}

/// Parse a date string into a NaiveDate
/// Supports:
/// - "DD.MM.YYYY" day keys
/// - "YYYY-MM-DD" format
/// - natural language via chrono-english: "today", "yesterday", "last friday", "3 days ago"
pub fn parse_date(date_str: &str) -> Result<NaiveDate> {
    let trimmed = date_str.trim();

    if let Some(date) = parse_day_key(trimmed) {
        return Ok(date);
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }

    parse_date_string(trimmed, Local::now(), Dialect::Uk)
        .map(|dt| dt.date_naive())
        .map_err(|_| JournalError::InvalidDateFormat(date_str.to_string()))
}

/// Title for a day pane, e.g. `19.02 Sat`.
pub fn day_title(date: &NaiveDate) -> String {
    date.format("%d.%m %a").to_string()
}

/// Today's local date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
