use chrono::{Datelike, Months, NaiveDate};

use crate::error::CoreError;

/// Wire format of every stored and transported date.
pub const DATE_FORMAT: &str = "%Y%m%d";

/// Format accepted by the list search box.
pub const SEARCH_DATE_FORMAT: &str = "%d.%m.%Y";

/// Parses an 8-digit `YYYYMMDD` date.
pub fn parse_date(value: &str) -> Result<NaiveDate, CoreError> {
    let value = value.trim();
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoreError::ValidationFailed(format!(
            "date '{}' is not in YYYYMMDD format",
            value
        )));
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|e| {
        CoreError::ValidationFailed(format!("date '{}' is not a calendar date: {}", value, e))
    })
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses a `DD.MM.YYYY` search term, returning `None` for anything else.
pub fn parse_search_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), SEARCH_DATE_FORMAT).ok()
}

pub fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 2, 29).is_some()
}

/// Number of days in `month` of `year`, or `None` for a month outside `1..=12`.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    first
        .checked_add_months(Months::new(1))?
        .pred_opt()
        .map(|last| last.day())
}
