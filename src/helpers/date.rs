//! Date helper functions

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Matches day ordinals such as "15th" or "1st"
    static ref ORDINAL_RE: Regex = Regex::new(r"\b(\d{1,2})(st|nd|rd|th)\b").unwrap();
}

/// Calendar formats accepted in post and audit data, tried in order
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// Parse a calendar date string into a sortable date
///
/// # Examples
/// ```ignore
/// parse_calendar_date("June 15, 2023") // -> Some(2023-06-15)
/// parse_calendar_date("2024-01-01")    // -> Some(2024-01-01)
/// ```
pub fn parse_calendar_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.date());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }

    let normalized = ORDINAL_RE.replace_all(s, "$1");
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&normalized, fmt).ok())
}

/// Format a date in full format (like "January 1, 2024")
pub fn full_date(date: &NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Format a date for `<time datetime="...">`
pub fn date_xml(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Human-readable form of a raw date string, falling back to the raw text
pub fn display_date(raw: &str) -> String {
    parse_calendar_date(raw)
        .map(|d| full_date(&d))
        .unwrap_or_else(|| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_iso_and_long_forms() {
        assert_eq!(parse_calendar_date("2024-01-01"), Some(ymd(2024, 1, 1)));
        assert_eq!(parse_calendar_date("2024/02/29"), Some(ymd(2024, 2, 29)));
        assert_eq!(parse_calendar_date("June 15, 2023"), Some(ymd(2023, 6, 15)));
        assert_eq!(parse_calendar_date("Jun 5, 2023"), Some(ymd(2023, 6, 5)));
        assert_eq!(parse_calendar_date("15 June 2023"), Some(ymd(2023, 6, 15)));
        assert_eq!(
            parse_calendar_date("March 22nd, 2023"),
            Some(ymd(2023, 3, 22))
        );
    }

    #[test]
    fn test_parse_timestamps() {
        assert_eq!(
            parse_calendar_date("2023-04-20T10:00:00Z"),
            Some(ymd(2023, 4, 20))
        );
        assert_eq!(
            parse_calendar_date("2023-04-20 08:30:00"),
            Some(ymd(2023, 4, 20))
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_calendar_date(""), None);
        assert_eq!(parse_calendar_date("sometime soon"), None);
        assert_eq!(parse_calendar_date("2023-13-45"), None);
    }

    #[test]
    fn test_display_date() {
        assert_eq!(display_date("2023-06-15"), "June 15, 2023");
        assert_eq!(display_date("not a date"), "not a date");
        assert_eq!(date_xml(&ymd(2023, 6, 5)), "2023-06-05");
    }
}
