/// Utilities for date and time formatting
///
/// Wire values come in several shapes (RFC 3339, HTTP dates such as
/// "Mon, 15 Jan 2024 00:00:00 GMT", plain "YYYY-MM-DD", naive date-times with
/// a `T` or a space). Everything is parsed with chrono and rendered in one of
/// the display or `<input>` formats below.
use chrono::{DateTime, NaiveDate, NaiveDateTime};

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse any supported wire date/time. Zoned values are converted to UTC.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.naive_utc());
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Value for an `<input type="date">`: "YYYY-MM-DD", or "" when unparsable
pub fn format_date_input(value: &str) -> String {
    parse_datetime(value)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Value for an `<input type="datetime-local">`: "YYYY-MM-DDTHH:MM", or ""
pub fn format_datetime_input(value: &str) -> String {
    parse_datetime(value)
        .map(|dt| dt.format("%Y-%m-%dT%H:%M").to_string())
        .unwrap_or_default()
}

/// Format a wire date for tables: "DD/MM/YYYY".
/// Empty values become "N/A", unparsable ones are shown as-is.
pub fn format_date(value: &str) -> String {
    if value.trim().is_empty() {
        return "N/A".to_string();
    }
    parse_datetime(value)
        .map(|dt| dt.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| value.to_string())
}

/// Format a wire date-time for tables: "DD/MM/YYYY HH:MM:SS"
pub fn format_datetime(value: &str) -> String {
    if value.trim().is_empty() {
        return "N/A".to_string();
    }
    parse_datetime(value)
        .map(|dt| dt.format("%d/%m/%Y %H:%M:%S").to_string())
        .unwrap_or_else(|| value.to_string())
}

pub fn format_opt_date(value: Option<&str>) -> String {
    format_date(value.unwrap_or_default())
}

/// Whole days from `today` until `due`; negative when past due
pub fn days_until(due: &str, today: NaiveDate) -> Option<i64> {
    parse_datetime(due).map(|dt| (dt.date() - today).num_days())
}

/// Due-date column content with its badge variant
#[derive(Debug, Clone, PartialEq)]
pub struct DueIndicator {
    pub label: String,
    /// `None` renders as plain text
    pub variant: Option<&'static str>,
}

pub fn due_indicator(due: Option<&str>, today: NaiveDate) -> DueIndicator {
    match due.and_then(|d| days_until(d, today)) {
        None => DueIndicator {
            label: "N/A".to_string(),
            variant: None,
        },
        Some(days) if days < 0 => DueIndicator {
            label: format!("Overdue by {} days", days.abs()),
            variant: Some("error"),
        },
        Some(days) if days <= 7 => DueIndicator {
            label: format!("{} days left", days),
            variant: Some("warning"),
        },
        Some(days) => DueIndicator {
            label: format!("{} days", days),
            variant: None,
        },
    }
}

/// Today in the browser's local time zone
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_format_date_input() {
        assert_eq!(format_date_input("2024-03-15"), "2024-03-15");
        assert_eq!(format_date_input("2024-03-15T14:02:26.123Z"), "2024-03-15");
        assert_eq!(format_date_input("Fri, 15 Mar 2024 00:00:00 GMT"), "2024-03-15");
        assert_eq!(format_date_input("2024-03-15 08:30:00"), "2024-03-15");
        assert_eq!(format_date_input("15 March"), "");
        assert_eq!(format_date_input(""), "");
    }

    #[test]
    fn test_zoned_values_are_converted_to_utc() {
        assert_eq!(format_datetime_input("2024-03-15T01:30:00+02:00"), "2024-03-14T23:30");
    }

    #[test]
    fn test_format_datetime_input() {
        assert_eq!(format_datetime_input("2024-03-15T14:02:26Z"), "2024-03-15T14:02");
        assert_eq!(format_datetime_input("2024-03-15T14:02"), "2024-03-15T14:02");
        assert_eq!(format_datetime_input("2024-03-15"), "2024-03-15T00:00");
    }

    #[test]
    fn test_display_formats() {
        assert_eq!(format_date("2024-03-15"), "15/03/2024");
        assert_eq!(format_datetime("2024-12-31T23:59:59Z"), "31/12/2024 23:59:59");
        assert_eq!(format_date(""), "N/A");
        assert_eq!(format_date("invalid"), "invalid");
    }

    #[test]
    fn test_due_indicator() {
        let today = day(2024, 3, 15);
        assert_eq!(due_indicator(Some("2024-03-10"), today).label, "Overdue by 5 days");
        assert_eq!(due_indicator(Some("2024-03-10"), today).variant, Some("error"));
        assert_eq!(due_indicator(Some("2024-03-22"), today).label, "7 days left");
        assert_eq!(due_indicator(Some("2024-03-15"), today).label, "0 days left");
        let far = due_indicator(Some("2024-04-15"), today);
        assert_eq!(far.label, "31 days");
        assert_eq!(far.variant, None);
        assert_eq!(due_indicator(None, today).label, "N/A");
        assert_eq!(due_indicator(Some("soon"), today).label, "N/A");
    }
}
