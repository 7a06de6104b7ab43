//! Display formatting and filter-input parsing helpers shared by the
//! list pages.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

pub fn format_datetime(value: &DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn format_opt_datetime(value: &Option<DateTime<Utc>>) -> String {
    match value {
        Some(v) => format_datetime(v),
        None => "-".to_string(),
    }
}

pub fn format_date(value: NaiveDate) -> String {
    value.format("%Y-%m-%d").to_string()
}

/// Money always shows two decimal places.
pub fn format_amount(value: &Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

/// CSS class for a status chip; unknown statuses get the plain badge.
pub fn status_badge_class(code: &str) -> &'static str {
    match code {
        "paid" | "approved" | "matched" => "badge badge--success",
        "pending" | "processing" => "badge badge--warning",
        "failed" | "rejected" | "timeout" | "discrepancy" => "badge badge--danger",
        _ => "badge",
    }
}

/// Parse a `<input type="date">` value; empty input clears the filter.
pub fn parse_date_input(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Parse a numeric select value. The "All" option (empty or literal
/// "all") means no filter and must never reach the request parameters.
pub fn parse_id_filter(value: &str) -> Option<i64> {
    match value.trim() {
        "" | "all" => None,
        v => v.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        let value: Decimal = "1234.5".parse().unwrap();
        assert_eq!(format_amount(&value), "1234.50");
        let value: Decimal = "-10".parse().unwrap();
        assert_eq!(format_amount(&value), "-10.00");
    }

    #[test]
    fn test_parse_date_input() {
        assert_eq!(
            parse_date_input("2024-03-15"),
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
        assert_eq!(parse_date_input(""), None);
        assert_eq!(parse_date_input("15.03.2024"), None);
    }

    #[test]
    fn test_parse_id_filter_translates_the_all_sentinel() {
        assert_eq!(parse_id_filter("7"), Some(7));
        assert_eq!(parse_id_filter("all"), None);
        assert_eq!(parse_id_filter(""), None);
        assert_eq!(parse_id_filter("x"), None);
    }

    #[test]
    fn test_format_opt_datetime() {
        assert_eq!(format_opt_datetime(&None), "-");
    }
}
