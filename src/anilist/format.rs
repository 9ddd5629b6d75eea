//! Display formatting for dates coming back from AniList.

use chrono::{DateTime, NaiveDate};

/// Placeholder shown for dates that are not (fully) known.
pub const UNKNOWN_DATE: &str = "TBA";

/// Formats a calendar date as `"March 5, 2024"`.
///
/// Returns [`UNKNOWN_DATE`] when any part is missing or zero, or when the
/// parts do not form a real date.
///
/// ```
/// use anigate::anilist::format_date;
///
/// assert_eq!(format_date(Some(2024), Some(3), Some(5)), "March 5, 2024");
/// assert_eq!(format_date(Some(2024), None, Some(5)), "TBA");
/// ```
pub fn format_date(year: Option<i32>, month: Option<u32>, day: Option<u32>) -> String {
    let (Some(year), Some(month), Some(day)) = (year, month, day) else {
        return UNKNOWN_DATE.to_owned();
    };
    if year == 0 {
        return UNKNOWN_DATE.to_owned();
    }
    NaiveDate::from_ymd_opt(year, month, day)
        .map(|date| date.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|| UNKNOWN_DATE.to_owned())
}

/// Formats a Unix timestamp (seconds) as `"March 5, 2024 at 3:30 PM"`, in UTC.
pub fn format_airing_time(unix_secs: i64) -> String {
    DateTime::from_timestamp(unix_secs, 0)
        .map(|at| at.format("%B %-d, %Y at %-I:%M %p").to_string())
        .unwrap_or_else(|| UNKNOWN_DATE.to_owned())
}
