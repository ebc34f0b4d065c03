use chrono::NaiveDate;

/// Cell value shown when a branch has no usable data for a source.
pub const NO_DATA: &str = "-";

/// Format a date for display: 06/30/2023
pub fn mdy(date: NaiveDate) -> String {
    date.format("%m/%d/%Y").to_string()
}

/// Format a single optional date, or the no-data sentinel.
pub fn single_date(date: Option<NaiveDate>) -> String {
    date.map(mdy).unwrap_or_else(|| NO_DATA.to_string())
}

/// Format a start/end pair as "MM/DD/YYYY to MM/DD/YYYY".
/// Either side missing renders the no-data sentinel.
pub fn date_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> String {
    match (start, end) {
        (Some(s), Some(e)) => format!("{} to {}", mdy(s), mdy(e)),
        _ => NO_DATA.to_string(),
    }
}

/// Human-readable age of a computed table, e.g. "4m 12s ago".
pub fn age(seconds: i64) -> String {
    let seconds = seconds.max(0);
    if seconds < 60 {
        format!("{seconds}s ago")
    } else if seconds < 3600 {
        format!("{}m {}s ago", seconds / 60, seconds % 60)
    } else {
        format!("{}h {}m ago", seconds / 3600, (seconds % 3600) / 60)
    }
}
