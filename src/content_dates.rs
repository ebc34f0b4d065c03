use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use walkdir::WalkDir;

use crate::error::Result;
use crate::loader::load_column;
use crate::models::DateWindow;

/// Column read from aging extracts.
pub const DATE_COLUMN: &str = "DATE";

// chrono's %Y also accepts one or two digits, so every %y layout must come
// before its %Y twin. %y rejects "2023" (leftover input) and falls through.
const DATE_FORMATS: &[&str] = &[
    "%m/%d/%y",
    "%m/%d/%Y",
    "%Y-%m-%d",
    "%m-%d-%y",
    "%m-%d-%Y",
    "%Y/%m/%d",
    "%d-%b-%y",
    "%d-%b-%Y",
    "%d %b %y",
    "%d %b %Y",
    "%b %d, %y",
    "%b %d, %Y",
    "%B %d, %y",
    "%B %d, %Y",
    "%Y%m%d",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%m/%d/%y %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%y %H:%M",
    "%m/%d/%Y %H:%M",
    "%m/%d/%y %I:%M:%S %p",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%y %I:%M %p",
    "%m/%d/%Y %I:%M %p",
];

/// Parse a cell written in any of the date layouts branches export.
/// Returns `None` for blanks and anything unrecognised.
pub fn parse_flexible_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
                .map(|dt| dt.date())
        })
}

/// Every parseable `DATE` value in one file.
pub fn read_dates(path: &Path) -> Result<Vec<NaiveDate>> {
    let cells = load_column(path, DATE_COLUMN)?;
    Ok(cells.iter().filter_map(|c| parse_flexible_date(c)).collect())
}

/// Walk a branch folder and fold min/max over the `DATE` column of every CSV.
/// Files that cannot be read contribute nothing.
pub fn scan_dir(dir: &Path) -> DateWindow {
    if !dir.is_dir() {
        log::debug!("{} does not exist", dir.display());
        return DateWindow::Empty;
    }

    let mut pool: Vec<NaiveDate> = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                log::error!("Skipping unreadable entry under {}: {e}", dir.display());
                continue;
            }
        };
        let path = entry.path();
        let is_csv = entry.file_type().is_file()
            && path
                .extension()
                .map_or(false, |e| e.eq_ignore_ascii_case("csv"));
        if !is_csv {
            continue;
        }
        match read_dates(path) {
            Ok(dates) => pool.extend(dates),
            Err(e) => log::error!("Skipping {}: {e}", path.display()),
        }
    }

    DateWindow::envelope(&pool, &pool)
}
