use std::path::Path;

use chrono::{Months, NaiveDate};
use regex::{Regex, RegexBuilder};
use walkdir::WalkDir;

use crate::error::Result;
use crate::models::DateWindow;
use crate::sources::{Layout, Shape};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// One `MM-DD-YYYY` date.
    Day,
    /// `MM-DD-YYYY` start and end.
    DayRange,
    /// `MMM YYYY` start and end, widened to whole months.
    MonthRange,
}

/// Dates carried by a single filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileDates {
    Single(NaiveDate),
    Range(NaiveDate, NaiveDate),
}

#[derive(Debug, Clone)]
pub struct FilenamePattern {
    regex: Regex,
    format: DateFormat,
}

impl FilenamePattern {
    /// Compile a case-insensitive pattern anchored at the start of the filename.
    pub fn new(pattern: &str, format: DateFormat) -> Result<Self> {
        let regex = RegexBuilder::new(&format!("^{pattern}"))
            .case_insensitive(true)
            .build()?;
        Ok(Self { regex, format })
    }

    /// `None` when the filename does not match. `Some(Err(raw))` when it
    /// matches but the embedded date text does not parse.
    pub fn capture(&self, file_name: &str) -> Option<std::result::Result<FileDates, String>> {
        let caps = self.regex.captures(file_name)?;
        let first = caps.get(1).map_or("", |m| m.as_str());
        let second = caps.get(2).map_or("", |m| m.as_str());
        let parsed = match self.format {
            DateFormat::Day => parse_day(first).map(FileDates::Single).ok_or(first),
            DateFormat::DayRange => match (parse_day(first), parse_day(second)) {
                (Some(s), Some(e)) => Ok(FileDates::Range(s, e)),
                (None, _) => Err(first),
                (_, None) => Err(second),
            },
            DateFormat::MonthRange => match (month_start(first), month_end(second)) {
                (Some(s), Some(e)) => Ok(FileDates::Range(s, e)),
                (None, _) => Err(first),
                (_, None) => Err(second),
            },
        };
        Some(parsed.map_err(str::to_string))
    }
}

pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%m-%d-%Y").ok()
}

/// "JAN 2023" → 2023-01-01
pub fn month_start(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("01 {}", raw.trim()), "%d %b %Y").ok()
}

/// "FEB 2024" → 2024-02-29: first of the following month minus one day.
pub fn month_end(raw: &str) -> Option<NaiveDate> {
    month_start(raw)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}

/// Filenames under `dir`. Per-branch folders are walked recursively, flat
/// roots are listed one level deep. A missing directory yields no names.
pub fn list_file_names(dir: &Path, layout: Layout) -> Result<Vec<String>> {
    if !dir.is_dir() {
        log::debug!("{} does not exist", dir.display());
        return Ok(Vec::new());
    }
    let mut names = Vec::new();
    match layout {
        Layout::PerBranchSubfolder => {
            for entry in WalkDir::new(dir).into_iter() {
                let entry = match entry {
                    Ok(e) => e,
                    Err(e) => {
                        log::warn!("Skipping unreadable entry under {}: {e}", dir.display());
                        continue;
                    }
                };
                if entry.file_type().is_file() {
                    names.push(entry.file_name().to_string_lossy().into_owned());
                }
            }
        }
        Layout::FlatAtRoot => {
            for entry in std::fs::read_dir(dir)? {
                let entry = entry?;
                if entry.file_type()?.is_file() {
                    names.push(entry.file_name().to_string_lossy().into_owned());
                }
            }
        }
    }
    Ok(names)
}

/// Fold the dates of every matching filename into one window.
///
/// Range sources collect all starts and all ends separately and return
/// `(min(starts), max(ends))`, so the result spans gaps between files.
/// Latest sources return the maximum date.
pub fn extract<'a, I>(names: I, patterns: &[FilenamePattern], shape: Shape) -> DateWindow
where
    I: IntoIterator<Item = &'a str>,
{
    let mut starts = Vec::new();
    let mut ends = Vec::new();
    let mut singles = Vec::new();

    for name in names {
        let Some(captured) = patterns.iter().find_map(|p| p.capture(name)) else {
            continue;
        };
        match captured {
            Ok(FileDates::Range(s, e)) => {
                starts.push(s);
                ends.push(e);
            }
            Ok(FileDates::Single(d)) => singles.push(d),
            Err(raw) => log::warn!("Skipping {name}: unparseable date '{raw}'"),
        }
    }

    match shape {
        Shape::Range => DateWindow::envelope(&starts, &ends),
        Shape::Latest => DateWindow::latest(&singles),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn range_pattern() -> Vec<FilenamePattern> {
        vec![FilenamePattern::new(
            r"BUL (?:LN|DEP) .+? - (\d{2}-\d{2}-\d{4}) TO (\d{2}-\d{2}-\d{4})(?:_part_\d+)?\.csv",
            DateFormat::DayRange,
        )
        .unwrap()]
    }

    fn single_pattern() -> Vec<FilenamePattern> {
        vec![FilenamePattern::new(r"BULUA - (\d{2}-\d{2}-\d{4})\.csv", DateFormat::Day).unwrap()]
    }

    #[test]
    fn test_parse_day_is_strict() {
        assert_eq!(parse_day("06-30-2023"), Some(d(2023, 6, 30)));
        assert_eq!(parse_day("02-30-2023"), None);
        assert_eq!(parse_day("13-01-2023"), None);
        assert_eq!(parse_day("2023-06-30"), None);
    }

    #[test]
    fn test_month_bounds() {
        assert_eq!(month_start("JAN 2023"), Some(d(2023, 1, 1)));
        assert_eq!(month_start("jan 2023"), Some(d(2023, 1, 1)));
        assert_eq!(month_end("FEB 2024"), Some(d(2024, 2, 29)));
        assert_eq!(month_end("Dec 2023"), Some(d(2023, 12, 31)));
        assert_eq!(month_start("XYZ 2023"), None);
    }

    #[test]
    fn test_envelope_across_non_contiguous_files() {
        let names = [
            "BUL LN RELEASES - 06-01-2023 TO 06-15-2023.csv",
            "BUL DEP SAVINGS - 07-01-2023 TO 07-10-2023.csv",
        ];
        let w = extract(names, &range_pattern(), Shape::Range);
        assert_eq!(w.display(), "06/01/2023 to 07/10/2023");
    }

    #[test]
    fn test_part_suffix_and_case_insensitivity() {
        let names = ["bul ln releases - 05-01-2023 to 05-31-2023_part_3.CSV"];
        let w = extract(names, &range_pattern(), Shape::Range);
        assert_eq!(w, DateWindow::Range { start: d(2023, 5, 1), end: d(2023, 5, 31) });
    }

    #[test]
    fn test_unparseable_date_is_skipped() {
        let names = [
            "BUL LN RELEASES - 02-30-2023 TO 03-15-2023.csv",
            "BUL LN RELEASES - 04-01-2023 TO 04-15-2023.csv",
        ];
        let w = extract(names, &range_pattern(), Shape::Range);
        assert_eq!(w.display(), "04/01/2023 to 04/15/2023");
    }

    #[test]
    fn test_all_unparseable_yields_empty() {
        let names = ["BULUA - 99-99-2023.csv"];
        assert!(extract(names, &single_pattern(), Shape::Latest).is_empty());
    }

    #[test]
    fn test_pattern_is_anchored_at_start() {
        let names = ["OLD BULUA - 01-15-2023.csv", "notes.txt"];
        assert!(extract(names, &single_pattern(), Shape::Latest).is_empty());
    }

    #[test]
    fn test_latest_of_single_dates() {
        let names = [
            "BULUA - 01-15-2023.csv",
            "BULUA - 03-31-2023.csv",
            "BULUA - 02-28-2023.csv",
        ];
        let w = extract(names, &single_pattern(), Shape::Latest);
        assert_eq!(w.display(), "03/31/2023");
    }

    #[test]
    fn test_month_range_pattern() {
        let p = FilenamePattern::new(
            r"CARMEN - ([A-Za-z]{3} \d{4}) to ([A-Za-z]{3} \d{4})\.csv",
            DateFormat::MonthRange,
        )
        .unwrap();
        assert_eq!(
            p.capture("CARMEN - JAN 2023 to FEB 2023.csv"),
            Some(Ok(FileDates::Range(d(2023, 1, 1), d(2023, 2, 28))))
        );
        assert_eq!(
            p.capture("CARMEN - JAN 2023 to FOO 2023.csv"),
            Some(Err("FOO 2023".to_string()))
        );
    }

    #[test]
    fn test_list_file_names_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let names = list_file_names(&dir.path().join("NOPE"), Layout::PerBranchSubfolder).unwrap();
        assert!(names.is_empty());
    }

    #[test]
    fn test_list_file_names_recursive_vs_flat() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("2023").join("06");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("top.csv"), "").unwrap();
        std::fs::write(nested.join("deep.csv"), "").unwrap();

        let mut walked = list_file_names(dir.path(), Layout::PerBranchSubfolder).unwrap();
        walked.sort();
        assert_eq!(walked, vec!["deep.csv".to_string(), "top.csv".to_string()]);

        let flat = list_file_names(dir.path(), Layout::FlatAtRoot).unwrap();
        assert_eq!(flat, vec!["top.csv".to_string()]);
    }
}
