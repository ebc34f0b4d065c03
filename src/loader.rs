use std::path::Path;

use csv::StringRecord;

use crate::error::{BranchwatchError, Result};
use crate::models::BranchRecord;

/// Column holding branch names in the roster file.
pub const ROSTER_COLUMN: &str = "BRANCH";

// ---------------------------------------------------------------------------
// Generic CSV helpers
// ---------------------------------------------------------------------------

/// Read a text file as UTF-8, falling back to Latin-1 when the bytes are not
/// valid UTF-8. A leading byte-order mark is dropped.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    let text = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            log::debug!("{} is not UTF-8, decoding as Latin-1", path.display());
            // Latin-1 maps every byte to the code point of the same value
            e.into_bytes().iter().map(|&b| b as char).collect()
        }
    };
    Ok(text.strip_prefix('\u{feff}').map(str::to_string).unwrap_or(text))
}

pub fn csv_reader(text: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes())
}

/// Position of the header equal to `name` once surrounding whitespace is trimmed.
pub fn column_index(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim() == name)
}

/// Values of a single named column. Rows too short to hold it are skipped.
pub fn load_column(path: &Path, column: &str) -> Result<Vec<String>> {
    let text = read_text(path)?;
    let mut rdr = csv_reader(&text);
    let headers = rdr.headers()?.clone();
    let idx = column_index(&headers, column).ok_or_else(|| BranchwatchError::MissingColumn {
        column: column.to_string(),
        file: path.display().to_string(),
    })?;

    let mut values = Vec::new();
    for result in rdr.records() {
        let record = result?;
        if let Some(v) = record.get(idx) {
            values.push(v.to_string());
        }
    }
    Ok(values)
}

// ---------------------------------------------------------------------------
// Roster
// ---------------------------------------------------------------------------

/// Load branch names from the roster's `BRANCH` column. Blank names are
/// dropped; any other problem fails the whole roster.
pub fn load_roster(path: &Path) -> Result<Vec<BranchRecord>> {
    if !path.is_file() {
        return Err(BranchwatchError::Roster(format!(
            "roster file not found: {}",
            path.display()
        )));
    }

    let is_xlsx = path
        .extension()
        .map_or(false, |e| e.eq_ignore_ascii_case("xlsx") || e.eq_ignore_ascii_case("xls"));
    let names = if is_xlsx {
        load_roster_workbook(path)?
    } else {
        load_column(path, ROSTER_COLUMN).map_err(|e| match e {
            BranchwatchError::MissingColumn { .. } => BranchwatchError::Roster(format!(
                "no {ROSTER_COLUMN} column in {}",
                path.display()
            )),
            other => BranchwatchError::Roster(other.to_string()),
        })?
    };

    Ok(names
        .into_iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .map(BranchRecord::new)
        .collect())
}

#[cfg(feature = "xlsx")]
fn load_roster_workbook(path: &Path) -> Result<Vec<String>> {
    use calamine::Reader;

    let mut workbook = calamine::open_workbook_auto(path)
        .map_err(|e| BranchwatchError::Roster(format!("failed to open {}: {e}", path.display())))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| BranchwatchError::Roster(format!("{} has no sheets", path.display())))?
        .map_err(|e| BranchwatchError::Roster(e.to_string()))?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| BranchwatchError::Roster(format!("{} is empty", path.display())))?;
    let idx = header
        .iter()
        .position(|c| c.to_string().trim() == ROSTER_COLUMN)
        .ok_or_else(|| {
            BranchwatchError::Roster(format!("no {ROSTER_COLUMN} column in {}", path.display()))
        })?;

    Ok(rows
        .filter_map(|row| row.get(idx).map(|c| c.to_string()))
        .collect())
}

#[cfg(not(feature = "xlsx"))]
fn load_roster_workbook(path: &Path) -> Result<Vec<String>> {
    Err(BranchwatchError::Roster(format!(
        "{} is a workbook; build with the 'xlsx' feature to read it",
        path.display()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_text_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.csv");
        std::fs::write(&path, "DATE\n01/02/2023\n").unwrap();
        assert_eq!(read_text(&path).unwrap(), "DATE\n01/02/2023\n");
    }

    #[test]
    fn test_read_text_strips_bom() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.csv");
        std::fs::write(&path, "\u{feff}BRANCH\nBULUA\n").unwrap();
        assert!(read_text(&path).unwrap().starts_with("BRANCH"));
    }

    #[test]
    fn test_read_text_latin1_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.csv");
        // "NIÑO" with Ñ as the single Latin-1 byte 0xD1
        std::fs::write(&path, b"NAME\nNI\xd1O\n").unwrap();
        assert_eq!(read_text(&path).unwrap(), "NAME\nNI\u{d1}O\n");
    }

    #[test]
    fn test_column_index_trims_headers() {
        let headers = StringRecord::from(vec!["ACCOUNT", "  DATE ", "AMOUNT"]);
        assert_eq!(column_index(&headers, "DATE"), Some(1));
        assert_eq!(column_index(&headers, "date"), None);
    }

    #[test]
    fn test_load_column_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.csv");
        std::fs::write(&path, "A,B\n1,2\n").unwrap();
        let err = load_column(&path, "DATE").unwrap_err();
        assert!(matches!(err, BranchwatchError::MissingColumn { .. }));
    }

    #[test]
    fn test_load_roster() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("branches.csv");
        std::fs::write(&path, "NO, BRANCH \n1,BULUA\n2, CARMEN \n3,\n").unwrap();
        let roster = load_roster(&path).unwrap();
        let names: Vec<&str> = roster.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["BULUA", "CARMEN"]);
    }

    #[test]
    fn test_load_roster_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_roster(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, BranchwatchError::Roster(_)));
    }

    #[test]
    fn test_load_roster_without_branch_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("branches.csv");
        std::fs::write(&path, "NO,NAME\n1,BULUA\n").unwrap();
        let err = load_roster(&path).unwrap_err();
        assert!(err.to_string().contains("no BRANCH column"));
    }
}
