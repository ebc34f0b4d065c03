use crate::branch::BranchTokens;
use crate::error::Result;
use crate::filename_dates::{DateFormat, FilenamePattern};

/// Two-digit month and day, four-digit year: 06-30-2023
const DAY: &str = r"(\d{2}-\d{2}-\d{4})";
/// Three-letter month and year: JUN 2023
const MONTH: &str = r"([A-Za-z]{3} \d{4})";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// `<root>/<BRANCH_FOLDER>/**`
    PerBranchSubfolder,
    /// `<root>/*`, branch identified by the filename.
    FlatAtRoot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Range,
    Latest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detection {
    FileName,
    /// Dates are read from the `DATE` column of every CSV in the branch folder.
    Content,
}

// ---------------------------------------------------------------------------
// Data sources: enum dispatch over the six extract types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DataSource {
    Trnm,
    Svacc,
    Lnacc,
    Gl,
    Aging,
    Tb,
}

impl DataSource {
    /// Column label used in the summary table.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Trnm => "TRNM",
            Self::Svacc => "SVACC",
            Self::Lnacc => "LNACC",
            Self::Gl => "GL",
            Self::Aging => "AGING",
            Self::Tb => "TB",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Trnm => "Transaction log",
            Self::Svacc => "Savings accounts",
            Self::Lnacc => "Loan accounts",
            Self::Gl => "General ledger",
            Self::Aging => "Aging report",
            Self::Tb => "Trial balance",
        }
    }

    pub fn layout(&self) -> Layout {
        match self {
            Self::Svacc | Self::Lnacc => Layout::FlatAtRoot,
            Self::Trnm | Self::Gl | Self::Aging | Self::Tb => Layout::PerBranchSubfolder,
        }
    }

    pub fn shape(&self) -> Shape {
        match self {
            Self::Trnm | Self::Gl | Self::Aging => Shape::Range,
            Self::Svacc | Self::Lnacc | Self::Tb => Shape::Latest,
        }
    }

    pub fn detection(&self) -> Detection {
        match self {
            Self::Aging => Detection::Content,
            _ => Detection::FileName,
        }
    }

    /// Filename grammar as shown to users.
    pub fn grammar(&self) -> &'static str {
        match self {
            Self::Trnm => "{ABBR} (LN|DEP) {CATEGORY} - MM-DD-YYYY TO MM-DD-YYYY[_part_N].csv",
            Self::Svacc | Self::Lnacc => "{BRANCH} - MM-DD-YYYY.csv",
            Self::Gl => "{BRANCH} - MM-DD-YYYY to MM-DD-YYYY.csv | {BRANCH} - MMM YYYY to MMM YYYY.csv",
            Self::Aging => "*.csv with a DATE column",
            Self::Tb => "MM-DD-YYYY.csv | MM-DD-YYYY.xlsx",
        }
    }

    /// Compiled filename patterns for one branch, tried in order.
    /// Content-detected sources have none.
    pub fn filename_patterns(&self, tokens: &BranchTokens) -> Result<Vec<FilenamePattern>> {
        let token = &tokens.filename_token;
        let patterns = match self {
            Self::Trnm => vec![FilenamePattern::new(
                &format!(r"{token} (?:LN|DEP) .+? - {DAY} TO {DAY}(?:_part_\d+)?\.csv"),
                DateFormat::DayRange,
            )?],
            Self::Svacc | Self::Lnacc => vec![FilenamePattern::new(
                &format!(r"{token} - {DAY}\.csv"),
                DateFormat::Day,
            )?],
            Self::Gl => vec![
                FilenamePattern::new(&format!(r"{token} - {DAY} to {DAY}\.csv"), DateFormat::DayRange)?,
                FilenamePattern::new(
                    &format!(r"{token} - {MONTH} to {MONTH}\.csv"),
                    DateFormat::MonthRange,
                )?,
            ],
            Self::Aging => Vec::new(),
            Self::Tb => vec![FilenamePattern::new(&format!(r"{DAY}\.(?:csv|xlsx)"), DateFormat::Day)?],
        };
        Ok(patterns)
    }
}

pub const ALL_SOURCES: &[DataSource] = &[
    DataSource::Trnm,
    DataSource::Svacc,
    DataSource::Lnacc,
    DataSource::Gl,
    DataSource::Aging,
    DataSource::Tb,
];

pub fn get_by_label(label: &str) -> Option<DataSource> {
    ALL_SOURCES
        .iter()
        .find(|s| s.label().eq_ignore_ascii_case(label.trim()))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branch::BranchResolver;

    fn tokens(branch: &str, source: DataSource) -> BranchTokens {
        BranchResolver::default().resolve(branch, source)
    }

    fn matches(source: DataSource, branch: &str, file_name: &str) -> bool {
        source
            .filename_patterns(&tokens(branch, source))
            .unwrap()
            .iter()
            .any(|p| p.capture(file_name).is_some())
    }

    #[test]
    fn test_get_by_label() {
        assert_eq!(get_by_label("gl"), Some(DataSource::Gl));
        assert_eq!(get_by_label(" TRNM "), Some(DataSource::Trnm));
        assert_eq!(get_by_label("ACCLIST"), None);
    }

    #[test]
    fn test_layouts_and_shapes() {
        assert_eq!(DataSource::Svacc.layout(), Layout::FlatAtRoot);
        assert_eq!(DataSource::Lnacc.layout(), Layout::FlatAtRoot);
        assert_eq!(DataSource::Tb.layout(), Layout::PerBranchSubfolder);
        assert_eq!(DataSource::Trnm.shape(), Shape::Range);
        assert_eq!(DataSource::Tb.shape(), Shape::Latest);
        assert_eq!(DataSource::Aging.detection(), Detection::Content);
    }

    #[test]
    fn test_trnm_pattern() {
        let s = DataSource::Trnm;
        assert!(matches(s, "BULUA", "BUL LN DISBURSEMENT - 06-01-2023 TO 06-15-2023.csv"));
        assert!(matches(s, "BULUA", "bul dep savings - 06-01-2023 to 06-15-2023_part_2.csv"));
        assert!(!matches(s, "BULUA", "BUL CHK OTHER - 06-01-2023 TO 06-15-2023.csv"));
        assert!(!matches(s, "BULUA", "CAR LN DISBURSEMENT - 06-01-2023 TO 06-15-2023.csv"));
    }

    #[test]
    fn test_branch_named_sources_accept_underscores() {
        for s in [DataSource::Svacc, DataSource::Lnacc] {
            assert!(matches(s, "EL SALVADOR", "EL SALVADOR - 01-15-2023.csv"));
            assert!(matches(s, "EL SALVADOR", "EL_SALVADOR - 01-15-2023.csv"));
            assert!(!matches(s, "EL SALVADOR", "ELSALVADOR - 01-15-2023.csv"));
        }
    }

    #[test]
    fn test_gl_accepts_both_date_styles() {
        let s = DataSource::Gl;
        assert!(matches(s, "CARMEN", "CARMEN - 01-01-2023 to 01-31-2023.csv"));
        assert!(matches(s, "CARMEN", "CARMEN - JAN 2023 to MAR 2023.csv"));
        assert!(!matches(s, "CARMEN", "CARMEN - 01-01-2023.csv"));
    }

    #[test]
    fn test_tb_accepts_csv_and_xlsx() {
        let s = DataSource::Tb;
        assert!(matches(s, "CARMEN", "03-31-2023.csv"));
        assert!(matches(s, "CARMEN", "03-31-2023.XLSX"));
        assert!(!matches(s, "CARMEN", "03-31-2023.pdf"));
    }

    #[test]
    fn test_aging_has_no_filename_patterns() {
        let p = DataSource::Aging
            .filename_patterns(&tokens("BULUA", DataSource::Aging))
            .unwrap();
        assert!(p.is_empty());
    }
}
