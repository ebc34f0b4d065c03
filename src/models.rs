use chrono::NaiveDate;
use serde::Serialize;

use crate::fmt;
use crate::sources::DataSource;

/// Pseudo-branch always present in a summary, whether or not the roster lists it.
pub const HEAD_OFFICE: &str = "HEAD OFFICE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRecord {
    pub name: String,
}

impl BranchRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Dates discovered for one branch and one source, before display formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateWindow {
    #[default]
    Empty,
    Range {
        start: NaiveDate,
        end: NaiveDate,
    },
    Latest(NaiveDate),
}

impl DateWindow {
    /// Envelope over independently collected starts and ends.
    /// Empty when either side has no dates.
    pub fn envelope(starts: &[NaiveDate], ends: &[NaiveDate]) -> Self {
        match (starts.iter().min(), ends.iter().max()) {
            (Some(&start), Some(&end)) => Self::Range { start, end },
            _ => Self::Empty,
        }
    }

    pub fn latest(dates: &[NaiveDate]) -> Self {
        dates.iter().max().map_or(Self::Empty, |&d| Self::Latest(d))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn display(&self) -> String {
        match *self {
            Self::Empty => fmt::NO_DATA.to_string(),
            Self::Range { start, end } => fmt::date_range(Some(start), Some(end)),
            Self::Latest(date) => fmt::single_date(Some(date)),
        }
    }
}

/// One row of the Summary Table. Every cell is already display-formatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    #[serde(rename = "BRANCH")]
    pub branch: String,
    #[serde(rename = "TRNM")]
    pub trnm: String,
    #[serde(rename = "SVACC")]
    pub svacc: String,
    #[serde(rename = "LNACC")]
    pub lnacc: String,
    #[serde(rename = "GL")]
    pub gl: String,
    #[serde(rename = "ACCLIST")]
    pub acclist: String,
    #[serde(rename = "AGING")]
    pub aging: String,
    #[serde(rename = "TB")]
    pub tb: String,
}

impl SummaryRow {
    pub const HEADERS: [&'static str; 8] =
        ["BRANCH", "TRNM", "SVACC", "LNACC", "GL", "ACCLIST", "AGING", "TB"];

    /// A row with every cell set to the no-data sentinel.
    pub fn empty(branch: &str) -> Self {
        let dash = || fmt::NO_DATA.to_string();
        Self {
            branch: branch.to_string(),
            trnm: dash(),
            svacc: dash(),
            lnacc: dash(),
            gl: dash(),
            acclist: dash(),
            aging: dash(),
            tb: dash(),
        }
    }

    pub fn cell(&self, source: DataSource) -> &str {
        match source {
            DataSource::Trnm => &self.trnm,
            DataSource::Svacc => &self.svacc,
            DataSource::Lnacc => &self.lnacc,
            DataSource::Gl => &self.gl,
            DataSource::Aging => &self.aging,
            DataSource::Tb => &self.tb,
        }
    }

    pub fn set_cell(&mut self, source: DataSource, value: String) {
        match source {
            DataSource::Trnm => self.trnm = value,
            DataSource::Svacc => self.svacc = value,
            DataSource::Lnacc => self.lnacc = value,
            DataSource::Gl => self.gl = value,
            DataSource::Aging => self.aging = value,
            DataSource::Tb => self.tb = value,
        }
    }

    /// Cells in header order, branch first.
    pub fn values(&self) -> [&str; 8] {
        [
            &self.branch,
            &self.trnm,
            &self.svacc,
            &self.lnacc,
            &self.gl,
            &self.acclist,
            &self.aging,
            &self.tb,
        ]
    }
}
