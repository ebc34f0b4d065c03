use std::path::PathBuf;

use crate::error::Result;
use crate::fmt::NO_DATA;
use crate::loader::load_roster;
use crate::models::{BranchRecord, SummaryRow, HEAD_OFFICE};
use crate::sources::{DataSource, ALL_SOURCES};

/// Computes one display cell for a branch and source.
pub trait CellProvider {
    fn cell(&self, branch: &str, source: DataSource) -> Result<String>;

    /// Called once per build with the final branch list.
    fn audit_roster(&self, _branches: &[BranchRecord]) {}
}

/// Anything that can produce a complete Summary Table.
pub trait BuildSummary {
    fn build_summary(&self) -> Result<Vec<SummaryRow>>;
}

pub struct SummaryBuilder<P> {
    roster_path: PathBuf,
    provider: P,
}

impl<P: CellProvider> SummaryBuilder<P> {
    pub fn new(roster_path: impl Into<PathBuf>, provider: P) -> Self {
        Self {
            roster_path: roster_path.into(),
            provider,
        }
    }
}

impl<P: CellProvider> BuildSummary for SummaryBuilder<P> {
    /// Fails only when the roster cannot be loaded; every other problem
    /// degrades a single cell.
    fn build_summary(&self) -> Result<Vec<SummaryRow>> {
        let roster = load_roster(&self.roster_path).map_err(|e| {
            log::error!("Summary aborted: {e}");
            e
        })?;
        let branches = prepare_branches(roster);
        self.provider.audit_roster(&branches);
        log::info!("Building summary for {} branches", branches.len());
        Ok(build_rows(&branches, &self.provider))
    }
}

/// Add the head-office pseudo-branch, drop duplicates, and sort by name.
pub fn prepare_branches(roster: Vec<BranchRecord>) -> Vec<BranchRecord> {
    let mut names: Vec<String> = roster.into_iter().map(|b| b.name).collect();
    if !names.iter().any(|n| n == HEAD_OFFICE) {
        names.push(HEAD_OFFICE.to_string());
    }
    names.sort();
    names.dedup();
    names.into_iter().map(BranchRecord::new).collect()
}

pub fn build_rows<P: CellProvider>(branches: &[BranchRecord], provider: &P) -> Vec<SummaryRow> {
    branches
        .iter()
        .map(|branch| {
            let mut row = SummaryRow::empty(&branch.name);
            for &source in ALL_SOURCES {
                let value = match provider.cell(&branch.name, source) {
                    Ok(v) => v,
                    Err(e) => {
                        log::error!("{} {} failed: {e}", branch.name, source.label());
                        NO_DATA.to_string()
                    }
                };
                row.set_cell(source, value);
            }
            row
        })
        .collect()
}
