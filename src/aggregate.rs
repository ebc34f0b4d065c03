use std::path::{Path, PathBuf};

use crate::branch::{BranchResolver, BranchTokens};
use crate::content_dates;
use crate::error::Result;
use crate::filename_dates::{extract, list_file_names};
use crate::models::{BranchRecord, DateWindow};
use crate::sources::{DataSource, Detection, Layout};
use crate::summary::CellProvider;

/// Base directory of each data source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRoots {
    pub trnm: PathBuf,
    pub svacc: PathBuf,
    pub lnacc: PathBuf,
    pub gl: PathBuf,
    pub aging: PathBuf,
    pub tb: PathBuf,
}

impl SourceRoots {
    /// Conventional layout: one folder per source under `base`.
    #[cfg(test)]
    pub fn under(base: &Path) -> Self {
        Self {
            trnm: base.join("TRNM"),
            svacc: base.join("SVACC"),
            lnacc: base.join("LNACC"),
            gl: base.join("GL"),
            aging: base.join("AGING"),
            tb: base.join("TB"),
        }
    }

    pub fn root(&self, source: DataSource) -> &Path {
        match source {
            DataSource::Trnm => &self.trnm,
            DataSource::Svacc => &self.svacc,
            DataSource::Lnacc => &self.lnacc,
            DataSource::Gl => &self.gl,
            DataSource::Aging => &self.aging,
            DataSource::Tb => &self.tb,
        }
    }
}

/// What the aggregator looked at for one branch and source.
#[derive(Debug, Clone)]
pub struct CellDetail {
    pub tokens: BranchTokens,
    pub search_dir: PathBuf,
    pub window: DateWindow,
}

/// One aggregator for all six sources, driven by the `DataSource` table.
#[derive(Debug, Clone)]
pub struct Aggregator {
    roots: SourceRoots,
    resolver: BranchResolver,
}

impl Aggregator {
    pub fn new(roots: SourceRoots, resolver: BranchResolver) -> Self {
        Self { roots, resolver }
    }

    /// Directory scanned for a branch: its subfolder, or the flat root.
    pub fn search_dir(&self, tokens: &BranchTokens, source: DataSource) -> PathBuf {
        let root = self.roots.root(source);
        match source.layout() {
            Layout::PerBranchSubfolder => root.join(&tokens.folder_token),
            Layout::FlatAtRoot => root.to_path_buf(),
        }
    }

    pub fn inspect(&self, branch: &str, source: DataSource) -> Result<CellDetail> {
        let tokens = self.resolver.resolve(branch, source);
        let search_dir = self.search_dir(&tokens, source);
        let window = match source.detection() {
            Detection::FileName => {
                let names = list_file_names(&search_dir, source.layout())?;
                let patterns = source.filename_patterns(&tokens)?;
                extract(names.iter().map(String::as_str), &patterns, source.shape())
            }
            Detection::Content => content_dates::scan_dir(&search_dir),
        };
        Ok(CellDetail {
            tokens,
            search_dir,
            window,
        })
    }

    pub fn window(&self, branch: &str, source: DataSource) -> Result<DateWindow> {
        Ok(self.inspect(branch, source)?.window)
    }
}

impl CellProvider for Aggregator {
    fn cell(&self, branch: &str, source: DataSource) -> Result<String> {
        Ok(self.window(branch, source)?.display())
    }

    fn audit_roster(&self, branches: &[BranchRecord]) {
        for (abbr, names) in self.resolver.abbreviation_collisions(branches) {
            log::warn!(
                "Branches {} share transaction-log code {abbr}; add an abbreviation override",
                names.join(", ")
            );
        }
    }
}
