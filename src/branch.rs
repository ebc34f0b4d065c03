use std::collections::BTreeMap;

use crate::models::BranchRecord;
use crate::sources::DataSource;

/// Branches whose transaction-log abbreviation is not their first three
/// letters. Settings may override or extend this table.
pub const DEFAULT_ABBREVIATIONS: &[(&str, &str)] = &[
    ("MANOLO FORTICH", "MFT"),
    ("DON CARLOS", "DCL"),
];

/// On-disk tokens for one branch under one source's naming convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchTokens {
    /// Subfolder name: spaces become underscores, upper-cased.
    pub folder_token: String,
    /// Regex fragment identifying the branch inside a filename.
    pub filename_token: String,
}

#[derive(Debug, Clone)]
pub struct BranchResolver {
    abbreviations: BTreeMap<String, String>,
}

impl Default for BranchResolver {
    fn default() -> Self {
        Self::new(
            DEFAULT_ABBREVIATIONS
                .iter()
                .map(|(b, a)| (b.to_string(), a.to_string())),
        )
    }
}

impl BranchResolver {
    pub fn new(exceptions: impl IntoIterator<Item = (String, String)>) -> Self {
        let abbreviations = exceptions
            .into_iter()
            .map(|(branch, abbr)| (normalize(&branch), abbr.trim().to_uppercase()))
            .collect();
        Self { abbreviations }
    }

    pub fn resolve(&self, branch: &str, source: DataSource) -> BranchTokens {
        let filename_token = match source {
            DataSource::Trnm => regex::escape(&self.abbreviation(branch)),
            DataSource::Svacc | DataSource::Lnacc | DataSource::Gl => flexible_name_pattern(branch),
            DataSource::Aging | DataSource::Tb => regex::escape(&folder_token(branch)),
        };
        BranchTokens {
            folder_token: folder_token(branch),
            filename_token,
        }
    }

    /// Three-character transaction-log code: the exceptions table first,
    /// otherwise the first three alphanumeric characters, upper-cased.
    pub fn abbreviation(&self, branch: &str) -> String {
        if let Some(abbr) = self.abbreviations.get(&normalize(branch)) {
            return abbr.clone();
        }
        branch
            .chars()
            .filter(|c| c.is_alphanumeric())
            .take(3)
            .collect::<String>()
            .to_uppercase()
    }

    /// Groups of branches sharing one abbreviation. Their transaction logs
    /// cannot be told apart by filename.
    pub fn abbreviation_collisions(&self, branches: &[BranchRecord]) -> Vec<(String, Vec<String>)> {
        let mut by_abbr: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for b in branches {
            by_abbr.entry(self.abbreviation(&b.name)).or_default().push(b.name.clone());
        }
        by_abbr.into_iter().filter(|(_, names)| names.len() > 1).collect()
    }
}

pub fn folder_token(branch: &str) -> String {
    branch.trim().replace(' ', "_").to_uppercase()
}

/// Literal branch name as a regex where every space or underscore accepts either.
pub fn flexible_name_pattern(branch: &str) -> String {
    branch
        .trim()
        .split([' ', '_'])
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("[ _]")
}

fn normalize(branch: &str) -> String {
    branch.trim().replace('_', " ").to_uppercase()
}
