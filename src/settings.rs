use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::aggregate::SourceRoots;
use crate::branch::{BranchResolver, DEFAULT_ABBREVIATIONS};
use crate::cache::DEFAULT_TTL_SECS;
use crate::error::{BranchwatchError, Result};

/// Overrides the settings file location.
pub const CONFIG_ENV: &str = "BRANCHWATCH_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub data_dir: String,
    #[serde(default = "default_roster_path")]
    pub roster_path: String,
    #[serde(default = "default_trnm_dir")]
    pub trnm_dir: String,
    #[serde(default = "default_svacc_dir")]
    pub svacc_dir: String,
    #[serde(default = "default_lnacc_dir")]
    pub lnacc_dir: String,
    #[serde(default = "default_gl_dir")]
    pub gl_dir: String,
    #[serde(default = "default_aging_dir")]
    pub aging_dir: String,
    #[serde(default = "default_tb_dir")]
    pub tb_dir: String,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: i64,
    /// Transaction-log codes for branches that don't use their first three letters.
    #[serde(default = "default_abbreviations")]
    pub abbreviations: BTreeMap<String, String>,
}

fn default_roster_path() -> String {
    "branches.csv".to_string()
}
fn default_trnm_dir() -> String {
    "TRNM".to_string()
}
fn default_svacc_dir() -> String {
    "SVACC".to_string()
}
fn default_lnacc_dir() -> String {
    "LNACC".to_string()
}
fn default_gl_dir() -> String {
    "GL".to_string()
}
fn default_aging_dir() -> String {
    "AGING".to_string()
}
fn default_tb_dir() -> String {
    "TB".to_string()
}
fn default_cache_ttl_secs() -> i64 {
    DEFAULT_TTL_SECS
}
fn default_abbreviations() -> BTreeMap<String, String> {
    DEFAULT_ABBREVIATIONS
        .iter()
        .map(|(b, a)| (b.to_string(), a.to_string()))
        .collect()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir().to_string_lossy().to_string(),
            roster_path: default_roster_path(),
            trnm_dir: default_trnm_dir(),
            svacc_dir: default_svacc_dir(),
            lnacc_dir: default_lnacc_dir(),
            gl_dir: default_gl_dir(),
            aging_dir: default_aging_dir(),
            tb_dir: default_tb_dir(),
            cache_ttl_secs: default_cache_ttl_secs(),
            abbreviations: default_abbreviations(),
        }
    }
}

impl Settings {
    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(shellexpand_path(&self.data_dir))
    }

    /// Resolve a configured path: `~` expands, relative paths sit under `data_dir`.
    pub fn resolve(&self, path: &str) -> PathBuf {
        let expanded = PathBuf::from(shellexpand_path(path));
        if expanded.is_absolute() {
            expanded
        } else {
            self.data_path().join(expanded)
        }
    }

    pub fn roster(&self) -> PathBuf {
        self.resolve(&self.roster_path)
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_path().join("branchwatch.db")
    }

    pub fn source_roots(&self) -> SourceRoots {
        SourceRoots {
            trnm: self.resolve(&self.trnm_dir),
            svacc: self.resolve(&self.svacc_dir),
            lnacc: self.resolve(&self.lnacc_dir),
            gl: self.resolve(&self.gl_dir),
            aging: self.resolve(&self.aging_dir),
            tb: self.resolve(&self.tb_dir),
        }
    }

    pub fn resolver(&self) -> BranchResolver {
        BranchResolver::new(self.abbreviations.clone())
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("branchwatch")
}

pub fn settings_path() -> PathBuf {
    match std::env::var_os(CONFIG_ENV) {
        Some(p) if !p.is_empty() => PathBuf::from(p),
        _ => config_dir().join("settings.json"),
    }
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("branchwatch")
}

pub fn load_settings() -> Settings {
    load_settings_from(&settings_path())
}

pub fn load_settings_from(path: &Path) -> Settings {
    if path.exists() {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable settings at {}: {e}", path.display());
            Settings::default()
        })
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    save_settings_to(settings, &settings_path())
}

pub fn save_settings_to(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| BranchwatchError::Settings(e.to_string()))?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    path.to_string()
}
