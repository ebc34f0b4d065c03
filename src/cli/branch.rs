use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::aggregate::Aggregator;
use crate::error::{BranchwatchError, Result};
use crate::loader::load_roster;
use crate::models::HEAD_OFFICE;
use crate::settings::load_settings;
use crate::sources::{get_by_label, DataSource, ALL_SOURCES};

pub fn run(name: &str, source: Option<&str>) -> Result<()> {
    let settings = load_settings();
    let sources: Vec<DataSource> = match source {
        Some(label) => vec![get_by_label(label)
            .ok_or_else(|| BranchwatchError::UnknownSource(label.to_string()))?],
        None => ALL_SOURCES.to_vec(),
    };

    let branch = canonical_branch(name, &settings.roster())?;
    let aggregator = Aggregator::new(settings.source_roots(), settings.resolver());

    let mut table = Table::new();
    table.set_header(vec!["Source", "Folder", "Filename token", "Searched", "Dates"]);
    for source in sources {
        match aggregator.inspect(&branch, source) {
            Ok(detail) => {
                let searched = if detail.search_dir.is_dir() {
                    detail.search_dir.display().to_string()
                } else {
                    format!("{} (missing)", detail.search_dir.display())
                };
                table.add_row(vec![
                    Cell::new(source.label()),
                    Cell::new(&detail.tokens.folder_token),
                    Cell::new(&detail.tokens.filename_token),
                    Cell::new(searched),
                    if detail.window.is_empty() {
                        Cell::new(detail.window.display().dimmed())
                    } else {
                        Cell::new(detail.window.display())
                    },
                ]);
            }
            Err(e) => {
                table.add_row(vec![
                    Cell::new(source.label()),
                    Cell::new(""),
                    Cell::new(""),
                    Cell::new(""),
                    Cell::new(format!("error: {e}").red()),
                ]);
            }
        }
    }
    println!("{}\n{table}", branch.bold());
    Ok(())
}

/// Match a user-typed name against the roster, ignoring case and
/// space/underscore differences. Without a readable roster the name is
/// used as typed.
fn canonical_branch(name: &str, roster_path: &std::path::Path) -> Result<String> {
    let key = |s: &str| s.trim().replace('_', " ").to_uppercase();
    let wanted = key(name);
    if wanted == HEAD_OFFICE {
        return Ok(HEAD_OFFICE.to_string());
    }
    match load_roster(roster_path) {
        Ok(roster) => roster
            .into_iter()
            .find(|b| key(&b.name) == wanted)
            .map(|b| b.name)
            .ok_or_else(|| BranchwatchError::UnknownBranch(name.to_string())),
        Err(e) => {
            log::warn!("{e}; using '{}' as given", name.trim());
            Ok(name.trim().to_string())
        }
    }
}
