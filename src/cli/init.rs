use std::path::PathBuf;

use crate::db::{get_connection, init_db};
use crate::error::Result;
use crate::settings::{load_settings, save_settings, settings_path, shellexpand_path, Settings};
use crate::sources::ALL_SOURCES;

pub fn run(data_dir: Option<String>, roster: Option<String>) -> Result<()> {
    let mut settings = load_settings();
    let defaults = Settings::default();

    if let Some(dir) = data_dir {
        settings.data_dir = absolute(&dir);
    } else if !settings_path().exists() && settings.data_dir == defaults.data_dir {
        // First run: prompt for data dir
        println!("Data directory [{}]: ", settings.data_dir);
        let mut input = String::new();
        std::io::stdin().read_line(&mut input).ok();
        let chosen = input.trim();
        if !chosen.is_empty() {
            settings.data_dir = absolute(chosen);
        }
    }
    if let Some(roster) = roster {
        settings.roster_path = roster;
    }

    save_settings(&settings)?;

    let resolved = settings.data_path();
    std::fs::create_dir_all(&resolved)?;
    let roots = settings.source_roots();
    for &source in ALL_SOURCES {
        std::fs::create_dir_all(roots.root(source))?;
    }

    let conn = get_connection(&settings.db_path())?;
    init_db(&conn)?;

    println!("Initialized branchwatch at {}", resolved.display());
    if !settings.roster().exists() {
        println!("Add a roster with a BRANCH column at {}", settings.roster().display());
    }
    Ok(())
}

fn absolute(path: &str) -> String {
    let expanded = PathBuf::from(shellexpand_path(path));
    std::fs::canonicalize(&expanded)
        .unwrap_or(expanded)
        .to_string_lossy()
        .to_string()
}
