use colored::Colorize;

use crate::error::Result;
use crate::settings::{load_settings, settings_path};
use crate::sources::ALL_SOURCES;

pub fn run() -> Result<()> {
    let settings = load_settings();
    let roster = settings.roster();

    println!("Settings:   {}", settings_path().display());
    println!("Data dir:   {}", settings.data_path().display());
    println!(
        "Roster:     {} {}",
        roster.display(),
        if roster.is_file() { "".normal() } else { "(missing)".red() }
    );
    println!("Cache TTL:  {}s", settings.cache_ttl_secs);
    println!();

    let roots = settings.source_roots();
    for &source in ALL_SOURCES {
        let root = roots.root(source);
        let state = if root.is_dir() { "ok".green() } else { "missing".red() };
        println!("{:<6} {:<8} {}", source.label(), state, root.display());
    }

    if !settings.abbreviations.is_empty() {
        println!();
        println!("Abbreviation overrides:");
        for (branch, abbr) in &settings.abbreviations {
            println!("  {abbr}  {branch}");
        }
    }
    Ok(())
}
