use std::path::PathBuf;

use colored::Colorize;

use crate::cache::Summary;
use crate::db::{get_connection, init_db, save_snapshot};
use crate::error::{BranchwatchError, Result};
use crate::fmt;
use crate::report::{render, OutputFormat};
use crate::settings::{load_settings, Settings};

pub fn run(refresh: bool, format: &str, output: Option<String>, save: bool) -> Result<()> {
    let format = OutputFormat::parse(format)?;
    let settings = load_settings();
    let service = super::service(&settings);

    let summary = service.get_summary(refresh);
    let rendered = render(&summary, format)?;

    match output {
        Some(path) => {
            let p = PathBuf::from(&path);
            if let Some(parent) = p.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&p, &rendered)?;
            println!("Wrote {}", p.display());
        }
        None => {
            println!("{rendered}");
            if format == OutputFormat::Text {
                print_footer(&summary);
            }
        }
    }

    if save {
        save_summary(&settings, &summary)?;
    }

    // JSON consumers read the error from the document itself
    match &summary.error {
        Some(e) if format != OutputFormat::Json => Err(BranchwatchError::Other(e.clone())),
        _ => Ok(()),
    }
}

pub(crate) fn print_footer(summary: &Summary) {
    let age = (chrono::Local::now() - summary.computed_at).num_seconds();
    let source = if summary.cached { "cached" } else { "computed" };
    println!(
        "{} branches, {} {}",
        summary.rows.len(),
        source,
        fmt::age(age).dimmed()
    );
}

fn save_summary(settings: &Settings, summary: &Summary) -> Result<()> {
    if summary.error.is_some() {
        println!("Not saving a snapshot of an empty table.");
        return Ok(());
    }
    let mut conn = get_connection(&settings.db_path())?;
    init_db(&conn)?;
    let computed_at = summary.computed_at.format("%Y-%m-%d %H:%M:%S").to_string();
    let id = save_snapshot(&mut conn, &computed_at, &summary.rows)?;
    println!("Saved snapshot #{id}");
    Ok(())
}
