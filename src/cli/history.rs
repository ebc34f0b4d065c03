use comfy_table::{Cell, Table};

use crate::db::{get_connection, init_db, list_snapshots, snapshot_cells_for_branch};
use crate::error::Result;
use crate::settings::load_settings;

pub fn run(branch: Option<&str>, limit: usize) -> Result<()> {
    let settings = load_settings();
    let db_path = settings.db_path();
    if !db_path.exists() {
        println!("No snapshots yet. Run `branchwatch summary --save` to record one.");
        return Ok(());
    }
    let conn = get_connection(&db_path)?;
    init_db(&conn)?;

    let mut table = Table::new();
    match branch {
        Some(name) => {
            table.set_header(vec!["Snapshot", "Computed", "Source", "Dates"]);
            for cell in snapshot_cells_for_branch(&conn, name, limit)? {
                table.add_row(vec![
                    Cell::new(cell.snapshot_id),
                    Cell::new(cell.computed_at),
                    Cell::new(cell.source),
                    Cell::new(cell.value),
                ]);
            }
            println!("History for {name}\n{table}");
        }
        None => {
            table.set_header(vec!["Snapshot", "Computed", "Branches"]);
            for snap in list_snapshots(&conn, limit)? {
                table.add_row(vec![
                    Cell::new(snap.id),
                    Cell::new(snap.computed_at),
                    Cell::new(snap.branch_count),
                ]);
            }
            println!("Snapshots\n{table}");
        }
    }
    Ok(())
}
