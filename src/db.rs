use std::path::Path;

use rusqlite::Connection;

use crate::error::Result;
use crate::models::SummaryRow;
use crate::sources::ALL_SOURCES;

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS snapshots (
    id INTEGER PRIMARY KEY,
    computed_at TEXT NOT NULL,
    branch_count INTEGER NOT NULL,
    saved_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS snapshot_cells (
    id INTEGER PRIMARY KEY,
    snapshot_id INTEGER NOT NULL,
    branch TEXT NOT NULL,
    source TEXT NOT NULL,
    value TEXT NOT NULL,
    FOREIGN KEY (snapshot_id) REFERENCES snapshots(id)
);

CREATE INDEX IF NOT EXISTS idx_snapshot_cells_branch ON snapshot_cells(branch);
";

#[derive(Debug, Clone)]
pub struct SnapshotRecord {
    pub id: i64,
    pub computed_at: String,
    pub branch_count: i64,
}

/// A saved cell joined with its snapshot time.
#[derive(Debug, Clone)]
pub struct SnapshotCell {
    pub snapshot_id: i64,
    pub computed_at: String,
    pub source: String,
    pub value: String,
}

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

/// Store every source cell of a summary table. Returns the snapshot id.
pub fn save_snapshot(conn: &mut Connection, computed_at: &str, rows: &[SummaryRow]) -> Result<i64> {
    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO snapshots (computed_at, branch_count) VALUES (?1, ?2)",
        rusqlite::params![computed_at, rows.len() as i64],
    )?;
    let snapshot_id = tx.last_insert_rowid();
    {
        let mut stmt = tx.prepare(
            "INSERT INTO snapshot_cells (snapshot_id, branch, source, value) VALUES (?1, ?2, ?3, ?4)",
        )?;
        for row in rows {
            for &source in ALL_SOURCES {
                stmt.execute(rusqlite::params![
                    snapshot_id,
                    row.branch,
                    source.label(),
                    row.cell(source)
                ])?;
            }
        }
    }
    tx.commit()?;
    Ok(snapshot_id)
}

pub fn list_snapshots(conn: &Connection, limit: usize) -> Result<Vec<SnapshotRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, computed_at, branch_count FROM snapshots ORDER BY id DESC LIMIT ?1",
    )?;
    let rows = stmt
        .query_map([limit as i64], |row| {
            Ok(SnapshotRecord {
                id: row.get(0)?,
                computed_at: row.get(1)?,
                branch_count: row.get(2)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Saved cells for one branch, newest snapshot first.
pub fn snapshot_cells_for_branch(
    conn: &Connection,
    branch: &str,
    limit: usize,
) -> Result<Vec<SnapshotCell>> {
    let mut stmt = conn.prepare(
        "SELECT c.snapshot_id, s.computed_at, c.source, c.value
         FROM snapshot_cells c
         JOIN snapshots s ON s.id = c.snapshot_id
         WHERE c.snapshot_id IN (
             SELECT DISTINCT snapshot_id FROM snapshot_cells WHERE branch = ?1
             ORDER BY snapshot_id DESC LIMIT ?2
         ) AND c.branch = ?1
         ORDER BY c.snapshot_id DESC, c.id",
    )?;
    let rows = stmt
        .query_map(rusqlite::params![branch, limit as i64], |row| {
            Ok(SnapshotCell {
                snapshot_id: row.get(0)?,
                computed_at: row.get(1)?,
                source: row.get(2)?,
                value: row.get(3)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}
