use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Data dir with a BULUA/CARMEN roster and two BULUA transaction logs.
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let ws = Self { dir };
        let settings = serde_json::json!({ "data_dir": ws.data().to_string_lossy() });
        std::fs::create_dir_all(ws.data()).unwrap();
        std::fs::write(ws.config(), settings.to_string()).unwrap();
        std::fs::write(ws.data().join("branches.csv"), "NO,BRANCH\n1,BULUA\n2,CARMEN\n").unwrap();
        ws.touch("TRNM/BULUA", "BUL LN RELEASES - 06-01-2023 TO 06-15-2023.csv");
        ws.touch("TRNM/BULUA", "BUL DEP SAVINGS - 06-16-2023 TO 06-30-2023.csv");
        ws.touch("SVACC", "CARMEN - 05-31-2023.csv");
        ws
    }

    fn data(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    fn config(&self) -> PathBuf {
        self.dir.path().join("settings.json")
    }

    fn touch(&self, folder: &str, name: &str) {
        let dir = self.data().join(folder);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(name), "").unwrap();
    }

    #[allow(deprecated)]
    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("branchwatch").unwrap();
        cmd.env("BRANCHWATCH_CONFIG", self.config())
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG");
        cmd
    }
}

fn json_output(cmd: &mut Command) -> serde_json::Value {
    let out = cmd.output().unwrap();
    serde_json::from_slice(&out.stdout).unwrap()
}

fn row<'a>(doc: &'a serde_json::Value, branch: &str) -> &'a serde_json::Value {
    doc["rows"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["BRANCH"] == branch)
        .unwrap()
}

#[test]
fn test_sources_lists_all_six() {
    let ws = Workspace::new();
    ws.cmd()
        .arg("sources")
        .assert()
        .success()
        .stdout(predicate::str::contains("TRNM"))
        .stdout(predicate::str::contains("AGING"))
        .stdout(predicate::str::contains("MM-DD-YYYY.xlsx"));
}

#[test]
fn test_summary_json_end_to_end() {
    let ws = Workspace::new();
    let doc = json_output(ws.cmd().args(["summary", "--format", "json"]));
    assert_eq!(doc["ok"], true);
    let names: Vec<&str> = doc["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["BRANCH"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["BULUA", "CARMEN", "HEAD OFFICE"]);
    assert_eq!(row(&doc, "BULUA")["TRNM"], "06/01/2023 to 06/30/2023");
    assert_eq!(row(&doc, "CARMEN")["TRNM"], "-");
    assert_eq!(row(&doc, "CARMEN")["SVACC"], "05/31/2023");
    assert_eq!(row(&doc, "HEAD OFFICE")["ACCLIST"], "-");
}

#[test]
fn test_summary_text_table() {
    let ws = Workspace::new();
    ws.cmd()
        .arg("summary")
        .assert()
        .success()
        .stdout(predicate::str::contains("BRANCH"))
        .stdout(predicate::str::contains("06/01/2023 to 06/30/2023"))
        .stdout(predicate::str::contains("3 branches"));
}

#[test]
fn test_summary_csv_to_file() {
    let ws = Workspace::new();
    let out = ws.dir.path().join("exports").join("summary.csv");
    ws.cmd()
        .args(["summary", "--format", "csv", "--output"])
        .arg(&out)
        .assert()
        .success();
    let content = std::fs::read_to_string(&out).unwrap();
    assert!(content.starts_with("BRANCH,TRNM,SVACC,LNACC,GL,ACCLIST,AGING,TB"));
    assert!(content.contains("BULUA,06/01/2023 to 06/30/2023,-,-,-,-,-,-"));
}

#[test]
fn test_missing_roster_is_an_error() {
    let ws = Workspace::new();
    std::fs::remove_file(ws.data().join("branches.csv")).unwrap();
    ws.cmd()
        .arg("summary")
        .assert()
        .failure()
        .stderr(predicate::str::contains("roster file not found"));

    let doc = json_output(ws.cmd().args(["summary", "--format", "json"]));
    assert_eq!(doc["ok"], false);
    assert_eq!(doc["rows"].as_array().unwrap().len(), 0);
}

#[test]
fn test_branch_detail() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["branch", "bulua", "--source", "trnm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("BULUA"))
        .stdout(predicate::str::contains("06/01/2023 to 06/30/2023"));

    ws.cmd()
        .args(["branch", "NOWHERE"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown branch"));
}

#[test]
fn test_save_and_history() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["summary", "--save"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved snapshot #1"));
    ws.cmd()
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("Snapshots"));
    ws.cmd()
        .args(["history", "--branch", "BULUA"])
        .assert()
        .success()
        .stdout(predicate::str::contains("06/01/2023 to 06/30/2023"));
}

#[test]
fn test_watch_quits_on_q() {
    let ws = Workspace::new();
    ws.cmd()
        .arg("watch")
        .write_stdin("\nr\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("BULUA").count(3));
}

#[test]
fn test_init_creates_source_folders() {
    let ws = Workspace::new();
    let fresh = ws.dir.path().join("fresh");
    std::fs::create_dir_all(&fresh).unwrap();
    ws.cmd()
        .arg("init")
        .arg("--data-dir")
        .arg(&fresh)
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized branchwatch"));
    for source in ["TRNM", "SVACC", "LNACC", "GL", "AGING", "TB"] {
        assert!(exists_under(&fresh, source), "missing {source}");
    }
    assert!(exists_under(&fresh, "branchwatch.db"));
}

fn exists_under(root: &Path, name: &str) -> bool {
    std::fs::canonicalize(root).unwrap().join(name).exists()
}
