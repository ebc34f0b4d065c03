use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::settings::load_settings;
use crate::sources::{Detection, Layout, Shape, ALL_SOURCES};

pub fn run() -> Result<()> {
    let roots = load_settings().source_roots();

    let mut table = Table::new();
    table.set_header(vec!["Source", "Name", "Layout", "Result", "Filename", "Root"]);
    for &source in ALL_SOURCES {
        let layout = match source.layout() {
            Layout::PerBranchSubfolder => "per-branch folder",
            Layout::FlatAtRoot => "flat",
        };
        let shape = match (source.shape(), source.detection()) {
            (Shape::Range, Detection::Content) => "range (file content)",
            (Shape::Range, Detection::FileName) => "range",
            (Shape::Latest, _) => "latest",
        };
        table.add_row(vec![
            Cell::new(source.label()),
            Cell::new(source.name()),
            Cell::new(layout),
            Cell::new(shape),
            Cell::new(source.grammar()),
            Cell::new(roots.root(source).display()),
        ]);
    }
    println!("{table}");
    Ok(())
}
