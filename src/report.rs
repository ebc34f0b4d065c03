use colored::Colorize;
use comfy_table::{Cell, Table};
use serde::Serialize;

use crate::cache::Summary;
use crate::error::{BranchwatchError, Result};
use crate::fmt::NO_DATA;
use crate::models::SummaryRow;

/// JSON document handed to the web layer.
#[derive(Debug, Serialize)]
pub struct SummaryResponse<'a> {
    pub ok: bool,
    pub error: Option<&'a str>,
    pub computed_at: String,
    pub cached: bool,
    pub rows: &'a [SummaryRow],
}

impl<'a> SummaryResponse<'a> {
    pub fn from_summary(summary: &'a Summary) -> Self {
        Self {
            ok: summary.error.is_none(),
            error: summary.error.as_deref(),
            computed_at: summary.computed_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            cached: summary.cached,
            rows: &summary.rows,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Csv,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(BranchwatchError::Other(format!(
                "unknown format '{other}' (expected text, csv or json)"
            ))),
        }
    }
}

pub fn render(summary: &Summary, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(format_table(&summary.rows)),
        OutputFormat::Csv => to_csv(&summary.rows),
        OutputFormat::Json => to_json(summary),
    }
}

pub fn format_table(rows: &[SummaryRow]) -> String {
    let mut table = Table::new();
    table.set_header(SummaryRow::HEADERS.to_vec());
    for row in rows {
        let cells: Vec<Cell> = row
            .values()
            .iter()
            .enumerate()
            .map(|(i, v)| {
                if i == 0 {
                    Cell::new(v.bold())
                } else if *v == NO_DATA {
                    Cell::new(v.dimmed())
                } else {
                    Cell::new(v)
                }
            })
            .collect();
        table.add_row(cells);
    }
    table.to_string()
}

pub fn to_csv(rows: &[SummaryRow]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(SummaryRow::HEADERS)?;
    for row in rows {
        wtr.write_record(row.values())?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| BranchwatchError::Other(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| BranchwatchError::Other(e.to_string()))
}

pub fn to_json(summary: &Summary) -> Result<String> {
    serde_json::to_string_pretty(&SummaryResponse::from_summary(summary))
        .map_err(|e| BranchwatchError::Other(e.to_string()))
}
