use clap::Args;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use tracing::debug;

use statement_core::statements::{SheetGrid, Workbook};

use super::file;

/// Where the workbook comes from. Without either flag, JSON is read from stdin.
#[derive(Args)]
pub struct SourceArgs {
    /// JSON workbook: {"sheets": [{"name": ..., "rows": [[...]]}]}
    #[arg(long, conflicts_with = "sheet_dir")]
    pub input: Option<String>,

    /// Directory of `<sheet name>.csv` files, one per sheet
    #[arg(long)]
    pub sheet_dir: Option<String>,
}

pub fn load_workbook(source: &SourceArgs) -> Result<Workbook, Box<dyn std::error::Error>> {
    if let Some(ref path) = source.input {
        file::read_json(path)
    } else if let Some(ref dir) = source.sheet_dir {
        read_sheet_dir(dir)
    } else if let Some(workbook) = read_piped_workbook()? {
        Ok(workbook)
    } else {
        Err("--input or --sheet-dir is required (or pipe a JSON workbook on stdin)".into())
    }
}

/// A JSON workbook piped on stdin; None when stdin is a TTY or empty.
fn read_piped_workbook() -> Result<Option<Workbook>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    if buffer.trim().is_empty() {
        return Ok(None);
    }
    let workbook = serde_json::from_str(&buffer)
        .map_err(|e| format!("Failed to parse workbook from stdin: {}", e))?;
    Ok(Some(workbook))
}

fn read_sheet_dir(dir: &str) -> Result<Workbook, Box<dyn std::error::Error>> {
    let root = file::resolve_dir(dir)?;
    let mut paths: Vec<_> = fs::read_dir(&root)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("csv")))
        .collect();
    paths.sort();

    let mut sheets = Vec::with_capacity(paths.len());
    for path in paths {
        sheets.push(read_csv_sheet(&path)?);
    }
    if sheets.is_empty() {
        return Err(format!("No .csv sheets in {}", root.display()).into());
    }
    Ok(Workbook { sheets })
}

fn read_csv_sheet(path: &Path) -> Result<SheetGrid, Box<dyn std::error::Error>> {
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| format!("Unreadable sheet name: {}", path.display()))?
        .to_string();

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| format!("Failed to parse '{}': {}", path.display(), e))?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    debug!(sheet = %name, rows = rows.len(), "read csv sheet");
    Ok(SheetGrid { name, rows })
}
