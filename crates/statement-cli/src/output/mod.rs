pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;
use statement_core::view::TableView;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// The `view` grid attached by every command, if present and well-formed.
fn view_of(value: &Value) -> Option<TableView> {
    value
        .get("view")
        .and_then(|v| serde_json::from_value(v.clone()).ok())
}
