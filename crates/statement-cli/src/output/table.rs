use colored::Colorize;
use serde_json::Value;
use tabled::{builder::Builder, Table};

use statement_core::view::{CellTag, TableView, ViewCell};

use super::view_of;

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    match view_of(value) {
        Some(view) => print_view(&view),
        None => print_flat_object(value),
    }

    if let Value::Object(map) = value {
        // Print warnings if any
        if let Some(Value::Array(warnings)) = map.get("warnings") {
            if !warnings.is_empty() {
                println!("\n{}", "Warnings:".yellow());
                for w in warnings {
                    if let Value::String(s) = w {
                        println!("  - {}", s);
                    }
                }
            }
        }

        // Print methodology
        if let Some(Value::String(meth)) = map.get("methodology") {
            println!("\nMethodology: {}", meth);
        }
    }
}

fn print_view(view: &TableView) {
    let mut builder = Builder::default();
    builder.push_record(std::iter::once(view.label_header.clone()).chain(view.columns.iter().cloned()));
    for row in &view.rows {
        builder.push_record(std::iter::once(row.label.clone()).chain(row.cells.iter().map(paint)));
    }
    println!("{}", view.title.bold());
    println!("{}", Table::from(builder));
}

fn paint(cell: &ViewCell) -> String {
    let text = cell.value.display();
    match cell.tag {
        Some(CellTag::Positive) | Some(CellTag::Favorable) => text.green().to_string(),
        Some(CellTag::Negative) | Some(CellTag::Unfavorable) => text.red().to_string(),
        Some(CellTag::Neutral) => text.yellow().to_string(),
        None => text,
    }
}

fn print_flat_object(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.as_str(), &format_value(val)]);
        }
        println!("{}", Table::from(builder));
    } else {
        println!("{}", value);
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
