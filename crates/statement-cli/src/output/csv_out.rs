use serde_json::Value;
use std::io;

use statement_core::view::TableView;

use super::view_of;

/// Write output as CSV to stdout: the table view when there is one, else
/// field/value pairs of the result.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match view_of(value) {
        Some(view) => write_view(&mut wtr, &view),
        None => {
            let _ = wtr.write_record(["field", "value"]);
            if let Value::Object(map) = value {
                let fields = map
                    .get("result")
                    .and_then(Value::as_object)
                    .unwrap_or(map);
                for (key, val) in fields {
                    let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
                }
            } else {
                let _ = wtr.write_record(["value", &format_csv_value(value)]);
            }
        }
    }

    let _ = wtr.flush();
}

fn write_view(wtr: &mut csv::Writer<io::StdoutLock<'_>>, view: &TableView) {
    let header: Vec<&str> = std::iter::once(view.label_header.as_str())
        .chain(view.columns.iter().map(String::as_str))
        .collect();
    let _ = wtr.write_record(&header);

    for row in &view.rows {
        let record: Vec<String> = std::iter::once(row.label.clone())
            .chain(row.cells.iter().map(|c| match c.value.display().as_str() {
                "-" => String::new(),
                text => text.to_string(),
            }))
            .collect();
        let _ = wtr.write_record(&record);
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
