use serde_json::Value;

use super::view_of;

/// Print one line per row: the label and its most recent value.
pub fn print_minimal(value: &Value) {
    let Some(view) = view_of(value) else {
        println!("{}", value);
        return;
    };

    for row in &view.rows {
        let first = row
            .cells
            .first()
            .map(|c| c.value.display())
            .unwrap_or_default();
        println!("{}: {}", row.label.trim_end(), first);
    }
}
