use serde_json::{json, Value};

use statement_core::ratios::BenchmarkTable;
use statement_core::view::{CellValue, TableView, ViewCell, ViewRow};

pub fn run_benchmarks() -> Result<Value, Box<dyn std::error::Error>> {
    let table = BenchmarkTable::standard();
    let rows = table
        .entries
        .iter()
        .map(|e| ViewRow {
            label: e.name.clone(),
            cells: vec![
                ViewCell {
                    value: CellValue::Text(e.comparison.symbol().into()),
                    tag: None,
                },
                ViewCell {
                    value: CellValue::Number(e.average),
                    tag: None,
                },
            ],
        })
        .collect();
    let view = TableView {
        title: "Benchmarks".into(),
        label_header: "Ratio".into(),
        columns: vec!["Comparison".into(), "Average".into()],
        rows,
    };
    Ok(json!({ "result": table, "view": view }))
}
