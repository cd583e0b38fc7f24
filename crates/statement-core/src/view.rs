//! Presentation-neutral grids for statements and ratio tables.
//!
//! Cells carry optional tags (growth sign, benchmark classification) so a
//! consumer can colour them without re-deriving anything.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisKind, AugmentedStatement, ColumnRef};
use crate::ratios::{BenchmarkReport, Classification, RatioTable};
use crate::statements::{CashFlowSeries, NormalizedStatement};
use crate::types::{Cell, Period};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellTag {
    Positive,
    Negative,
    Favorable,
    Unfavorable,
    Neutral,
}

impl From<Classification> for CellTag {
    fn from(c: Classification) -> Self {
        match c {
            Classification::Favorable => CellTag::Favorable,
            Classification::Unfavorable => CellTag::Unfavorable,
            Classification::Neutral => CellTag::Neutral,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    Number(Decimal),
    Text(String),
    Missing,
}

impl CellValue {
    pub fn display(&self) -> String {
        match self {
            CellValue::Number(d) => d.to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::Missing => "-".to_string(),
        }
    }
}

impl From<Cell> for CellValue {
    fn from(cell: Cell) -> Self {
        cell.map_or(CellValue::Missing, CellValue::Number)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewCell {
    pub value: CellValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<CellTag>,
}

impl ViewCell {
    fn plain(value: impl Into<CellValue>) -> Self {
        ViewCell {
            value: value.into(),
            tag: None,
        }
    }

    fn tagged(value: Cell, tag: Option<CellTag>) -> Self {
        ViewCell {
            value: value.into(),
            tag: value.and(tag),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewRow {
    pub label: String,
    pub cells: Vec<ViewCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableView {
    pub title: String,
    /// Header of the label column.
    pub label_header: String,
    pub columns: Vec<String>,
    pub rows: Vec<ViewRow>,
}

fn period_headers(periods: &[Period]) -> Vec<String> {
    periods.iter().map(|p| p.label.clone()).collect()
}

fn sign(value: Cell) -> Option<CellTag> {
    match value? {
        v if v.is_sign_negative() && !v.is_zero() => Some(CellTag::Negative),
        v if v.is_zero() => None,
        _ => Some(CellTag::Positive),
    }
}

impl TableView {
    pub fn from_statement(statement: &NormalizedStatement) -> Self {
        let rows = statement
            .display_labels()
            .into_iter()
            .zip(&statement.rows)
            .map(|(label, row)| ViewRow {
                label,
                cells: row.values.iter().map(|v| ViewCell::plain(*v)).collect(),
            })
            .collect();
        TableView {
            title: capitalize(&statement.kind.to_string()),
            label_header: "Line item".into(),
            columns: period_headers(&statement.periods),
            rows,
        }
    }

    /// Period and analysis columns in presentation order; growth cells are
    /// tagged with their sign.
    pub fn from_augmented(augmented: &AugmentedStatement) -> Self {
        let statement = &augmented.statement;
        let rows = statement
            .display_labels()
            .into_iter()
            .enumerate()
            .map(|(i, label)| ViewRow {
                label,
                cells: augmented
                    .order
                    .iter()
                    .map(|&col| {
                        let value = augmented.value(i, col);
                        match col {
                            ColumnRef::Analysis(c)
                                if matches!(augmented.columns[c].kind, AnalysisKind::Growth { .. }) =>
                            {
                                ViewCell::tagged(value, sign(value))
                            }
                            _ => ViewCell::plain(value),
                        }
                    })
                    .collect(),
            })
            .collect();
        TableView {
            title: capitalize(&format!("{} analysis", statement.kind)),
            label_header: "Line item".into(),
            columns: augmented.headers(),
            rows,
        }
    }

    pub fn from_cash_flows(series: &CashFlowSeries) -> Self {
        TableView {
            title: "Cash flows".into(),
            label_header: "Series".into(),
            columns: period_headers(&series.periods),
            rows: vec![
                ViewRow {
                    label: "OCF".into(),
                    cells: series.operating.iter().map(|v| ViewCell::plain(*v)).collect(),
                },
                ViewRow {
                    label: "FCF".into(),
                    cells: series.free.iter().map(|v| ViewCell::plain(*v)).collect(),
                },
            ],
        }
    }

    pub fn from_ratios(table: &RatioTable) -> Self {
        TableView {
            title: "Financial ratios".into(),
            label_header: "Ratio".into(),
            columns: table.periods.iter().map(Period::short).collect(),
            rows: table
                .records
                .iter()
                .map(|r| ViewRow {
                    label: r.name.clone(),
                    cells: r.values.iter().map(|v| ViewCell::plain(*v)).collect(),
                })
                .collect(),
        }
    }

    /// Ratio values tagged by classification, then the comparison operator
    /// and the benchmark average.
    pub fn from_benchmark(report: &BenchmarkReport) -> Self {
        let mut columns: Vec<String> = report.periods.iter().map(Period::short).collect();
        columns.push("Comparison".into());
        columns.push("Average".into());

        let rows = report
            .rows
            .iter()
            .map(|r| {
                let mut cells: Vec<ViewCell> = r
                    .values
                    .iter()
                    .zip(&r.classes)
                    .map(|(v, c)| ViewCell::tagged(*v, c.map(CellTag::from)))
                    .collect();
                cells.push(ViewCell::plain(CellValue::Text(r.comparison.symbol().into())));
                cells.push(ViewCell::plain(Some(r.average)));
                ViewRow {
                    label: r.name.clone(),
                    cells,
                }
            })
            .collect();

        TableView {
            title: "Financial ratios vs benchmarks".into(),
            label_header: "Ratio".into(),
            columns,
            rows,
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
