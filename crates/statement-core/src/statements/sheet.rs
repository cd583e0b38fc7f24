//! Raw workbook input: named sheets as 2D text grids, and the fixed layouts
//! used to turn a grid into labelled rows under a header line.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AnalysisError;
use crate::AnalysisResult;

/// The three statutory statements a workbook carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    IncomeStatement,
    BalanceSheet,
    CashFlow,
}

impl StatementKind {
    /// Sheet names this statement is published under. The first is the
    /// statutory export name.
    pub fn sheet_names(&self) -> &'static [&'static str] {
        match self {
            Self::IncomeStatement => &["Отчет о финансовых результатах", "Income Statement"],
            Self::BalanceSheet => &["Бухгалтерский баланс", "Balance Sheet"],
            Self::CashFlow => &["Отчет о движении денежных средс", "Cash Flow Statement"],
        }
    }

    pub fn layout(&self) -> SheetLayout {
        match self {
            Self::IncomeStatement => SheetLayout {
                header_row: 4,
                label_column: 4,
            },
            Self::BalanceSheet => SheetLayout {
                header_row: 4,
                label_column: 3,
            },
            Self::CashFlow => SheetLayout {
                header_row: 4,
                label_column: 0,
            },
        }
    }
}

impl std::fmt::Display for StatementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::IncomeStatement => "income statement",
            Self::BalanceSheet => "balance sheet",
            Self::CashFlow => "cash flow statement",
        };
        write!(f, "{}", s)
    }
}

/// Where the header line and the label column sit in a grid (zero-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetLayout {
    pub header_row: usize,
    pub label_column: usize,
}

/// A sheet exactly as decoded from the spreadsheet: rows of cell text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SheetGrid {
    pub name: String,
    #[serde(deserialize_with = "text_cells")]
    pub rows: Vec<Vec<String>>,
}

/// Spreadsheet exports write numeric cells as numbers and blanks as null.
/// Every cell is kept as text; null becomes an empty cell.
fn text_cells<'de, D>(deserializer: D) -> Result<Vec<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<Vec<serde_json::Value>> = Vec::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|v| match v {
                    serde_json::Value::String(s) => s,
                    serde_json::Value::Null => String::new(),
                    other => other.to_string(),
                })
                .collect()
        })
        .collect())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Workbook {
    pub sheets: Vec<SheetGrid>,
}

impl Workbook {
    /// Find the sheet for a statement, matching names case-insensitively.
    pub fn sheet(&self, kind: StatementKind) -> AnalysisResult<&SheetGrid> {
        let names = kind.sheet_names();
        self.sheets
            .iter()
            .find(|s| {
                let name = s.name.trim().to_lowercase();
                names.iter().any(|n| n.to_lowercase() == name)
            })
            .ok_or_else(|| AnalysisError::StatementNotFound {
                sheet: names[0].to_string(),
            })
    }
}

/// One labelled row. `cells` align with `RawSheet::headers`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    pub label: String,
    pub cells: Vec<String>,
}

/// A sheet split into header cells and labelled rows. The label column is
/// removed from both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawSheet {
    pub fn from_grid(grid: &SheetGrid, layout: SheetLayout) -> AnalysisResult<Self> {
        let header = grid.rows.get(layout.header_row).ok_or_else(|| {
            AnalysisError::InsufficientData(format!(
                "sheet '{}' has {} rows; header expected on row {}",
                grid.name,
                grid.rows.len(),
                layout.header_row + 1
            ))
        })?;

        let width = grid.rows.iter().map(Vec::len).max().unwrap_or(0);
        let cell = |row: &[String], i: usize| row.get(i).cloned().unwrap_or_default();
        let columns: Vec<usize> = (0..width).filter(|&i| i != layout.label_column).collect();

        let headers = columns.iter().map(|&i| cell(header, i)).collect();
        let rows = grid.rows[layout.header_row + 1..]
            .iter()
            .map(|row| RawRow {
                label: cell(row, layout.label_column),
                cells: columns.iter().map(|&i| cell(row, i)).collect(),
            })
            .collect();

        Ok(RawSheet {
            name: grid.name.clone(),
            headers,
            rows,
        })
    }
}
