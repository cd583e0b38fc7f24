//! Horizontal (growth) and vertical (share) analysis of a normalized
//! statement.
//!
//! Derived columns are appended; the statement's own columns are never
//! touched. All percentages are rounded to 2 dp.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::warn;

use super::layout::{column_order, ColumnOrder, ColumnRef};
use crate::error::AnalysisError;
use crate::statements::{LineItem, NormalizedStatement, StatementKind};
use crate::types::{round2, with_metadata, Cell, ComputationOutput, Percent};
use crate::AnalysisResult;

const HUNDRED: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnalysisKind {
    /// Percent change from period `previous` to period `current`.
    Growth { current: usize, previous: usize },
    /// Percent of the anchor line item in `period`.
    Share { period: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisColumn {
    pub kind: AnalysisKind,
    pub header: String,
    pub values: Vec<Cell>,
}

/// Row whose value is 100% in every share column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShareAnchor {
    FirstRow,
    Item(LineItem),
}

/// How a statement kind is analysed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisProfile {
    /// Adjacent most-recent period pairs that get a growth column.
    pub growth_pairs: usize,
    pub share_anchor: Option<ShareAnchor>,
    pub share_caption: String,
    pub order: ColumnOrder,
}

impl AnalysisProfile {
    pub fn for_kind(kind: StatementKind) -> Self {
        match kind {
            StatementKind::IncomeStatement => AnalysisProfile {
                growth_pairs: 1,
                share_anchor: Some(ShareAnchor::FirstRow),
                share_caption: "Share of revenue".into(),
                order: ColumnOrder::Grouped,
            },
            // One more historical snapshot than the flow statements.
            StatementKind::BalanceSheet => AnalysisProfile {
                growth_pairs: 2,
                share_anchor: Some(ShareAnchor::Item(LineItem::TotalAssets)),
                share_caption: "Share of total assets".into(),
                order: ColumnOrder::Interleaved,
            },
            StatementKind::CashFlow => AnalysisProfile {
                growth_pairs: 1,
                share_anchor: None,
                share_caption: String::new(),
                order: ColumnOrder::Grouped,
            },
        }
    }
}

/// A statement with its derived columns and their presentation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AugmentedStatement {
    pub statement: NormalizedStatement,
    pub columns: Vec<AnalysisColumn>,
    pub order: Vec<ColumnRef>,
}

impl AugmentedStatement {
    pub fn headers(&self) -> Vec<String> {
        self.order
            .iter()
            .map(|c| match c {
                ColumnRef::Period(i) => self.statement.periods[*i].label.clone(),
                ColumnRef::Analysis(i) => self.columns[*i].header.clone(),
            })
            .collect()
    }

    pub fn value(&self, row: usize, column: ColumnRef) -> Cell {
        match column {
            ColumnRef::Period(i) => self.statement.rows[row].values[i],
            ColumnRef::Analysis(i) => self.columns[i].values[row],
        }
    }

    pub fn growth_columns(&self) -> impl Iterator<Item = &AnalysisColumn> {
        self.columns
            .iter()
            .filter(|c| matches!(c.kind, AnalysisKind::Growth { .. }))
    }

    pub fn share_columns(&self) -> impl Iterator<Item = &AnalysisColumn> {
        self.columns
            .iter()
            .filter(|c| matches!(c.kind, AnalysisKind::Share { .. }))
    }
}

// ---------------------------------------------------------------------------
// Formulas
// ---------------------------------------------------------------------------

/// `round((current / previous - 1) * 100, 2)`; missing when either side is
/// missing, `previous` is zero or the result overflows.
pub fn growth(current: Cell, previous: Cell) -> Option<Percent> {
    let (c, p) = (current?, previous?);
    let ratio = c.checked_div(p)?.checked_sub(Decimal::ONE)?;
    ratio.checked_mul(HUNDRED).map(round2)
}

/// `round(abs(value / anchor) * 100, 2)`; missing when either side is
/// missing, the anchor is zero or the result overflows.
pub fn share(value: Cell, anchor: Cell) -> Option<Percent> {
    let (v, a) = (value?, anchor?);
    v.checked_div(a)?.abs().checked_mul(HUNDRED).map(round2)
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Augment a statement using the profile for its kind.
pub fn augment(
    statement: &NormalizedStatement,
) -> AnalysisResult<ComputationOutput<AugmentedStatement>> {
    augment_with(statement, &AnalysisProfile::for_kind(statement.kind))
}

pub fn augment_with(
    statement: &NormalizedStatement,
    profile: &AnalysisProfile,
) -> AnalysisResult<ComputationOutput<AugmentedStatement>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let n = statement.period_count();
    if n < 2 {
        return Err(AnalysisError::InsufficientData(format!(
            "horizontal analysis needs at least 2 periods, {} has {}",
            statement.kind, n
        )));
    }

    let mut columns = Vec::new();

    // -- Horizontal ----------------------------------------------------------
    for k in 0..profile.growth_pairs.min(n - 1) {
        let (curr, prev) = (&statement.periods[k], &statement.periods[k + 1]);
        let values: Vec<Cell> = statement
            .rows
            .iter()
            .map(|r| growth(r.values[k], r.values[k + 1]))
            .collect();
        let undefined = values.iter().filter(|v| v.is_none()).count();
        if undefined > 0 {
            warnings.push(format!(
                "{undefined} line item(s) have no growth for {} / {} (missing or zero base).",
                curr.short(),
                prev.short()
            ));
        }
        columns.push(AnalysisColumn {
            kind: AnalysisKind::Growth {
                current: k,
                previous: k + 1,
            },
            header: format!("{} / {}", curr.short(), prev.short()),
            values,
        });
    }

    // -- Vertical ------------------------------------------------------------
    if let Some(anchor) = profile.share_anchor {
        let anchor_row = match anchor {
            ShareAnchor::FirstRow => statement.rows.first().ok_or_else(|| {
                AnalysisError::InsufficientData(format!("{} has no line items", statement.kind))
            })?,
            ShareAnchor::Item(item) => statement.find(item)?,
        };
        for (k, period) in statement.periods.iter().enumerate() {
            let base = anchor_row.values[k];
            if base.map_or(true, |b| b.is_zero()) {
                warn!(period = %period.label, anchor = %anchor_row.label(), "share anchor missing or zero");
                warnings.push(format!(
                    "Anchor '{}' is missing or zero in {}; shares undefined.",
                    anchor_row.label(),
                    period.short()
                ));
            }
            columns.push(AnalysisColumn {
                kind: AnalysisKind::Share { period: k },
                header: format!("{} {}", profile.share_caption, period.short()),
                values: statement.rows.iter().map(|r| share(r.values[k], base)).collect(),
            });
        }
    }

    let order = column_order(profile.order, n, &columns);
    let output = AugmentedStatement {
        statement: statement.clone(),
        columns,
        order,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "growth": "round((current / previous - 1) * 100, 2)",
        "share": "round(abs(value / anchor) * 100, 2)",
        "growth_pairs": profile.growth_pairs,
        "column_order": profile.order,
    });

    Ok(with_metadata(
        "Horizontal and vertical statement analysis",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
