//! Declarative ordering of period and analysis columns.

use serde::{Deserialize, Serialize};

use super::augment::{AnalysisColumn, AnalysisKind};

/// Reference into an augmented statement: an original period column or a
/// derived analysis column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", content = "index", rename_all = "snake_case")]
pub enum ColumnRef {
    Period(usize),
    Analysis(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnOrder {
    /// Periods, then every growth column, then every share column.
    Grouped,
    /// Periods, then for each period `k`: the growth column starting at `k`
    /// (if any) followed by the share column of `k`.
    Interleaved,
}

/// Resolve the presentation order for any number of periods.
pub fn column_order(order: ColumnOrder, periods: usize, columns: &[AnalysisColumn]) -> Vec<ColumnRef> {
    let mut refs: Vec<ColumnRef> = (0..periods).map(ColumnRef::Period).collect();
    let growth = || {
        columns
            .iter()
            .enumerate()
            .filter(|(_, c)| matches!(c.kind, AnalysisKind::Growth { .. }))
    };
    let share = || {
        columns
            .iter()
            .enumerate()
            .filter(|(_, c)| matches!(c.kind, AnalysisKind::Share { .. }))
    };

    match order {
        ColumnOrder::Grouped => {
            refs.extend(growth().map(|(i, _)| ColumnRef::Analysis(i)));
            refs.extend(share().map(|(i, _)| ColumnRef::Analysis(i)));
        }
        ColumnOrder::Interleaved => {
            for k in 0..periods {
                refs.extend(
                    growth()
                        .filter(|(_, c)| matches!(c.kind, AnalysisKind::Growth { current, .. } if current == k))
                        .map(|(i, _)| ColumnRef::Analysis(i)),
                );
                refs.extend(
                    share()
                        .filter(|(_, c)| matches!(c.kind, AnalysisKind::Share { period } if period == k))
                        .map(|(i, _)| ColumnRef::Analysis(i)),
                );
            }
        }
    }
    refs
}
