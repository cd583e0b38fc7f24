use serde::{Deserialize, Serialize};

use super::line_items::LineItem;
use super::sheet::StatementKind;
use crate::error::AnalysisError;
use crate::types::{Cell, Period};
use crate::AnalysisResult;

/// Row identity: the label plus how many earlier rows carry the same label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowKey {
    pub label: String,
    pub occurrence: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineRow {
    pub key: RowKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub values: Vec<Cell>,
}

impl LineRow {
    pub fn label(&self) -> &str {
        &self.key.label
    }

    fn matches_code(&self, item: LineItem) -> bool {
        self.code.as_deref().is_some_and(|c| item.matches_code(c))
    }

    /// True when the row is `item`, by code or by label.
    pub fn is(&self, item: LineItem) -> bool {
        self.matches_code(item) || item.matches_label(self.label())
    }

    fn is_complete(&self) -> bool {
        self.values.iter().all(Option::is_some)
    }
}

/// A statement reduced to line items × periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedStatement {
    pub kind: StatementKind,
    pub periods: Vec<Period>,
    pub rows: Vec<LineRow>,
}

impl NormalizedStatement {
    pub fn new(kind: StatementKind, periods: Vec<Period>) -> Self {
        NormalizedStatement {
            kind,
            periods,
            rows: Vec::new(),
        }
    }

    /// Append a row; its occurrence index is assigned from the rows already
    /// present.
    pub fn push_row(
        &mut self,
        label: impl Into<String>,
        code: Option<String>,
        values: Vec<Cell>,
    ) -> AnalysisResult<()> {
        let label = label.into();
        if values.len() != self.periods.len() {
            return Err(AnalysisError::InvalidInput {
                field: format!("row '{label}'"),
                reason: format!(
                    "{} values for {} periods",
                    values.len(),
                    self.periods.len()
                ),
            });
        }
        let occurrence = self.rows.iter().filter(|r| r.key.label == label).count();
        self.rows.push(LineRow {
            key: RowKey { label, occurrence },
            code,
            values,
        });
        Ok(())
    }

    pub fn period_count(&self) -> usize {
        self.periods.len()
    }

    /// Check that every row carries one value per period and that row
    /// identities are unique. Used on statements that arrive deserialized.
    pub fn validate(&self) -> AnalysisResult<()> {
        let mut seen = std::collections::HashSet::new();
        for row in &self.rows {
            if row.values.len() != self.periods.len() {
                return Err(AnalysisError::InvalidInput {
                    field: format!("row '{}'", row.key.label),
                    reason: format!(
                        "{} values for {} periods",
                        row.values.len(),
                        self.periods.len()
                    ),
                });
            }
            if !seen.insert(&row.key) {
                return Err(AnalysisError::InvalidInput {
                    field: format!("row '{}'", row.key.label),
                    reason: format!("duplicate occurrence {}", row.key.occurrence),
                });
            }
        }
        Ok(())
    }

    /// Index of the first row for `item`: a row-code match wins over a
    /// label match.
    pub fn position(&self, item: LineItem) -> Option<usize> {
        self.rows
            .iter()
            .position(|r| r.matches_code(item))
            .or_else(|| self.rows.iter().position(|r| item.matches_label(r.label())))
    }

    pub fn find(&self, item: LineItem) -> AnalysisResult<&LineRow> {
        self.position(item)
            .map(|i| &self.rows[i])
            .ok_or_else(|| self.not_found(item))
    }

    /// Every row for an item that is reported more than once (borrowings are
    /// split into long- and short-term lines).
    pub fn find_all(&self, item: LineItem) -> Vec<&LineRow> {
        let by_code: Vec<&LineRow> = self.rows.iter().filter(|r| r.matches_code(item)).collect();
        if !by_code.is_empty() {
            return by_code;
        }
        self.rows
            .iter()
            .filter(|r| item.matches_label(r.label()))
            .collect()
    }

    pub fn series(&self, item: LineItem) -> AnalysisResult<&[Cell]> {
        self.find(item).map(|r| r.values.as_slice())
    }

    pub fn not_found(&self, item: LineItem) -> AnalysisError {
        AnalysisError::LineItemNotFound {
            item: item.name().to_string(),
            statement: self.kind.to_string(),
        }
    }

    /// Remove rows with a missing value in any period.
    pub fn drop_incomplete(&mut self) {
        self.rows.retain(LineRow::is_complete);
        self.reindex();
    }

    /// Keep rows `start..=end`.
    pub(crate) fn retain_range(&mut self, start: usize, end: usize) {
        self.rows = self.rows.drain(start..=end).collect();
        self.reindex();
    }

    pub(crate) fn drop_first_row(&mut self) {
        if !self.rows.is_empty() {
            self.rows.remove(0);
            self.reindex();
        }
    }

    fn reindex(&mut self) {
        let mut counts: std::collections::HashMap<String, usize> = std::collections::HashMap::new();
        for row in &mut self.rows {
            let n = counts.entry(row.key.label.clone()).or_insert(0);
            row.key.occurrence = *n;
            *n += 1;
        }
    }

    /// Display labels: repeats get one trailing space per earlier
    /// occurrence, so the list is unique and keeps row order.
    pub fn display_labels(&self) -> Vec<String> {
        let mut used = std::collections::HashSet::new();
        self.rows
            .iter()
            .map(|r| {
                let mut label = format!("{}{}", r.key.label, " ".repeat(r.key.occurrence));
                while !used.insert(label.clone()) {
                    label.push(' ');
                }
                label
            })
            .collect()
    }

    /// Point-in-time snapshots carry one more column than flow statements:
    /// drop the oldest snapshot and adopt `periods` positionally.
    pub fn realigned_to(&self, periods: &[Period]) -> AnalysisResult<NormalizedStatement> {
        let kept = self.periods.len().saturating_sub(1);
        if kept != periods.len() {
            return Err(AnalysisError::PeriodMismatch {
                expected: periods.len() + 1,
                found: self.periods.len(),
            });
        }
        let rows = self
            .rows
            .iter()
            .map(|r| LineRow {
                key: r.key.clone(),
                code: r.code.clone(),
                values: r.values[..kept].to_vec(),
            })
            .collect();
        Ok(NormalizedStatement {
            kind: self.kind,
            periods: periods.to_vec(),
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn periods(headers: &[&str]) -> Vec<Period> {
        headers.iter().map(|h| Period::from_header(h)).collect()
    }

    fn balance() -> NormalizedStatement {
        let mut s = NormalizedStatement::new(
            StatementKind::BalanceSheet,
            periods(&["На 31 декабря 2024 г.", "На 31 декабря 2023 г.", "На 31 декабря 2022 г."]),
        );
        s.push_row("Заемные средства", Some("1410".into()), vec![Some(dec!(100)), Some(dec!(90)), None])
            .unwrap();
        s.push_row("БАЛАНС", Some("1600".into()), vec![Some(dec!(1000)), Some(dec!(900)), Some(dec!(800))])
            .unwrap();
        s.push_row("Заемные средства", Some("1510".into()), vec![Some(dec!(50)), None, Some(dec!(40))])
            .unwrap();
        s.push_row("БАЛАНС", Some("1700".into()), vec![Some(dec!(1000)), Some(dec!(900)), Some(dec!(800))])
            .unwrap();
        s
    }

    #[test]
    fn test_occurrence_indices() {
        let s = balance();
        let keys: Vec<(&str, usize)> = s.rows.iter().map(|r| (r.label(), r.key.occurrence)).collect();
        assert_eq!(
            keys,
            vec![
                ("Заемные средства", 0),
                ("БАЛАНС", 0),
                ("Заемные средства", 1),
                ("БАЛАНС", 1)
            ]
        );
    }

    #[test]
    fn test_display_labels_unique_and_ordered() {
        let s = balance();
        let labels = s.display_labels();
        assert_eq!(labels[0], "Заемные средства");
        assert_eq!(labels[2], "Заемные средства ");
        assert_eq!(labels[3], "БАЛАНС ");
        let unique: std::collections::HashSet<_> = labels.iter().collect();
        assert_eq!(unique.len(), labels.len());
    }

    #[test]
    fn test_find_prefers_code_and_first_match() {
        let s = balance();
        assert_eq!(s.find(LineItem::TotalAssets).unwrap().code.as_deref(), Some("1600"));
        assert_eq!(s.find_all(LineItem::Borrowings).len(), 2);
    }

    #[test]
    fn test_missing_item_is_classified() {
        let s = balance();
        match s.find(LineItem::Inventories).unwrap_err() {
            AnalysisError::LineItemNotFound { item, statement } => {
                assert_eq!(item, "Запасы");
                assert_eq!(statement, "balance sheet");
            }
            other => panic!("Expected LineItemNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_drop_incomplete_reindexes() {
        let mut s = balance();
        s.drop_incomplete();
        assert_eq!(s.rows.len(), 2);
        assert_eq!(s.rows[0].key, RowKey { label: "БАЛАНС".into(), occurrence: 0 });
        assert_eq!(s.rows[1].key, RowKey { label: "БАЛАНС".into(), occurrence: 1 });
    }

    #[test]
    fn test_realign_drops_oldest_snapshot() {
        let s = balance();
        let flow = periods(&["За 2024 г.", "За 2023 г."]);
        let aligned = s.realigned_to(&flow).unwrap();
        assert_eq!(aligned.periods, flow);
        assert_eq!(aligned.rows[1].values, vec![Some(dec!(1000)), Some(dec!(900))]);

        let err = s.realigned_to(&periods(&["За 2024 г."])).unwrap_err();
        assert!(matches!(err, AnalysisError::PeriodMismatch { expected: 2, found: 3 }));
    }

    #[test]
    fn test_push_row_rejects_ragged_values() {
        let mut s = balance();
        assert!(s.push_row("x", None, vec![None]).is_err());
    }
}
