//! Cash-flow statement parsing and the operating / free cash flow series.
//!
//! The cash-flow sheet is optional in statutory exports: its absence is a
//! `StatementNotFound` outcome the caller can branch on.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::line_items::LineItem;
use super::normalized::NormalizedStatement;
use super::numeric::{is_placeholder, parse_amount};
use super::parser::{clean_label, locate_columns, ParseOptions};
use super::sheet::{RawSheet, StatementKind, Workbook};
use crate::types::{Cell, Period};
use crate::AnalysisResult;

static BOILERPLATE_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:в\s+том\s+числе|including)\s*:\s*").expect("valid prefix regex")
});

/// Operating and free cash flow, indexed by the cash-flow statement periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowSeries {
    pub periods: Vec<Period>,
    pub operating: Vec<Cell>,
    pub free: Vec<Cell>,
    /// False when no capital-expenditure row was found and FCF equals OCF.
    pub capex_found: bool,
}

impl CashFlowSeries {
    /// Values re-indexed onto `periods` by matching period labels; periods
    /// without a counterpart are missing.
    pub fn aligned_to(&self, periods: &[Period]) -> (Vec<Cell>, Vec<Cell>) {
        let pick = |series: &[Cell], p: &Period| {
            self.periods
                .iter()
                .position(|own| own.same_as(p))
                .and_then(|i| series.get(i).copied().flatten())
        };
        let operating = periods.iter().map(|p| pick(&self.operating, p)).collect();
        let free = periods.iter().map(|p| pick(&self.free, p)).collect();
        (operating, free)
    }
}

pub(crate) fn parse_cash_flow_sheet(
    sheet: &RawSheet,
    options: &ParseOptions,
) -> AnalysisResult<NormalizedStatement> {
    let (period_cols, code_col) = locate_columns(sheet, StatementKind::CashFlow)?;
    let periods = period_cols
        .iter()
        .map(|&i| Period::from_header(&sheet.headers[i]))
        .collect();
    let mut statement = NormalizedStatement::new(StatementKind::CashFlow, periods);

    // The first row under the header is the column-numbering line.
    for row in sheet.rows.iter().skip(1) {
        let cells: Vec<&str> = period_cols
            .iter()
            .map(|&i| row.cells.get(i).map(String::as_str).unwrap_or(""))
            .collect();
        if cells.iter().all(|c| is_placeholder(c)) {
            continue;
        }
        let label = BOILERPLATE_PREFIX.replace(row.label.trim(), "");
        let code = code_col
            .and_then(|i| row.cells.get(i))
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        let values = cells.iter().map(|c| parse_amount(c)).collect();
        statement.push_row(clean_label(&label), code, values)?;
    }

    if options.drop_incomplete {
        statement.drop_incomplete();
    }
    debug!(rows = statement.rows.len(), "normalized cash flow statement");
    Ok(statement)
}

/// Normalize the cash-flow sheet of a workbook.
pub fn parse_cash_flow(
    workbook: &Workbook,
    options: &ParseOptions,
) -> AnalysisResult<NormalizedStatement> {
    let grid = workbook.sheet(StatementKind::CashFlow)?;
    let sheet = RawSheet::from_grid(grid, StatementKind::CashFlow.layout())?;
    parse_cash_flow_sheet(&sheet, options)
}

/// Reported whenever free cash flow had to fall back to operating cash flow.
pub const FCF_FALLBACK_WARNING: &str = "No capital expenditure row; FCF equals OCF.";

/// OCF and FCF = OCF + capital expenditure (reported negative). Without a
/// capex row FCF falls back to OCF.
pub fn cash_flow_series(statement: &NormalizedStatement) -> AnalysisResult<CashFlowSeries> {
    let operating = statement.series(LineItem::OperatingCashFlow)?.to_vec();
    let (free, capex_found) = match statement.series(LineItem::CapitalExpenditure) {
        Ok(capex) => {
            let free = operating
                .iter()
                .zip(capex)
                .map(|(o, c)| (*o)?.checked_add((*c)?))
                .collect();
            (free, true)
        }
        Err(_) => {
            warn!("capital expenditure row not found; free cash flow falls back to operating cash flow");
            (operating.clone(), false)
        }
    };
    Ok(CashFlowSeries {
        periods: statement.periods.clone(),
        operating,
        free,
        capex_found,
    })
}

/// OCF/FCF-only mode over a whole workbook.
pub fn extract_cash_flows(workbook: &Workbook) -> AnalysisResult<CashFlowSeries> {
    let statement = parse_cash_flow(workbook, &ParseOptions::default())?;
    cash_flow_series(&statement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use crate::statements::sheet::{RawRow, SheetGrid};
    use rust_decimal_macros::dec;

    fn row(label: &str, cells: &[&str]) -> RawRow {
        RawRow {
            label: label.into(),
            cells: cells.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn sheet(with_capex: bool) -> RawSheet {
        let mut rows = vec![
            row("1", &["2", "3", "4"]),
            row("Денежные потоки от текущих операций", &["", "", ""]),
            row("Поступления - всего", &["4110", "5 000", "4 000"]),
            row("в том числе:\n от продажи продукции", &["4111", "4 900", "3 900"]),
            row("прочие поступления", &["4119", "-", "(-)"]),
            row("4127. прочие платежи", &["4129", "(10)", "(5)"]),
            row("Сальдо денежных потоков от текущих операций", &["4100", "800", "600"]),
        ];
        if with_capex {
            rows.push(row(
                "в том числе:\n в связи с приобретением, созданием, модернизацией, реконструкцией и подготовкой к использованию внеоборотных активов",
                &["4221", "(300)", "(250)"],
            ));
        }
        RawSheet {
            name: "Отчет о движении денежных средс".into(),
            headers: vec!["Код".into(), "За 2024 г.".into(), "За 2023 г.".into()],
            rows,
        }
    }

    #[test]
    fn test_cleans_labels_and_drops_placeholder_rows() {
        let s = parse_cash_flow_sheet(&sheet(true), &ParseOptions::default()).unwrap();
        let labels: Vec<&str> = s.rows.iter().map(|r| r.label()).collect();
        assert_eq!(labels[1], "от продажи продукции");
        assert_eq!(labels[2], "прочие платежи");
        assert!(!labels.contains(&"прочие поступления"));
        assert!(!labels.contains(&"Денежные потоки от текущих операций"));
    }

    #[test]
    fn test_free_cash_flow_adds_capex() {
        let s = parse_cash_flow_sheet(&sheet(true), &ParseOptions::default()).unwrap();
        let cf = cash_flow_series(&s).unwrap();
        assert_eq!(cf.operating, vec![Some(dec!(800)), Some(dec!(600))]);
        assert_eq!(cf.free, vec![Some(dec!(500)), Some(dec!(350))]);
        assert!(cf.capex_found);
    }

    #[test]
    fn test_free_cash_flow_falls_back_to_operating() {
        let s = parse_cash_flow_sheet(&sheet(false), &ParseOptions::default()).unwrap();
        let cf = cash_flow_series(&s).unwrap();
        assert_eq!(cf.free, cf.operating);
        assert!(!cf.capex_found);
    }

    #[test]
    fn test_absent_sheet_is_statement_not_found() {
        let wb = Workbook {
            sheets: vec![SheetGrid {
                name: "Бухгалтерский баланс".into(),
                rows: vec![],
            }],
        };
        assert!(matches!(
            extract_cash_flows(&wb).unwrap_err(),
            AnalysisError::StatementNotFound { .. }
        ));
    }

    #[test]
    fn test_alignment_by_period_label() {
        let cf = CashFlowSeries {
            periods: vec![Period::from_header("За 2024 г."), Period::from_header("За 2023 г.")],
            operating: vec![Some(dec!(8)), Some(dec!(6))],
            free: vec![Some(dec!(5)), None],
            capex_found: true,
        };
        let target = vec![Period::from_header("За 2023 г."), Period::from_header("За 2022 г.")];
        let (ocf, fcf) = cf.aligned_to(&target);
        assert_eq!(ocf, vec![Some(dec!(6)), None]);
        assert_eq!(fcf, vec![None, None]);
    }
}
