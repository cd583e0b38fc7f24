//! Statement parser: raw statutory sheet → [`NormalizedStatement`].

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::cash_flow;
use super::line_items::LineItem;
use super::normalized::NormalizedStatement;
use super::numeric::parse_amount;
use super::sheet::{RawSheet, StatementKind, Workbook};
use crate::error::AnalysisError;
use crate::types::Period;
use crate::AnalysisResult;

static FLOW_PERIOD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:за\s+\d{4}\s*г\.|for\s+(?:the\s+year\s+)?\d{4}\b|fy\s*\d{4}\b)")
        .expect("valid flow period regex")
});

static SNAPSHOT_PERIOD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*(?:на\s+\d{1,2}\s+[а-яё]+\s+\d{4}\s*г\.|as\s+(?:at|of)\s+\d{1,2}\s+[a-z]+\s+\d{4})\s*$",
    )
    .expect("valid snapshot period regex")
});

static ROW_CODE_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:код\s+строки|код|row\s+code|code)\s*$").expect("valid code regex")
});

static LEADING_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\d+(?:\.\d+)*\.?\s*").expect("valid leading code regex"));

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Drop rows with a missing value in any period.
    #[serde(default)]
    pub drop_incomplete: bool,
}

/// Header pattern identifying period columns for a statement.
pub fn period_pattern(kind: StatementKind) -> &'static Regex {
    match kind {
        StatementKind::BalanceSheet => &SNAPSHOT_PERIOD,
        StatementKind::IncomeStatement | StatementKind::CashFlow => &FLOW_PERIOD,
    }
}

/// Indices of the period columns and, if present, of the row-code column.
pub(crate) fn locate_columns(
    sheet: &RawSheet,
    kind: StatementKind,
) -> AnalysisResult<(Vec<usize>, Option<usize>)> {
    let pattern = period_pattern(kind);
    let periods: Vec<usize> = sheet
        .headers
        .iter()
        .enumerate()
        .filter(|(_, h)| pattern.is_match(h))
        .map(|(i, _)| i)
        .collect();
    if periods.is_empty() {
        return Err(AnalysisError::InsufficientData(format!(
            "no period columns recognised in sheet '{}'",
            sheet.name
        )));
    }
    let code = sheet.headers.iter().position(|h| ROW_CODE_HEADER.is_match(h));
    debug!(
        sheet = %sheet.name,
        periods = periods.len(),
        has_code_column = code.is_some(),
        "located statement columns"
    );
    Ok((periods, code))
}

/// Collapse whitespace and strip a leading numeric row code (`"2110 Выручка"`,
/// `"4127. Прочие"`).
pub fn clean_label(label: &str) -> String {
    let collapsed = WHITESPACE.replace_all(label.trim(), " ");
    LEADING_CODE.replace(&collapsed, "").trim().to_string()
}

fn cell(row: &[String], i: usize) -> &str {
    row.get(i).map(String::as_str).unwrap_or("")
}

/// Parse an income statement or balance sheet that has already been split
/// into header and rows.
pub fn parse_sheet(
    kind: StatementKind,
    sheet: &RawSheet,
    options: &ParseOptions,
) -> AnalysisResult<NormalizedStatement> {
    if kind == StatementKind::CashFlow {
        return cash_flow::parse_cash_flow_sheet(sheet, options);
    }

    let (period_cols, code_col) = locate_columns(sheet, kind)?;
    let periods = period_cols
        .iter()
        .map(|&i| Period::from_header(&sheet.headers[i]))
        .collect();
    let mut statement = NormalizedStatement::new(kind, periods);

    for row in &sheet.rows {
        let code = code_col.map(|i| cell(&row.cells, i).trim().to_string());
        if matches!(code.as_deref(), Some("")) {
            continue;
        }
        let values = period_cols
            .iter()
            .map(|&i| parse_amount(cell(&row.cells, i)))
            .collect();
        statement.push_row(clean_label(&row.label), code, values)?;
    }

    match kind {
        StatementKind::IncomeStatement => restrict_to_result_lines(&mut statement)?,
        _ => statement.drop_first_row(),
    }

    if options.drop_incomplete {
        statement.drop_incomplete();
    }
    debug!(kind = %kind, rows = statement.rows.len(), "normalized statement");
    Ok(statement)
}

/// Keep the contiguous run from revenue to net profit.
fn restrict_to_result_lines(statement: &mut NormalizedStatement) -> AnalysisResult<()> {
    let start = statement
        .position(LineItem::Revenue)
        .ok_or_else(|| statement.not_found(LineItem::Revenue))?;
    let end = statement.rows[start..]
        .iter()
        .position(|r| r.is(LineItem::NetProfit))
        .map(|offset| start + offset)
        .ok_or_else(|| statement.not_found(LineItem::NetProfit))?;
    statement.retain_range(start, end);
    Ok(())
}

/// Locate the statement's sheet in the workbook and normalize it.
pub fn parse_statement(
    workbook: &Workbook,
    kind: StatementKind,
    options: &ParseOptions,
) -> AnalysisResult<NormalizedStatement> {
    let grid = workbook.sheet(kind)?;
    let sheet = RawSheet::from_grid(grid, kind.layout())?;
    parse_sheet(kind, &sheet, options)
}

pub fn parse_income_statement(
    workbook: &Workbook,
    options: &ParseOptions,
) -> AnalysisResult<NormalizedStatement> {
    parse_statement(workbook, StatementKind::IncomeStatement, options)
}

pub fn parse_balance_sheet(
    workbook: &Workbook,
    options: &ParseOptions,
) -> AnalysisResult<NormalizedStatement> {
    parse_statement(workbook, StatementKind::BalanceSheet, options)
}
