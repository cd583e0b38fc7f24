mod common;

use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use statement_core::analysis::{augment, ColumnRef};
use statement_core::statements::{
    extract_cash_flows, parse_balance_sheet, parse_income_statement, parse_statement, LineItem,
    ParseOptions, StatementKind, Workbook,
};
use statement_core::AnalysisError;

// ===========================================================================
// Income statement
// ===========================================================================

#[test]
fn test_income_statement_restricted_to_revenue_through_net_profit() {
    let s = parse_income_statement(&common::workbook(), &ParseOptions::default()).unwrap();
    let codes: Vec<&str> = s.rows.iter().filter_map(|r| r.code.as_deref()).collect();
    assert_eq!(
        codes,
        vec!["2110", "2120", "2100", "2210", "2220", "2200", "2330", "2300", "2400"]
    );
    assert_eq!(s.periods[0].label, "За 2024 г.");
    assert_eq!(s.periods[1].year, Some(2023));
}

#[test]
fn test_income_statement_amounts_normalized() {
    let s = parse_income_statement(&common::workbook(), &ParseOptions::default()).unwrap();
    assert_eq!(
        s.series(LineItem::Revenue).unwrap(),
        &[Some(dec!(1000)), Some(dec!(800))]
    );
    assert_eq!(
        s.series(LineItem::CostOfSales).unwrap(),
        &[Some(dec!(-600)), Some(dec!(-500))]
    );
}

#[test]
fn test_missing_net_profit_is_wrong_sheet_shape() {
    let mut wb = common::workbook();
    let sheet = &mut wb.sheets[0];
    sheet.rows.retain(|r| !r.iter().any(|c| c == "2400"));
    let err = parse_income_statement(&wb, &ParseOptions::default()).unwrap_err();
    assert!(matches!(err, AnalysisError::LineItemNotFound { .. }));
    assert_eq!(err.category(), "wrong_sheet_shape");
}

// ===========================================================================
// Balance sheet
// ===========================================================================

#[test]
fn test_balance_sheet_drops_numbering_row_and_section_headers() {
    let s = parse_balance_sheet(&common::workbook(), &ParseOptions::default()).unwrap();
    assert_eq!(s.periods.len(), 3);
    assert_eq!(s.rows[0].label(), "Запасы");
    assert!(s.rows.iter().all(|r| r.label() != "АКТИВ" && r.label() != "1"));
    assert_eq!(s.rows.len(), 12);
}

#[test]
fn test_balance_labels_unique_and_ordered() {
    let s = parse_balance_sheet(&common::workbook(), &ParseOptions::default()).unwrap();
    let labels = s.display_labels();
    let unique: std::collections::HashSet<&String> = labels.iter().collect();
    assert_eq!(unique.len(), labels.len());

    let raw: Vec<&str> = s.rows.iter().map(|r| r.label()).collect();
    let trimmed: Vec<&str> = labels.iter().map(|l| l.trim_end()).collect();
    assert_eq!(trimmed, raw);
    assert_eq!(labels.last().unwrap(), "БАЛАНС ");
}

#[test]
fn test_drop_incomplete_removes_rows_with_placeholders() {
    let options = ParseOptions {
        drop_incomplete: true,
    };
    let s = parse_balance_sheet(&common::workbook(), &options).unwrap();
    assert!(s.find(LineItem::ShortTermInvestments).is_err());
    assert_eq!(s.rows.len(), 11);
}

#[test]
fn test_borrowings_found_twice() {
    let s = parse_balance_sheet(&common::workbook(), &ParseOptions::default()).unwrap();
    let rows = s.find_all(LineItem::Borrowings);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].key.occurrence, 1);
}

// ===========================================================================
// Cash flow
// ===========================================================================

#[test]
fn test_cash_flow_series() {
    let cf = extract_cash_flows(&common::workbook()).unwrap();
    assert_eq!(cf.operating, vec![Some(dec!(600)), Some(dec!(300))]);
    assert_eq!(cf.free, vec![Some(dec!(150)), Some(dec!(-30))]);
    assert!(cf.capex_found);
}

#[test]
fn test_missing_cash_flow_sheet() {
    let err = extract_cash_flows(&common::workbook_without_cash_flow()).unwrap_err();
    match err {
        AnalysisError::StatementNotFound { sheet } => {
            assert_eq!(sheet, "Отчет о движении денежных средс")
        }
        other => panic!("Expected StatementNotFound, got {other:?}"),
    }
}

#[test]
fn test_cash_flow_statement_drops_placeholder_rows() {
    let s = parse_statement(
        &common::workbook(),
        StatementKind::CashFlow,
        &ParseOptions::default(),
    )
    .unwrap();
    let labels: Vec<&str> = s.rows.iter().map(|r| r.label()).collect();
    assert_eq!(labels.len(), 3);
    assert!(labels[2].starts_with("в связи с приобретением"));
}

#[test]
fn test_english_sheet_names_accepted() {
    let mut wb = common::workbook();
    wb.sheets[0].name = "Income Statement".into();
    assert!(parse_income_statement(&wb, &ParseOptions::default()).is_ok());
}

#[test]
fn test_empty_workbook() {
    let err = parse_income_statement(&Workbook { sheets: vec![] }, &ParseOptions::default())
        .unwrap_err();
    assert_eq!(err.category(), "wrong_file");
}

// ===========================================================================
// Horizontal / vertical analysis over parsed statements
// ===========================================================================

#[test]
fn test_income_analysis_growth_and_share() {
    let s = parse_income_statement(&common::workbook(), &ParseOptions::default()).unwrap();
    let out = augment(&s).unwrap();
    let aug = &out.result;
    assert_eq!(aug.headers(), vec![
        "За 2024 г.",
        "За 2023 г.",
        "2024 / 2023",
        "Share of revenue 2024",
        "Share of revenue 2023",
    ]);
    // Revenue: 1000 vs 800.
    assert_eq!(aug.value(0, ColumnRef::Analysis(0)), Some(dec!(25.00)));
    // Net profit share of revenue in 2024.
    let np = s.position(LineItem::NetProfit).unwrap();
    assert_eq!(aug.value(np, aug.order[3]), Some(dec!(10.00)));
    // Cost of sales share is reported positive.
    assert_eq!(aug.value(1, aug.order[3]), Some(dec!(60.00)));
}

#[test]
fn test_balance_analysis_interleaved() {
    let s = parse_balance_sheet(&common::workbook(), &ParseOptions::default()).unwrap();
    let aug = augment(&s).unwrap().result;
    let headers = aug.headers();
    assert_eq!(headers.len(), 3 + 2 + 3);
    assert_eq!(headers[3], "2024 / 2023");
    assert_eq!(headers[4], "Share of total assets 2024");
    assert_eq!(headers[5], "2023 / 2022");
    assert_eq!(headers[7], "Share of total assets 2022");

    let ta = s.position(LineItem::TotalAssets).unwrap();
    assert_eq!(aug.value(ta, aug.order[4]), Some(dec!(100.00)));
    // Inventories 120 vs 100.
    assert_eq!(aug.value(0, aug.order[5]), Some(dec!(20.00)));
}
