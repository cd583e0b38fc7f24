mod common;

use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use statement_core::market::{FetchError, StaticRatioSource};
use statement_core::ratios::{
    compute_ratios, BenchmarkComparator, BenchmarkTable, Classification, Ratio, RatioInput,
    RatioSource, RatioTable,
};
use statement_core::report::{build_ratio_report, CompanyProfile, ReportOptions};
use statement_core::statements::{
    extract_cash_flows, parse_balance_sheet, parse_income_statement, ParseOptions,
    FCF_FALLBACK_WARNING,
};
use statement_core::view::{CellTag, TableView};
use statement_core::{AnalysisError, Period};

fn input(extra_ratios: bool) -> RatioInput {
    let wb = common::workbook();
    let options = ParseOptions::default();
    RatioInput {
        income: parse_income_statement(&wb, &options).unwrap(),
        balance: parse_balance_sheet(&wb, &options).unwrap(),
        cash_flows: Some(extract_cash_flows(&wb).unwrap()),
        external: None,
        extra_ratios,
    }
}

fn market() -> StaticRatioSource {
    StaticRatioSource::from_json(common::MARKET_PAGES).unwrap()
}

// ===========================================================================
// Ratio engine over parsed statements
// ===========================================================================

#[test]
fn test_core_ratio_rows_in_order() {
    let table = compute_ratios(&input(false)).unwrap().result;
    let names: Vec<&str> = table.names().collect();
    let expected: Vec<&str> = Ratio::CORE.iter().map(|r| r.name()).collect();
    assert_eq!(names, expected);
    assert_eq!(table.periods.len(), 2);
}

#[test]
fn test_ros_known_answer() {
    // Revenue 1000, net profit 100 => 10.00%
    let table = compute_ratios(&input(false)).unwrap().result;
    assert_eq!(table.get("ROS, %").unwrap().values[0], Some(dec!(10.00)));
}

#[test]
fn test_missing_interest_expense_only_affects_icr() {
    let mut inp = input(false);
    let baseline = compute_ratios(&inp).unwrap().result;
    inp.income.rows.retain(|r| r.code.as_deref() != Some("2330"));
    let out = compute_ratios(&inp).unwrap();

    assert_eq!(out.result.get("ICR").unwrap().values, vec![None, None]);
    for record in baseline.records.iter().filter(|r| r.name != "ICR") {
        assert_eq!(out.result.get(&record.name).unwrap(), record);
    }
    assert_eq!(out.warnings.len(), 1);
}

#[test]
fn test_extra_ratios_from_parsed_cash_flow() {
    let table = compute_ratios(&input(true)).unwrap().result;
    assert_eq!(table.len(), 19);
    assert_eq!(table.get("Cash Flow to Debt").unwrap().values[0], Some(dec!(1.50)));
    assert_eq!(
        table.get("FCF Margin, %").unwrap().values,
        vec![Some(dec!(15.00)), Some(dec!(-3.75))]
    );
}

#[test]
fn test_misaligned_external_table_leaves_core_rows_intact() {
    let baseline = compute_ratios(&input(true)).unwrap().result;

    let mut inp = input(true);
    let mut external = RatioTable::new(vec![
        Period::from_header("2024"),
        Period::from_header("2023"),
        Period::from_header("2022"),
    ]);
    external
        .insert("P/E", RatioSource::External, vec![Some(dec!(5)), None, None])
        .unwrap();
    inp.external = Some(external);

    let out = compute_ratios(&inp).unwrap();
    assert_eq!(out.result, baseline);
    assert!(out.warnings.iter().any(|w| w.starts_with("External ratios omitted")));
}

#[test]
fn test_balance_with_too_few_snapshots() {
    let mut inp = input(false);
    for row in &mut inp.balance.rows {
        row.values.pop();
    }
    inp.balance.periods.pop();
    let err = compute_ratios(&inp).unwrap_err();
    assert!(matches!(err, AnalysisError::PeriodMismatch { expected: 3, found: 2 }));
}

// ===========================================================================
// Benchmarks
// ===========================================================================

#[test]
fn test_benchmark_classification_of_computed_table() {
    let table = compute_ratios(&input(true)).unwrap().result;
    let report = BenchmarkComparator::new(BenchmarkTable::standard()).compare(&table);
    assert!(report.unmatched.is_empty());

    let current = report.rows.iter().find(|r| r.name == "Current Ratio").unwrap();
    // 2.00 > 1.78, 1.60 < 1.78
    assert_eq!(
        current.classes,
        vec![Some(Classification::Favorable), Some(Classification::Unfavorable)]
    );
    let icr = report.rows.iter().find(|r| r.name == "ICR").unwrap();
    // 5.00 and 3.00 against > 5.96
    assert_eq!(
        icr.classes,
        vec![Some(Classification::Unfavorable), Some(Classification::Unfavorable)]
    );
}

// ===========================================================================
// Report workflow
// ===========================================================================

#[test]
fn test_private_company_report_has_core_ratios_only() {
    let out = build_ratio_report(
        &common::workbook_without_cash_flow(),
        &CompanyProfile::Private,
        None,
        &ReportOptions::default(),
    )
    .unwrap();
    assert_eq!(out.result.ratios.len(), 16);
    assert_eq!(out.result.benchmark.unwrap().rows.len(), 16);
}

#[test]
fn test_public_company_without_cash_flow_is_classified() {
    let err = build_ratio_report(
        &common::workbook_without_cash_flow(),
        &CompanyProfile::Public { ticker: String::new() },
        None,
        &ReportOptions::default(),
    )
    .unwrap_err();
    assert_eq!(err.category(), "wrong_file");
}

#[test]
fn test_public_company_report_with_market_data() {
    let source = market();
    let out = build_ratio_report(
        &common::workbook(),
        &CompanyProfile::Public { ticker: "exmp".into() },
        Some(&source),
        &ReportOptions::default(),
    )
    .unwrap();
    let ratios = &out.result.ratios;
    assert_eq!(ratios.len(), 25);

    let pe = ratios.get("P/E").unwrap();
    assert_eq!(pe.source, RatioSource::External);
    assert_eq!(pe.values, vec![Some(dec!(5.1)), Some(dec!(6.8))]);
    assert_eq!(ratios.get("P/S").unwrap().values, vec![None, Some(dec!(0.9))]);
    assert_eq!(
        ratios.get("EV/EBITDA").unwrap().values,
        vec![Some(dec!(3.8)), Some(dec!(4.2))]
    );

    let benchmark = out.result.benchmark.unwrap();
    assert_eq!(benchmark.rows.len(), 25);
    let view = TableView::from_benchmark(&benchmark);
    let pe_row = view.rows.iter().find(|r| r.label == "P/E").unwrap();
    // 5.1 < 7
    assert_eq!(pe_row.cells[0].tag, Some(CellTag::Favorable));
}

#[test]
fn test_invalid_ticker_warns_and_keeps_ratios() {
    let source = market();
    let out = build_ratio_report(
        &common::workbook(),
        &CompanyProfile::Public { ticker: "NOPE".into() },
        Some(&source),
        &ReportOptions::default(),
    )
    .unwrap();
    assert_eq!(out.result.ratios.len(), 19);
    assert!(out.result.ratios.get("P/E").is_none());
    let expected = format!("{}; market ratios omitted.", FetchError::InvalidTicker("NOPE".into()));
    assert!(out.warnings.contains(&expected));
}

#[test]
fn test_report_without_benchmark() {
    let options = ReportOptions {
        benchmark: false,
        ..ReportOptions::default()
    };
    let out = build_ratio_report(&common::workbook(), &CompanyProfile::Private, None, &options)
        .unwrap();
    assert!(out.result.benchmark.is_none());
}

#[test]
fn test_public_report_warns_when_fcf_falls_back_to_ocf() {
    let profile = CompanyProfile::Public { ticker: String::new() };
    let full = build_ratio_report(&common::workbook(), &profile, None, &ReportOptions::default())
        .unwrap();
    assert!(!full.warnings.iter().any(|w| w == FCF_FALLBACK_WARNING));

    let mut wb = common::workbook();
    wb.sheets[2].rows.retain(|r| r.get(1).map(String::as_str) != Some("4221"));
    let out = build_ratio_report(&wb, &profile, None, &ReportOptions::default()).unwrap();
    assert!(out.warnings.iter().any(|w| w == FCF_FALLBACK_WARNING));
}
