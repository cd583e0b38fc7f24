use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use statement_core::market::{RatioFetcher, StaticRatioSource};
use statement_core::report::{CompanyProfile, ReportOptions};
use statement_core::statements::{ParseOptions, StatementKind, Workbook};
use statement_core::AnalysisError;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Analysis errors carry their boundary category in the message.
fn to_classified_error(e: AnalysisError) -> napi::Error {
    napi::Error::from_reason(format!("[{}] {}", e.category(), e))
}

// ---------------------------------------------------------------------------
// Statements
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ParseStatementInput {
    workbook: Workbook,
    kind: StatementKind,
    #[serde(default)]
    options: ParseOptions,
}

#[napi]
pub fn parse_statement(input_json: String) -> NapiResult<String> {
    let input: ParseStatementInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        statement_core::statements::parse_statement(&input.workbook, input.kind, &input.options)
            .map_err(to_classified_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn analyze_statement(input_json: String) -> NapiResult<String> {
    let statement: statement_core::statements::NormalizedStatement =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    statement.validate().map_err(to_classified_error)?;
    let output = statement_core::analysis::augment(&statement).map_err(to_classified_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn extract_cash_flows(input_json: String) -> NapiResult<String> {
    let workbook: Workbook = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = statement_core::statements::extract_cash_flows(&workbook)
        .map_err(to_classified_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Ratios
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_ratios(input_json: String) -> NapiResult<String> {
    let input: statement_core::ratios::RatioInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = statement_core::ratios::compute_ratios(&input).map_err(to_classified_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn benchmark_ratios(input_json: String) -> NapiResult<String> {
    let table: statement_core::ratios::RatioTable =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = statement_core::ratios::benchmark_ratios(&table);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct RatioReportInput {
    workbook: Workbook,
    profile: CompanyProfile,
    #[serde(default)]
    market: Option<StaticRatioSource>,
    #[serde(default)]
    options: ReportOptions,
}

#[napi]
pub fn ratio_report(input_json: String) -> NapiResult<String> {
    let input: RatioReportInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = statement_core::report::build_ratio_report(
        &input.workbook,
        &input.profile,
        input.market.as_ref().map(|m| m as &dyn RatioFetcher),
        &input.options,
    )
    .map_err(to_classified_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
