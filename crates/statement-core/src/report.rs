//! The "financial ratios" workflow over a whole workbook.
//!
//! Public companies get the cash-flow ratios and, given a ticker, market
//! multiples; private companies get the core ratios only. Statement-level
//! failures surface as one classified [`crate::AnalysisError`]; enrichment failures
//! only add warnings.

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{info, warn};

use crate::market::{fetch_market_ratios, FetchError, RatioFetcher};
use crate::ratios::{compute_ratios, BenchmarkComparator, BenchmarkReport, RatioInput, RatioTable};
use crate::statements::{
    extract_cash_flows, parse_balance_sheet, parse_income_statement, ParseOptions, Workbook,
    FCF_FALLBACK_WARNING,
};
use crate::types::{with_metadata, ComputationOutput};
use crate::AnalysisResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "profile", rename_all = "snake_case")]
pub enum CompanyProfile {
    /// Listed company; an empty ticker skips market data.
    Public {
        #[serde(default)]
        ticker: String,
    },
    Private,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportOptions {
    #[serde(default = "default_true")]
    pub benchmark: bool,
    #[serde(default)]
    pub parse: ParseOptions,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions {
            benchmark: true,
            parse: ParseOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioReport {
    pub ratios: RatioTable,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benchmark: Option<BenchmarkReport>,
}

/// Parse, compute and benchmark in one pass.
pub fn build_ratio_report(
    workbook: &Workbook,
    profile: &CompanyProfile,
    fetcher: Option<&dyn RatioFetcher>,
    options: &ReportOptions,
) -> AnalysisResult<ComputationOutput<RatioReport>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let income = parse_income_statement(workbook, &options.parse)?;
    let balance = parse_balance_sheet(workbook, &options.parse)?;

    let mut input = RatioInput {
        income,
        balance,
        cash_flows: None,
        external: None,
        extra_ratios: false,
    };

    if let CompanyProfile::Public { ticker } = profile {
        input.extra_ratios = true;
        let cash_flows = extract_cash_flows(workbook)?;
        if !cash_flows.capex_found {
            warnings.push(FCF_FALLBACK_WARNING.to_string());
        }
        input.cash_flows = Some(cash_flows);

        let ticker = ticker.trim();
        if !ticker.is_empty() {
            match fetcher {
                Some(fetcher) => {
                    let years: Vec<String> = input.income.periods.iter().map(|p| p.short()).collect();
                    match fetch_market_ratios(fetcher, ticker, &years) {
                        Ok(fetched) => {
                            warnings.extend(fetched.unavailable.iter().map(|e| format!("{e} for {ticker}")));
                            input.external = Some(fetched.table);
                        }
                        Err(e @ FetchError::InvalidTicker(_)) => {
                            warn!(ticker, "market data lookup failed");
                            warnings.push(format!("{e}; market ratios omitted."));
                        }
                        Err(e) => warnings.push(e.to_string()),
                    }
                }
                None => warnings.push(format!(
                    "No market data source configured; market ratios for {ticker} omitted."
                )),
            }
        }
    }

    let computed = compute_ratios(&input)?;
    warnings.extend(computed.warnings);
    let ratios = computed.result;

    let benchmark = options
        .benchmark
        .then(|| BenchmarkComparator::default().compare(&ratios));

    info!(
        ratios = ratios.len(),
        warnings = warnings.len(),
        "ratio report built"
    );

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "profile": profile,
        "extra_ratios": input.extra_ratios,
        "benchmarked": options.benchmark,
    });

    Ok(with_metadata(
        "Financial ratio report (statement parsing, ratios, benchmark comparison)",
        &assumptions,
        warnings,
        elapsed,
        RatioReport { ratios, benchmark },
    ))
}
