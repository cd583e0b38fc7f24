use clap::Args;
use serde_json::Value;

use statement_core::market::{RatioFetcher, StaticRatioSource};
use statement_core::report::{build_ratio_report, CompanyProfile, ReportOptions};
use statement_core::statements::ParseOptions;
use statement_core::view::TableView;

use super::classified;
use crate::input::file;
use crate::input::workbook::{load_workbook, SourceArgs};

/// Arguments for the ratio report
#[derive(Args)]
pub struct RatiosArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Private company: core ratios only, no cash-flow or market ratios
    #[arg(long, conflicts_with = "ticker")]
    pub private: bool,

    /// Exchange ticker for market multiples
    #[arg(long)]
    pub ticker: Option<String>,

    /// JSON file of pre-scraped market data pages
    #[arg(long, requires = "ticker")]
    pub market_data: Option<String>,

    /// Skip the benchmark comparison
    #[arg(long)]
    pub no_benchmark: bool,
}

pub fn run_ratios(args: RatiosArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let workbook = load_workbook(&args.source)?;

    let profile = if args.private {
        CompanyProfile::Private
    } else {
        CompanyProfile::Public {
            ticker: args.ticker.clone().unwrap_or_default(),
        }
    };
    let market: Option<StaticRatioSource> = match args.market_data {
        Some(ref path) => Some(file::read_json(path)?),
        None => None,
    };
    let options = ReportOptions {
        benchmark: !args.no_benchmark,
        parse: ParseOptions::default(),
    };

    let report = build_ratio_report(
        &workbook,
        &profile,
        market.as_ref().map(|m| m as &dyn RatioFetcher),
        &options,
    )
    .map_err(classified)?;

    let view = match report.result.benchmark {
        Some(ref benchmark) => TableView::from_benchmark(benchmark),
        None => TableView::from_ratios(&report.result.ratios),
    };
    let mut value = serde_json::to_value(report)?;
    if let Value::Object(ref mut map) = value {
        map.insert("view".into(), serde_json::to_value(view)?);
    }
    Ok(value)
}
