use clap::Args;
use serde_json::{json, Value};

use statement_core::statements::{extract_cash_flows, FCF_FALLBACK_WARNING};
use statement_core::view::TableView;

use super::classified;
use crate::input::workbook::{load_workbook, SourceArgs};

/// Arguments for the OCF / FCF extraction
#[derive(Args)]
pub struct CashFlowsArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

pub fn run_cash_flows(args: CashFlowsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let workbook = load_workbook(&args.source)?;
    let series = extract_cash_flows(&workbook).map_err(classified)?;

    let mut warnings = Vec::new();
    if !series.capex_found {
        warnings.push(FCF_FALLBACK_WARNING.to_string());
    }
    Ok(json!({
        "result": series,
        "warnings": warnings,
        "view": TableView::from_cash_flows(&series),
    }))
}
