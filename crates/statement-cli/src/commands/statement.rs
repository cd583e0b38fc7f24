use clap::{Args, ValueEnum};
use serde_json::{json, Value};

use statement_core::analysis::augment;
use statement_core::statements::{parse_statement, ParseOptions, StatementKind};
use statement_core::view::TableView;

use super::classified;
use crate::input::workbook::{load_workbook, SourceArgs};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindArg {
    Income,
    Balance,
    CashFlow,
}

impl From<KindArg> for StatementKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Income => StatementKind::IncomeStatement,
            KindArg::Balance => StatementKind::BalanceSheet,
            KindArg::CashFlow => StatementKind::CashFlow,
        }
    }
}

/// Arguments for statement normalization
#[derive(Args)]
pub struct StatementArgs {
    /// Statement to extract
    #[arg(long, value_enum)]
    pub kind: KindArg,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Drop rows with a missing value in any period
    #[arg(long)]
    pub drop_incomplete: bool,

    /// Append growth and share columns
    #[arg(long)]
    pub analysis: bool,
}

pub fn run_statement(args: StatementArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let workbook = load_workbook(&args.source)?;
    let options = ParseOptions {
        drop_incomplete: args.drop_incomplete,
    };
    let statement = parse_statement(&workbook, args.kind.into(), &options).map_err(classified)?;

    if !args.analysis {
        return Ok(json!({
            "result": statement,
            "view": TableView::from_statement(&statement),
        }));
    }

    let augmented = augment(&statement).map_err(classified)?;
    let view = TableView::from_augmented(&augmented.result);
    let mut value = serde_json::to_value(augmented)?;
    if let Value::Object(ref mut map) = value {
        map.insert("view".into(), serde_json::to_value(view)?);
    }
    Ok(value)
}
