use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use super::table::{RatioSource, RatioTable};
use crate::error::AnalysisError;
use crate::statements::{CashFlowSeries, LineItem, NormalizedStatement, StatementKind};
use crate::types::{round2, with_metadata, Cell, ComputationOutput};
use crate::AnalysisResult;

const DAYS_IN_YEAR: Decimal = dec!(365);
const HUNDRED: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Ratio catalogue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ratio {
    // Liquidity
    CurrentRatio,
    QuickRatio,
    CashRatio,
    // Profitability
    ReturnOnSales,
    EbitMargin,
    ReturnOnAssets,
    ReturnOnEquity,
    // Turnover, in days
    AssetTurnoverDays,
    ReceivablesTurnoverDays,
    InventoryTurnoverDays,
    PayablesTurnoverDays,
    // Leverage and coverage
    AutonomyRatio,
    DebtToEquity,
    Gearing,
    InterestCoverage,
    NetWorkingCapitalRatio,
    // Cash flow
    CashFlowToDebt,
    FcfMargin,
    FcfToNetIncome,
}

impl Ratio {
    pub const CORE: [Ratio; 16] = [
        Ratio::CurrentRatio,
        Ratio::QuickRatio,
        Ratio::CashRatio,
        Ratio::ReturnOnSales,
        Ratio::EbitMargin,
        Ratio::ReturnOnAssets,
        Ratio::ReturnOnEquity,
        Ratio::AssetTurnoverDays,
        Ratio::ReceivablesTurnoverDays,
        Ratio::InventoryTurnoverDays,
        Ratio::PayablesTurnoverDays,
        Ratio::AutonomyRatio,
        Ratio::DebtToEquity,
        Ratio::Gearing,
        Ratio::InterestCoverage,
        Ratio::NetWorkingCapitalRatio,
    ];

    /// Ratios that need the cash-flow statement.
    pub const EXTRA: [Ratio; 3] = [Ratio::CashFlowToDebt, Ratio::FcfMargin, Ratio::FcfToNetIncome];

    pub fn name(&self) -> &'static str {
        match self {
            Ratio::CurrentRatio => "Current Ratio",
            Ratio::QuickRatio => "Quick Ratio",
            Ratio::CashRatio => "Cash Ratio",
            Ratio::ReturnOnSales => "ROS, %",
            Ratio::EbitMargin => "EBIT Margin, %",
            Ratio::ReturnOnAssets => "ROA, %",
            Ratio::ReturnOnEquity => "ROE, %",
            Ratio::AssetTurnoverDays => "Asset Turnover, days",
            Ratio::ReceivablesTurnoverDays => "Receivables Turnover, days",
            Ratio::InventoryTurnoverDays => "Inventory Turnover, days",
            Ratio::PayablesTurnoverDays => "Payables Turnover, days",
            Ratio::AutonomyRatio => "Autonomy Ratio",
            Ratio::DebtToEquity => "Debt/Equity",
            Ratio::Gearing => "Gearing",
            Ratio::InterestCoverage => "ICR",
            Ratio::NetWorkingCapitalRatio => "Net Working Capital Ratio",
            Ratio::CashFlowToDebt => "Cash Flow to Debt",
            Ratio::FcfMargin => "FCF Margin, %",
            Ratio::FcfToNetIncome => "FCF / Net Income",
        }
    }
}

impl std::fmt::Display for Ratio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatioInput {
    pub income: NormalizedStatement,
    /// Balance sheet as parsed: one more snapshot than income periods.
    pub balance: NormalizedStatement,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cash_flows: Option<CashFlowSeries>,
    /// Market multiples to append beneath the computed ratios.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external: Option<RatioTable>,
    /// Compute cash-flow ratios and append external rows.
    #[serde(default = "default_true")]
    pub extra_ratios: bool,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the ratio table. A ratio whose inputs are missing is recorded as
/// missing; only a structural mismatch between the statements is an error.
pub fn compute_ratios(input: &RatioInput) -> AnalysisResult<ComputationOutput<RatioTable>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    // -- Validation ----------------------------------------------------------
    validate_input(input)?;
    let balance = input.balance.realigned_to(&input.income.periods)?;
    let periods = input.income.periods.clone();
    let n = periods.len();

    let (ocf, fcf) = match &input.cash_flows {
        Some(cf) => {
            let (o, f) = cf.aligned_to(&periods);
            (Some(o), Some(f))
        }
        None => (None, None),
    };
    let lines = Lines {
        income: &input.income,
        balance: &balance,
        ocf,
        fcf,
    };

    // -- Ratios --------------------------------------------------------------
    let mut table = RatioTable::new(periods);
    let mut ratios: Vec<Ratio> = Ratio::CORE.to_vec();
    if input.extra_ratios {
        ratios.extend(Ratio::EXTRA);
    }

    for ratio in ratios {
        let values = match evaluate(ratio, &lines) {
            Ok(values) => values,
            Err(e) => {
                warn!(ratio = ratio.name(), error = %e, "ratio undefined");
                warnings.push(format!("{} undefined: {}", ratio.name(), e));
                vec![None; n]
            }
        };
        table.insert(ratio.name(), RatioSource::Computed, values)?;
    }

    // -- External enrichment --------------------------------------------------
    if input.extra_ratios {
        if let Some(external) = &input.external {
            append_external(&mut table, external, &mut warnings);
        }
    }

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "days_in_year": DAYS_IN_YEAR,
        "total_assets_basis": "first balance-sheet period (ROA, asset turnover, autonomy)",
        "balance_alignment": "oldest snapshot dropped, income statement periods adopted positionally",
        "borrowings": "sum of long- and short-term borrowing lines",
        "rounding": "2 dp, banker's rounding",
        "extra_ratios": input.extra_ratios,
    });

    Ok(with_metadata(
        "Financial ratio analysis (liquidity, profitability, turnover, leverage)",
        &assumptions,
        warnings,
        elapsed,
        table,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate_input(input: &RatioInput) -> AnalysisResult<()> {
    if input.income.kind != StatementKind::IncomeStatement {
        return Err(AnalysisError::InvalidInput {
            field: "income".into(),
            reason: format!("expected an income statement, got a {}", input.income.kind),
        });
    }
    if input.balance.kind != StatementKind::BalanceSheet {
        return Err(AnalysisError::InvalidInput {
            field: "balance".into(),
            reason: format!("expected a balance sheet, got a {}", input.balance.kind),
        });
    }
    if input.income.periods.is_empty() {
        return Err(AnalysisError::InsufficientData(
            "income statement has no periods".into(),
        ));
    }
    input.income.validate()?;
    input.balance.validate()
}

/// Positional alignment only: an external table with a different column
/// count is dropped as a whole.
fn append_external(table: &mut RatioTable, external: &RatioTable, warnings: &mut Vec<String>) {
    let n = table.periods.len();
    if external.periods.len() != n || !external.is_rectangular() {
        warn!(
            expected = n,
            found = external.periods.len(),
            "external ratios misaligned; omitted"
        );
        warnings.push(format!(
            "External ratios omitted: {} period columns for {} statement periods.",
            external.periods.len(),
            n
        ));
        return;
    }
    for record in &external.records {
        if table.get(&record.name).is_some() {
            warnings.push(format!(
                "External ratio '{}' duplicates a computed ratio; skipped.",
                record.name
            ));
            continue;
        }
        let values = record.values.iter().map(|v| v.map(round2)).collect();
        // Length checked above.
        let _ = table.insert(record.name.clone(), RatioSource::External, values);
    }
    debug!(rows = external.records.len(), "appended external ratios");
}

struct Lines<'a> {
    income: &'a NormalizedStatement,
    balance: &'a NormalizedStatement,
    ocf: Option<Vec<Cell>>,
    fcf: Option<Vec<Cell>>,
}

impl Lines<'_> {
    fn periods(&self) -> usize {
        self.income.periods.len()
    }

    fn is(&self, item: LineItem) -> AnalysisResult<&[Cell]> {
        self.income.series(item)
    }

    fn bs(&self, item: LineItem) -> AnalysisResult<&[Cell]> {
        self.balance.series(item)
    }

    /// Most recent snapshot of a balance-sheet line.
    fn bs_anchor(&self, item: LineItem) -> AnalysisResult<Decimal> {
        self.bs(item)?
            .first()
            .copied()
            .flatten()
            .ok_or_else(|| {
                AnalysisError::InsufficientData(format!("{item} has no value in the first period"))
            })
    }

    /// Sum of every row for the item; missing where no row has a value or
    /// the sum overflows.
    fn bs_sum(&self, item: LineItem) -> AnalysisResult<Vec<Cell>> {
        let rows = self.balance.find_all(item);
        if rows.is_empty() {
            return Err(self.balance.not_found(item));
        }
        Ok((0..self.periods())
            .map(|k| {
                rows.iter()
                    .filter_map(|r| r.values[k])
                    .try_fold(None, |acc: Cell, v| {
                        acc.unwrap_or(Decimal::ZERO).checked_add(v).map(Some)
                    })
                    .flatten()
            })
            .collect())
    }

    fn ocf(&self) -> AnalysisResult<&[Cell]> {
        self.ocf.as_deref().ok_or_else(missing_cash_flows)
    }

    fn fcf(&self) -> AnalysisResult<&[Cell]> {
        self.fcf.as_deref().ok_or_else(missing_cash_flows)
    }
}

fn missing_cash_flows() -> AnalysisError {
    AnalysisError::InsufficientData("cash flow series not supplied".into())
}

/// Missing on a zero denominator or on overflow.
fn div(numerator: Decimal, denominator: Decimal) -> Cell {
    numerator.checked_div(denominator)
}

fn per_period(n: usize, f: impl Fn(usize) -> Cell) -> Vec<Cell> {
    (0..n).map(|k| f(k).map(round2)).collect()
}

fn evaluate(ratio: Ratio, l: &Lines) -> AnalysisResult<Vec<Cell>> {
    use LineItem::*;
    let n = l.periods();
    let values = match ratio {
        Ratio::CurrentRatio => {
            let (ca, cl) = (l.bs(CurrentAssets)?, l.bs(CurrentLiabilities)?);
            per_period(n, |k| div(ca[k]?, cl[k]?))
        }
        Ratio::QuickRatio => {
            let (ca, inv, cl) = (l.bs(CurrentAssets)?, l.bs(Inventories)?, l.bs(CurrentLiabilities)?);
            per_period(n, |k| div(ca[k]?.checked_sub(inv[k]?)?, cl[k]?))
        }
        Ratio::CashRatio => {
            let (cash, sti, cl) = (l.bs(Cash)?, l.bs(ShortTermInvestments)?, l.bs(CurrentLiabilities)?);
            per_period(n, |k| div(cash[k]?.checked_add(sti[k]?)?, cl[k]?))
        }
        Ratio::ReturnOnSales => {
            let (np, rev) = (l.is(NetProfit)?, l.is(Revenue)?);
            per_period(n, |k| div(HUNDRED.checked_mul(np[k]?)?, rev[k]?))
        }
        Ratio::EbitMargin => {
            let (sp, rev) = (l.is(SalesProfit)?, l.is(Revenue)?);
            per_period(n, |k| div(HUNDRED.checked_mul(sp[k]?)?, rev[k]?))
        }
        Ratio::ReturnOnAssets => {
            let (np, ta) = (l.is(NetProfit)?, l.bs_anchor(TotalAssets)?);
            per_period(n, |k| div(HUNDRED.checked_mul(np[k]?)?, ta))
        }
        Ratio::ReturnOnEquity => {
            let (np, eq) = (l.is(NetProfit)?, l.bs(Equity)?);
            per_period(n, |k| div(HUNDRED.checked_mul(np[k]?)?, eq[k]?))
        }
        Ratio::AssetTurnoverDays => {
            let (ta, rev) = (l.bs_anchor(TotalAssets)?, l.is(Revenue)?);
            per_period(n, |k| div(DAYS_IN_YEAR.checked_mul(ta)?, rev[k]?))
        }
        Ratio::ReceivablesTurnoverDays => {
            let (rec, rev) = (l.bs(Receivables)?, l.is(Revenue)?);
            per_period(n, |k| div(DAYS_IN_YEAR.checked_mul(rec[k]?)?, rev[k]?))
        }
        // Cost of sales is reported negative.
        Ratio::InventoryTurnoverDays => {
            let (inv, cogs) = (l.bs(Inventories)?, l.is(CostOfSales)?);
            per_period(n, |k| div((-DAYS_IN_YEAR).checked_mul(inv[k]?)?, cogs[k]?))
        }
        Ratio::PayablesTurnoverDays => {
            let (pay, cogs) = (l.bs(Payables)?, l.is(CostOfSales)?);
            per_period(n, |k| div((-DAYS_IN_YEAR).checked_mul(pay[k]?)?, cogs[k]?))
        }
        Ratio::AutonomyRatio => {
            let (eq, ta) = (l.bs(Equity)?, l.bs_anchor(TotalAssets)?);
            per_period(n, |k| div(eq[k]?, ta))
        }
        Ratio::DebtToEquity => {
            let (debt, eq) = (l.bs_sum(Borrowings)?, l.bs(Equity)?);
            per_period(n, |k| div(debt[k]?, eq[k]?))
        }
        Ratio::Gearing => {
            let (debt, eq) = (l.bs_sum(Borrowings)?, l.bs(Equity)?);
            per_period(n, |k| div(debt[k]?, eq[k]?.checked_add(debt[k]?)?))
        }
        // Interest payable is reported negative.
        Ratio::InterestCoverage => {
            let (sp, int) = (l.is(SalesProfit)?, l.is(InterestExpense)?);
            per_period(n, |k| div(sp[k]?, -int[k]?))
        }
        Ratio::NetWorkingCapitalRatio => {
            let (ca, cl) = (l.bs(CurrentAssets)?, l.bs(CurrentLiabilities)?);
            per_period(n, |k| div(ca[k]?.checked_sub(cl[k]?)?, ca[k]?))
        }
        Ratio::CashFlowToDebt => {
            let (ocf, debt) = (l.ocf()?, l.bs_sum(Borrowings)?);
            per_period(n, |k| div(ocf[k]?, debt[k]?))
        }
        Ratio::FcfMargin => {
            let (fcf, rev) = (l.fcf()?, l.is(Revenue)?);
            per_period(n, |k| div(HUNDRED.checked_mul(fcf[k]?)?, rev[k]?))
        }
        Ratio::FcfToNetIncome => {
            let (fcf, np) = (l.fcf()?, l.is(NetProfit)?);
            per_period(n, |k| div(fcf[k]?, np[k]?))
        }
    };
    Ok(values)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
