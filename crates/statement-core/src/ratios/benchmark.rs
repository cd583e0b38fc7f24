use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::table::{normalize_name, RatioSource, RatioTable};
use crate::types::{with_metadata, Cell, ComputationOutput, Period};

// ---------------------------------------------------------------------------
// Benchmark table
// ---------------------------------------------------------------------------

/// Direction in which a ratio is better than its benchmark average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    #[serde(rename = ">")]
    Above,
    #[serde(rename = "<")]
    Below,
}

impl Comparison {
    pub fn symbol(&self) -> &'static str {
        match self {
            Comparison::Above => ">",
            Comparison::Below => "<",
        }
    }
}

impl std::fmt::Display for Comparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkEntry {
    pub name: String,
    pub comparison: Comparison,
    pub average: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkTable {
    pub entries: Vec<BenchmarkEntry>,
}

static STANDARD: Lazy<BenchmarkTable> = Lazy::new(|| {
    use Comparison::{Above, Below};
    let entries = [
        ("Current Ratio", Above, dec!(1.78)),
        ("Quick Ratio", Above, dec!(1.26)),
        ("Cash Ratio", Above, dec!(0.17)),
        ("ROS, %", Above, dec!(5.7)),
        ("EBIT Margin, %", Above, dec!(4.9)),
        ("ROA, %", Above, dec!(6.8)),
        ("ROE, %", Above, dec!(29.7)),
        ("Asset Turnover, days", Below, dec!(183)),
        ("Receivables Turnover, days", Below, dec!(62)),
        ("Inventory Turnover, days", Below, dec!(16)),
        ("Payables Turnover, days", Below, dec!(90)),
        ("Autonomy Ratio", Above, dec!(0.37)),
        ("Debt/Equity", Below, dec!(2)),
        ("Gearing", Below, dec!(0.7)),
        ("ICR", Above, dec!(5.96)),
        ("Net Working Capital Ratio", Above, dec!(0.26)),
        ("FCF Margin, %", Above, dec!(15)),
        ("FCF / Net Income", Above, dec!(1)),
        ("Cash Flow to Debt", Above, dec!(1.5)),
        ("EPS", Above, dec!(10)),
        ("P/E", Below, dec!(7)),
        ("P/S", Below, dec!(2)),
        ("P/BV", Below, dec!(1)),
        ("EV/EBITDA", Below, dec!(12)),
        ("Debt/EBITDA", Below, dec!(2)),
    ];
    BenchmarkTable::new(
        entries
            .into_iter()
            .map(|(name, comparison, average)| BenchmarkEntry {
                name: name.to_string(),
                comparison,
                average,
            })
            .collect(),
    )
});

impl BenchmarkTable {
    pub fn new(entries: Vec<BenchmarkEntry>) -> Self {
        BenchmarkTable { entries }
    }

    /// Industry averages for every computed and market ratio.
    pub fn standard() -> &'static BenchmarkTable {
        &STANDARD
    }

    pub fn get(&self, name: &str) -> Option<&BenchmarkEntry> {
        let wanted = normalize_name(name);
        self.entries.iter().find(|e| normalize_name(&e.name) == wanted)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Favorable,
    Unfavorable,
    Neutral,
}

pub fn classify(value: Decimal, comparison: Comparison, average: Decimal) -> Classification {
    match (value.cmp(&average), comparison) {
        (std::cmp::Ordering::Equal, _) => Classification::Neutral,
        (std::cmp::Ordering::Greater, Comparison::Above)
        | (std::cmp::Ordering::Less, Comparison::Below) => Classification::Favorable,
        _ => Classification::Unfavorable,
    }
}

// ---------------------------------------------------------------------------
// Comparator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkedRatio {
    pub name: String,
    pub source: RatioSource,
    pub values: Vec<Cell>,
    pub comparison: Comparison,
    pub average: Decimal,
    /// One tag per period; `None` where the value is missing.
    pub classes: Vec<Option<Classification>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub periods: Vec<Period>,
    pub rows: Vec<BenchmarkedRatio>,
    /// Ratio names without a benchmark entry.
    pub unmatched: Vec<String>,
}

pub struct BenchmarkComparator<'a> {
    table: &'a BenchmarkTable,
}

impl<'a> BenchmarkComparator<'a> {
    pub fn new(table: &'a BenchmarkTable) -> Self {
        BenchmarkComparator { table }
    }

    /// Keep the ratios that have a benchmark and tag every cell.
    pub fn compare(&self, ratios: &RatioTable) -> BenchmarkReport {
        let mut rows = Vec::new();
        let mut unmatched = Vec::new();

        for record in &ratios.records {
            let Some(entry) = self.table.get(&record.name) else {
                unmatched.push(record.name.clone());
                continue;
            };
            let classes = record
                .values
                .iter()
                .map(|v| v.map(|v| classify(v, entry.comparison, entry.average)))
                .collect();
            rows.push(BenchmarkedRatio {
                name: record.name.clone(),
                source: record.source,
                values: record.values.clone(),
                comparison: entry.comparison,
                average: entry.average,
                classes,
            });
        }

        BenchmarkReport {
            periods: ratios.periods.clone(),
            rows,
            unmatched,
        }
    }
}

impl Default for BenchmarkComparator<'static> {
    fn default() -> Self {
        BenchmarkComparator::new(BenchmarkTable::standard())
    }
}

/// Compare against the standard table inside the usual output envelope.
pub fn benchmark_ratios(ratios: &RatioTable) -> ComputationOutput<BenchmarkReport> {
    let start = Instant::now();
    let report = BenchmarkComparator::default().compare(ratios);
    let warnings = report
        .unmatched
        .iter()
        .map(|name| format!("No benchmark for '{name}'; row dropped."))
        .collect();

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "benchmarks": BenchmarkTable::standard().len(),
        "equal_to_average": "neutral",
    });
    with_metadata(
        "Ratio benchmarking against industry averages",
        &assumptions,
        warnings,
        elapsed,
        report,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
