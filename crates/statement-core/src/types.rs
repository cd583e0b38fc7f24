use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Reported amounts, in the units of the source export (usually thousands).
pub type Amount = Decimal;

/// Percentages expressed as percent (20.00 = 20%), rounded to 2 dp.
pub type Percent = Decimal;

/// One cell of a period-indexed series. `None` is a missing value.
pub type Cell = Option<Decimal>;

static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}").expect("valid year regex"));

/// A fiscal period, identified by the column header it was read from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

impl Period {
    pub fn from_header(header: &str) -> Self {
        let label = header.trim().to_string();
        let year = YEAR
            .find(&label)
            .and_then(|m| m.as_str().parse::<i32>().ok());
        Period { label, year }
    }

    /// Short display form: the year when known, otherwise the full label.
    pub fn short(&self) -> String {
        match self.year {
            Some(y) => y.to_string(),
            None => self.label.clone(),
        }
    }

    /// True when both periods refer to the same fiscal year (or, lacking
    /// years, carry the same label).
    pub fn same_as(&self, other: &Period) -> bool {
        match (self.year, other.year) {
            (Some(a), Some(b)) => a == b,
            _ => self.label == other.label,
        }
    }
}

/// Round to two decimal places (banker's rounding, as numpy does).
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp(2)
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
