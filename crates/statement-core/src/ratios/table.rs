use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

use crate::error::AnalysisError;
use crate::statements::numeric::parse_market_value;
use crate::types::{Cell, Period};
use crate::AnalysisResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioSource {
    #[default]
    Computed,
    External,
}

/// A named ratio with one value per period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioRecord {
    pub name: String,
    #[serde(default)]
    pub source: RatioSource,
    #[serde(deserialize_with = "lenient_cells")]
    pub values: Vec<Cell>,
}

/// Ratios in insertion order, all sharing the same period columns.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RatioTable {
    pub periods: Vec<Period>,
    pub records: Vec<RatioRecord>,
}

impl RatioTable {
    pub fn new(periods: Vec<Period>) -> Self {
        RatioTable {
            periods,
            records: Vec::new(),
        }
    }

    /// Append a ratio, replacing an existing row of the same name in place.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        source: RatioSource,
        values: Vec<Cell>,
    ) -> AnalysisResult<()> {
        let name = name.into();
        if values.len() != self.periods.len() {
            return Err(AnalysisError::PeriodMismatch {
                expected: self.periods.len(),
                found: values.len(),
            });
        }
        let record = RatioRecord {
            name,
            source,
            values,
        };
        match self.position(&record.name) {
            Some(i) => self.records[i] = record,
            None => self.records.push(record),
        }
        Ok(())
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        let wanted = normalize_name(name);
        self.records
            .iter()
            .position(|r| normalize_name(&r.name) == wanted)
    }

    pub fn get(&self, name: &str) -> Option<&RatioRecord> {
        self.position(name).map(|i| &self.records[i])
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True when every record carries exactly one value per period.
    pub fn is_rectangular(&self) -> bool {
        self.records
            .iter()
            .all(|r| r.values.len() == self.periods.len())
    }
}

/// Case-fold and collapse whitespace so `"ROE, %"` and `"roe,  %"` match.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Accept numbers, numeric strings, and anything else as a missing value.
fn lenient_cells<'de, D>(deserializer: D) -> Result<Vec<Cell>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<serde_json::Value> = Vec::deserialize(deserializer)?;
    Ok(raw
        .iter()
        .map(|v| match v {
            serde_json::Value::Number(n) => Decimal::from_str(&n.to_string())
                .or_else(|_| Decimal::from_scientific(&n.to_string()))
                .ok(),
            serde_json::Value::String(s) => parse_market_value(s),
            _ => None,
        })
        .collect())
}
