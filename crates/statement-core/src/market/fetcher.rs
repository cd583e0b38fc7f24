use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::ratios::{RatioSource, RatioTable};
use crate::types::Period;

/// Accounting standard of a market data page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ReportingStandard {
    #[serde(rename = "MSFO")]
    Msfo,
    #[serde(rename = "RSBU")]
    Rsbu,
}

impl std::fmt::Display for ReportingStandard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportingStandard::Msfo => f.write_str("MSFO"),
            ReportingStandard::Rsbu => f.write_str("RSBU"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketIndicator {
    Eps,
    PE,
    PS,
    PBv,
    EvEbitda,
    DebtEbitda,
}

impl MarketIndicator {
    pub const ALL: [MarketIndicator; 6] = [
        MarketIndicator::Eps,
        MarketIndicator::PE,
        MarketIndicator::PS,
        MarketIndicator::PBv,
        MarketIndicator::EvEbitda,
        MarketIndicator::DebtEbitda,
    ];

    /// Field code used by the market data pages.
    pub fn code(&self) -> &'static str {
        match self {
            MarketIndicator::Eps => "eps",
            MarketIndicator::PE => "p_e",
            MarketIndicator::PS => "p_s",
            MarketIndicator::PBv => "p_bv",
            MarketIndicator::EvEbitda => "ev_ebitda",
            MarketIndicator::DebtEbitda => "debt_ebitda",
        }
    }

    /// Ratio name, matching the benchmark table.
    pub fn name(&self) -> &'static str {
        match self {
            MarketIndicator::Eps => "EPS",
            MarketIndicator::PE => "P/E",
            MarketIndicator::PS => "P/S",
            MarketIndicator::PBv => "P/BV",
            MarketIndicator::EvEbitda => "EV/EBITDA",
            MarketIndicator::DebtEbitda => "Debt/EBITDA",
        }
    }

    pub fn from_code(code: &str) -> Option<MarketIndicator> {
        Self::ALL.into_iter().find(|i| i.code() == code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Ticker '{0}' is invalid")]
    InvalidTicker(String),

    #[error("Indicator '{0}' is unavailable")]
    IndicatorUnavailable(String),
}

/// A fetched batch: rows for the indicators found, plus the ones that were not.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedRatios {
    pub table: RatioTable,
    pub unavailable: Vec<FetchError>,
}

impl FetchedRatios {
    pub fn empty(years: &[String]) -> Self {
        FetchedRatios {
            table: RatioTable::new(years.iter().map(|y| Period::from_header(y)).collect()),
            unavailable: Vec::new(),
        }
    }

    /// Append another batch over the same years.
    pub fn extend(&mut self, other: FetchedRatios) {
        for record in other.table.records {
            // Same year columns by construction.
            let _ = self.table.insert(record.name, record.source, record.values);
        }
        self.unavailable.extend(other.unavailable);
    }
}

/// Source of market multiples by ticker.
///
/// Columns of the returned table follow `years` in the order given.
pub trait RatioFetcher {
    fn fetch(
        &self,
        ticker: &str,
        indicators: &[MarketIndicator],
        years: &[String],
        standard: ReportingStandard,
    ) -> Result<FetchedRatios, FetchError>;
}

const RSBU_BATCH: [MarketIndicator; 4] = [
    MarketIndicator::Eps,
    MarketIndicator::PE,
    MarketIndicator::PS,
    MarketIndicator::PBv,
];
const MSFO_BATCH: [MarketIndicator; 2] = [MarketIndicator::EvEbitda, MarketIndicator::DebtEbitda];

/// The standard enrichment batch: per-share and price multiples under RSBU,
/// enterprise-value multiples under MSFO.
///
/// A standard with no page for the ticker marks its indicators unavailable;
/// the ticker is invalid only when neither standard resolves.
pub fn fetch_market_ratios(
    fetcher: &dyn RatioFetcher,
    ticker: &str,
    years: &[String],
) -> Result<FetchedRatios, FetchError> {
    let mut fetched = FetchedRatios::empty(years);
    let mut resolved = false;

    for (standard, batch) in [
        (ReportingStandard::Rsbu, &RSBU_BATCH[..]),
        (ReportingStandard::Msfo, &MSFO_BATCH[..]),
    ] {
        match fetcher.fetch(ticker, batch, years, standard) {
            Ok(part) => {
                resolved = true;
                fetched.extend(part);
            }
            Err(FetchError::InvalidTicker(_)) => {
                warn!(ticker, %standard, "no market data page");
                fetched.unavailable.extend(
                    batch
                        .iter()
                        .map(|i| FetchError::IndicatorUnavailable(i.name().to_string())),
                );
            }
            Err(e) => fetched.unavailable.push(e),
        }
    }

    if !resolved {
        return Err(FetchError::InvalidTicker(ticker.to_string()));
    }
    debug!(
        ticker,
        rows = fetched.table.len(),
        unavailable = fetched.unavailable.len(),
        "fetched market ratios"
    );
    for record in &mut fetched.table.records {
        record.source = RatioSource::External;
    }
    Ok(fetched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    struct RsbuOnly;

    impl RatioFetcher for RsbuOnly {
        fn fetch(
            &self,
            ticker: &str,
            indicators: &[MarketIndicator],
            years: &[String],
            standard: ReportingStandard,
        ) -> Result<FetchedRatios, FetchError> {
            if standard == ReportingStandard::Msfo || ticker != "SBER" {
                return Err(FetchError::InvalidTicker(ticker.into()));
            }
            let mut out = FetchedRatios::empty(years);
            for i in indicators {
                out.table
                    .insert(i.name(), RatioSource::Computed, vec![Some(dec!(1)); years.len()])
                    .unwrap();
            }
            Ok(out)
        }
    }

    fn years() -> Vec<String> {
        vec!["2024".into(), "2023".into()]
    }

    #[test]
    fn test_indicator_codes_round_trip() {
        for i in MarketIndicator::ALL {
            assert_eq!(MarketIndicator::from_code(i.code()), Some(i));
        }
        assert_eq!(MarketIndicator::from_code("p_e").unwrap().name(), "P/E");
        assert_eq!(MarketIndicator::from_code("roe"), None);
    }

    #[test]
    fn test_missing_standard_marks_batch_unavailable() {
        let fetched = fetch_market_ratios(&RsbuOnly, "SBER", &years()).unwrap();
        let names: Vec<&str> = fetched.table.names().collect();
        assert_eq!(names, vec!["EPS", "P/E", "P/S", "P/BV"]);
        assert!(fetched
            .table
            .records
            .iter()
            .all(|r| r.source == RatioSource::External));
        assert_eq!(
            fetched.unavailable,
            vec![
                FetchError::IndicatorUnavailable("EV/EBITDA".into()),
                FetchError::IndicatorUnavailable("Debt/EBITDA".into()),
            ]
        );
    }

    #[test]
    fn test_unknown_ticker_is_invalid() {
        assert_eq!(
            fetch_market_ratios(&RsbuOnly, "NOPE", &years()).unwrap_err(),
            FetchError::InvalidTicker("NOPE".into())
        );
    }
}
