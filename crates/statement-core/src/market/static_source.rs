//! Market data served from pre-scraped pages.
//!
//! JSON layout, keyed by ticker then standard:
//!
//! ```json
//! {"tickers": {"SBER": {"RSBU": {
//!     "years": ["2022", "2023", "2024?"],
//!     "indicators": {"p_e": {"label": "P/E", "cells": ["4.1", "3.9", "4.2"]}}
//! }}}}
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::fetcher::{FetchError, FetchedRatios, MarketIndicator, RatioFetcher, ReportingStandard};
use crate::ratios::RatioSource;
use crate::statements::numeric::parse_market_value;
use crate::types::Cell;
use crate::AnalysisResult;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicatorRow {
    /// Row caption as shown on the page.
    #[serde(default)]
    pub label: String,
    pub cells: Vec<String>,
}

/// One page: the year header row and the indicator rows beneath it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MarketPage {
    pub years: Vec<String>,
    #[serde(default)]
    pub indicators: BTreeMap<String, IndicatorRow>,
}

impl MarketPage {
    /// Position of `year` in the header; trailing `?` marks are ignored.
    fn year_index(&self, year: &str) -> Option<usize> {
        self.years
            .iter()
            .position(|y| y.trim().trim_end_matches('?') == year)
    }

    fn values(&self, row: &IndicatorRow, years: &[String]) -> Vec<Cell> {
        years
            .iter()
            .map(|y| {
                self.year_index(y)
                    .and_then(|i| row.cells.get(i))
                    .and_then(|c| parse_market_value(c))
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StaticRatioSource {
    pub tickers: BTreeMap<String, BTreeMap<ReportingStandard, MarketPage>>,
}

impl StaticRatioSource {
    pub fn from_json(json: &str) -> AnalysisResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn page(&self, ticker: &str, standard: ReportingStandard) -> Option<&MarketPage> {
        self.tickers
            .iter()
            .find(|(t, _)| t.eq_ignore_ascii_case(ticker.trim()))
            .and_then(|(_, pages)| pages.get(&standard))
    }
}

impl RatioFetcher for StaticRatioSource {
    fn fetch(
        &self,
        ticker: &str,
        indicators: &[MarketIndicator],
        years: &[String],
        standard: ReportingStandard,
    ) -> Result<FetchedRatios, FetchError> {
        let page = self
            .page(ticker, standard)
            .ok_or_else(|| FetchError::InvalidTicker(ticker.to_string()))?;

        let mut fetched = FetchedRatios::empty(years);
        for indicator in indicators {
            match page.indicators.get(indicator.code()) {
                Some(row) => {
                    // Column count equals `years` by construction.
                    let _ = fetched.table.insert(
                        indicator.name(),
                        RatioSource::External,
                        page.values(row, years),
                    );
                }
                None => fetched
                    .unavailable
                    .push(FetchError::IndicatorUnavailable(indicator.name().to_string())),
            }
        }
        Ok(fetched)
    }
}
