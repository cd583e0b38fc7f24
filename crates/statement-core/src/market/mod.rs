pub mod fetcher;
pub mod static_source;

pub use fetcher::{
    fetch_market_ratios, FetchError, FetchedRatios, MarketIndicator, RatioFetcher,
    ReportingStandard,
};
pub use static_source::{IndicatorRow, MarketPage, StaticRatioSource};
