pub mod error;
pub mod types;

#[cfg(feature = "statements")]
pub mod statements;

#[cfg(feature = "analysis")]
pub mod analysis;

#[cfg(feature = "ratios")]
pub mod ratios;

#[cfg(feature = "market")]
pub mod market;

#[cfg(feature = "market")]
pub mod report;

#[cfg(all(feature = "analysis", feature = "ratios"))]
pub mod view;

pub use error::AnalysisError;
pub use types::*;

/// Standard result type for all statement-analysis operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;
