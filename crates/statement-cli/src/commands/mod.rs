pub mod benchmarks;
pub mod cash_flows;
pub mod ratios;
pub mod statement;

use statement_core::AnalysisError;

/// Prefix the boundary category so the user can tell a wrong file from a
/// wrong company profile.
pub fn classified(e: AnalysisError) -> Box<dyn std::error::Error> {
    format!("[{}] {}", e.category(), e).into()
}
