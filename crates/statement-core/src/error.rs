use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Statement not found: the workbook has no '{sheet}' sheet")]
    StatementNotFound { sheet: String },

    #[error("Expected line item not found: '{item}' in {statement}")]
    LineItemNotFound { item: String, statement: String },

    #[error("Period mismatch: expected {expected} period columns, found {found}")]
    PeriodMismatch { expected: usize, found: usize },

    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl AnalysisError {
    /// Boundary classification shown to callers alongside the message.
    pub fn category(&self) -> &'static str {
        match self {
            AnalysisError::StatementNotFound { .. } => "wrong_file",
            AnalysisError::LineItemNotFound { .. } => "wrong_sheet_shape",
            AnalysisError::PeriodMismatch { .. } => "wrong_company_profile",
            AnalysisError::InvalidInput { .. } => "invalid_input",
            AnalysisError::InsufficientData(_) => "insufficient_data",
            AnalysisError::SerializationError(_) => "serialization",
        }
    }
}

impl From<serde_json::Error> for AnalysisError {
    fn from(e: serde_json::Error) -> Self {
        AnalysisError::SerializationError(e.to_string())
    }
}
