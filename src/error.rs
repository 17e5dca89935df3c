//! Error types for loading and analyzing performance records.

/// Result type for dataset and engine operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Every failure the record pipeline can report.
///
/// Degenerate statistics (a single-member group, a constant column) are not
/// errors; they surface as [`crate::models::Statistic::Undefined`].
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Schema error in row {row}: field `{field}` {reason}")]
    Schema {
        row: usize,
        field: String,
        reason: String,
    },

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Column `{0}` is not numeric")]
    NonNumericColumn(String),

    #[error("Dataset is empty")]
    EmptyDataset,

    #[error("Not enough data: {found} complete pairs, at least {required} required")]
    InsufficientData { found: usize, required: usize },

    #[error("Record source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Record source query failed: {0}")]
    SourceQuery(String),
}

impl AnalysisError {
    /// Shorthand for a schema violation at `row`.
    pub fn schema(row: usize, field: impl Into<String>, reason: impl Into<String>) -> Self {
        AnalysisError::Schema {
            row,
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<rusqlite::Error> for AnalysisError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(ref code, _)
                if matches!(
                    code.code,
                    rusqlite::ErrorCode::CannotOpen
                        | rusqlite::ErrorCode::NotADatabase
                        | rusqlite::ErrorCode::PermissionDenied
                        | rusqlite::ErrorCode::DatabaseBusy
                        | rusqlite::ErrorCode::DatabaseLocked
                ) =>
            {
                AnalysisError::SourceUnavailable(err.to_string())
            }
            other => AnalysisError::SourceQuery(other.to_string()),
        }
    }
}
