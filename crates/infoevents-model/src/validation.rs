use thiserror::Error;

/// Validation errors for model primitives.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// When a value does not match the required pattern.
    #[error("{field} ('{value}') is not allowed")]
    PatternMismatch {
        /// Field name that failed validation.
        field: &'static str,
        /// Offending value.
        value: String,
    },
    /// When a numeric component does not fit its range.
    #[error("{field} ({value}) is out of range")]
    OutOfRange {
        /// Field name that is out of range.
        field: &'static str,
        /// Offending value.
        value: String,
    },
}
