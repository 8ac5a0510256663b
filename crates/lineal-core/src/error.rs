use thiserror::Error;

/// Shared error type for every crate in the workspace.
///
/// Non-convergence is deliberately absent: reaching an iteration cap is a
/// status reported in the fit outcome, not a failure.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LinearError {
    #[error("dimension mismatch in {context}: expected {expected}, got {got}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("singular matrix: no pivot above tolerance in column {column}")]
    SingularMatrix { column: usize },

    #[error("non-finite value at row {row}, column {col}")]
    NonNumericInput { row: usize, col: usize },

    #[error("invalid hyperparameter {name}: {value} ({requirement})")]
    InvalidHyperparameter {
        name: &'static str,
        value: f64,
        requirement: &'static str,
    },

    #[error("model has not been fitted; call fit before predict or score")]
    NotFitted,
}

pub type LinearResult<T> = Result<T, LinearError>;
