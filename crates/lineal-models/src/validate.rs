use lineal_core::{Float, LinearError, LinearResult, Matrix};
use lineal_linalg::dot;
use lineal_solvers::FitOutcome;

/// Construction-time hyperparameter checks. These run before any data is
/// touched; a bad value never reaches a solver.
pub(crate) fn require_non_negative<T: Float>(name: &'static str, value: T) -> LinearResult<T> {
    if value < T::ZERO || !value.is_finite() {
        return Err(LinearError::InvalidHyperparameter {
            name,
            value: value.to_f64(),
            requirement: "must be a non-negative real",
        });
    }
    Ok(value)
}

pub(crate) fn require_positive<T: Float>(name: &'static str, value: T) -> LinearResult<T> {
    if value <= T::ZERO || !value.is_finite() {
        return Err(LinearError::InvalidHyperparameter {
            name,
            value: value.to_f64(),
            requirement: "must be a positive real",
        });
    }
    Ok(value)
}

pub(crate) fn require_unit_interval<T: Float>(name: &'static str, value: T) -> LinearResult<T> {
    if value < T::ZERO || value > T::ONE || !value.is_finite() {
        return Err(LinearError::InvalidHyperparameter {
            name,
            value: value.to_f64(),
            requirement: "must lie in [0, 1]",
        });
    }
    Ok(value)
}

pub(crate) fn require_positive_count(name: &'static str, value: usize) -> LinearResult<usize> {
    if value == 0 {
        return Err(LinearError::InvalidHyperparameter {
            name,
            value: 0.0,
            requirement: "must be a positive integer",
        });
    }
    Ok(value)
}

/// Shape and finiteness checks shared by every fit implementation.
pub(crate) fn check_fit_inputs<T: Float>(x: &Matrix<T>, y: &[T]) -> LinearResult<()> {
    if x.rows() != y.len() {
        return Err(LinearError::DimensionMismatch {
            context: "fit: rows of X vs length of y",
            expected: x.rows(),
            got: y.len(),
        });
    }
    x.ensure_finite()?;
    for (i, v) in y.iter().enumerate() {
        if !v.is_finite() {
            return Err(LinearError::NonNumericInput { row: i, col: 0 });
        }
    }
    Ok(())
}

/// Raw linear decision values for a fitted model; fails when the feature
/// count differs from fit time.
pub(crate) fn decision_values<T: Float>(
    x: &Matrix<T>,
    fitted: &FitOutcome<T>,
) -> LinearResult<Vec<T>> {
    if x.cols() != fitted.n_features() {
        return Err(LinearError::DimensionMismatch {
            context: "predict: feature count vs fit time",
            expected: fitted.n_features(),
            got: x.cols(),
        });
    }
    x.ensure_finite()?;
    Ok((0..x.rows())
        .map(|i| dot(x.row(i), &fitted.weights) + fitted.intercept)
        .collect())
}

/// Target-length check for score implementations.
pub(crate) fn check_score_target<T: Float>(predictions: &[T], y: &[T]) -> LinearResult<()> {
    if predictions.len() != y.len() {
        return Err(LinearError::DimensionMismatch {
            context: "score: predictions vs length of y",
            expected: predictions.len(),
            got: y.len(),
        });
    }
    Ok(())
}
