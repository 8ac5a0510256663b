use lineal_core::{Float, LinearError, LinearResult, Matrix};
use lineal_metrics::r2_score;
use lineal_solvers::{ClosedForm, FitOutcome};
use serde::{Deserialize, Serialize};

use crate::validate::{check_fit_inputs, check_score_target, decision_values, require_non_negative};

/// Ordinary least squares: `y = Xw + b` via the normal equations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "T: Float")]
pub struct LinearRegression<T: Float> {
    pub fit_intercept: bool,
    pub pivot_tolerance: T,
    fitted: Option<FitOutcome<T>>,
}

impl<T: Float> LinearRegression<T> {
    pub fn new(fit_intercept: bool) -> Self {
        LinearRegression {
            fit_intercept,
            pivot_tolerance: T::from_f64(lineal_linalg::DEFAULT_PIVOT_TOLERANCE),
            fitted: None,
        }
    }

    pub fn fit(&mut self, x: &Matrix<T>, y: &[T]) -> LinearResult<FitOutcome<T>> {
        check_fit_inputs(x, y)?;
        let mut solver = ClosedForm::new(T::ZERO, self.fit_intercept);
        solver.pivot_tolerance = self.pivot_tolerance;
        let outcome = solver.run(x, y)?;
        self.fitted = Some(outcome.clone());
        Ok(outcome)
    }

    pub fn predict(&self, x: &Matrix<T>) -> LinearResult<Vec<T>> {
        let fitted = self.fitted.as_ref().ok_or(LinearError::NotFitted)?;
        decision_values(x, fitted)
    }

    /// R² of the predictions against `y`.
    pub fn score(&self, x: &Matrix<T>, y: &[T]) -> LinearResult<f64> {
        let predictions = self.predict(x)?;
        check_score_target(&predictions, y)?;
        Ok(r2_score(y, &predictions))
    }

    pub fn coefficients(&self) -> Option<&FitOutcome<T>> {
        self.fitted.as_ref()
    }
}

/// L2-regularized least squares: `(XᵀX + αI)w = Xᵀy`, intercept unpenalized.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "T: Float")]
pub struct Ridge<T: Float> {
    pub alpha: T,
    pub fit_intercept: bool,
    pub pivot_tolerance: T,
    fitted: Option<FitOutcome<T>>,
}

impl<T: Float> Ridge<T> {
    pub fn new(alpha: T, fit_intercept: bool) -> LinearResult<Self> {
        Ok(Ridge {
            alpha: require_non_negative("alpha", alpha)?,
            fit_intercept,
            pivot_tolerance: T::from_f64(lineal_linalg::DEFAULT_PIVOT_TOLERANCE),
            fitted: None,
        })
    }

    pub fn fit(&mut self, x: &Matrix<T>, y: &[T]) -> LinearResult<FitOutcome<T>> {
        check_fit_inputs(x, y)?;
        let mut solver = ClosedForm::new(self.alpha, self.fit_intercept);
        solver.pivot_tolerance = self.pivot_tolerance;
        let outcome = solver.run(x, y)?;
        self.fitted = Some(outcome.clone());
        Ok(outcome)
    }

    pub fn predict(&self, x: &Matrix<T>) -> LinearResult<Vec<T>> {
        let fitted = self.fitted.as_ref().ok_or(LinearError::NotFitted)?;
        decision_values(x, fitted)
    }

    pub fn score(&self, x: &Matrix<T>, y: &[T]) -> LinearResult<f64> {
        let predictions = self.predict(x)?;
        check_score_target(&predictions, y)?;
        Ok(r2_score(y, &predictions))
    }

    pub fn coefficients(&self) -> Option<&FitOutcome<T>> {
        self.fitted.as_ref()
    }
}
