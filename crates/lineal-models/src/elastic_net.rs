use lineal_core::{Float, LinearError, LinearResult, Matrix};
use lineal_metrics::r2_score;
use lineal_objective::Penalty;
use lineal_solvers::{CoordinateDescent, FitOutcome};
use serde::{Deserialize, Serialize};

use crate::validate::{
    check_fit_inputs, check_score_target, decision_values, require_non_negative,
    require_positive, require_positive_count, require_unit_interval,
};

/// L1-regularized least squares, fitted by coordinate descent.
///
/// Minimizes (1/2n)·‖y − Xw − b‖² + α·‖w‖₁.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "T: Float")]
pub struct Lasso<T: Float> {
    pub alpha: T,
    pub fit_intercept: bool,
    pub max_iterations: usize,
    pub tolerance: T,
    fitted: Option<FitOutcome<T>>,
}

impl<T: Float> Lasso<T> {
    pub fn new(alpha: T) -> LinearResult<Self> {
        Ok(Lasso {
            alpha: require_non_negative("alpha", alpha)?,
            fit_intercept: true,
            max_iterations: 1000,
            tolerance: T::from_f64(1e-4),
            fitted: None,
        })
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> LinearResult<Self> {
        self.max_iterations = require_positive_count("max_iterations", max_iterations)?;
        Ok(self)
    }

    pub fn with_tolerance(mut self, tolerance: T) -> LinearResult<Self> {
        self.tolerance = require_positive("tolerance", tolerance)?;
        Ok(self)
    }

    pub fn fit(&mut self, x: &Matrix<T>, y: &[T]) -> LinearResult<FitOutcome<T>> {
        self.fit_warm(x, y, None)
    }

    /// Fit starting from a previously computed coefficient vector.
    pub fn fit_warm(
        &mut self,
        x: &Matrix<T>,
        y: &[T],
        warm_start: Option<&[T]>,
    ) -> LinearResult<FitOutcome<T>> {
        check_fit_inputs(x, y)?;
        let mut solver =
            CoordinateDescent::new(Penalty::L1 { alpha: self.alpha }, self.fit_intercept);
        solver.max_iterations = self.max_iterations;
        solver.tolerance = self.tolerance;
        let outcome = solver.run(x, y, warm_start)?;
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

/// Mixed L1/L2 regularization, fitted by coordinate descent.
///
/// Minimizes (1/2n)·‖y − Xw − b‖² + α·(ρ‖w‖₁ + (1−ρ)/2·‖w‖²)
/// for mixing ratio ρ; ρ = 1 recovers the lasso, ρ = 0 a ridge penalty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "T: Float")]
pub struct ElasticNet<T: Float> {
    pub alpha: T,
    pub l1_ratio: T,
    pub fit_intercept: bool,
    pub max_iterations: usize,
    pub tolerance: T,
    fitted: Option<FitOutcome<T>>,
}

impl<T: Float> ElasticNet<T> {
    pub fn new(alpha: T, l1_ratio: T) -> LinearResult<Self> {
        Ok(ElasticNet {
            alpha: require_non_negative("alpha", alpha)?,
            l1_ratio: require_unit_interval("l1_ratio", l1_ratio)?,
            fit_intercept: true,
            max_iterations: 1000,
            tolerance: T::from_f64(1e-4),
            fitted: None,
        })
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> LinearResult<Self> {
        self.max_iterations = require_positive_count("max_iterations", max_iterations)?;
        Ok(self)
    }

    pub fn with_tolerance(mut self, tolerance: T) -> LinearResult<Self> {
        self.tolerance = require_positive("tolerance", tolerance)?;
        Ok(self)
    }

    pub fn fit(&mut self, x: &Matrix<T>, y: &[T]) -> LinearResult<FitOutcome<T>> {
        check_fit_inputs(x, y)?;
        let penalty = Penalty::ElasticNet { alpha: self.alpha, l1_ratio: self.l1_ratio };
        let mut solver = CoordinateDescent::new(penalty, self.fit_intercept);
        solver.max_iterations = self.max_iterations;
        solver.tolerance = self.tolerance;
        let outcome = solver.run(x, y, None)?;
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

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use crate::regression::LinearRegression;

    fn data() -> (Matrix<f64>, Vec<f64>) {
        // y = 2*x1, second feature pure noise around zero
        let x = Matrix::from_rows(&[
            vec![1.0, 0.2],
            vec![2.0, -0.4],
            vec![3.0, 0.1],
            vec![4.0, -0.3],
            vec![5.0, 0.5],
            vec![6.0, -0.2],
        ])
        .unwrap();
        let y = vec![2.0, 4.0, 6.0, 8.0, 10.0, 12.0];
        (x, y)
    }

    #[test]
    fn lasso_rejects_negative_alpha() {
        assert!(matches!(
            Lasso::<f64>::new(-1.0),
            Err(LinearError::InvalidHyperparameter { name: "alpha", .. })
        ));
    }

    #[test]
    fn elastic_net_rejects_ratio_outside_unit_interval() {
        assert!(Lasso::<f64>::new(0.1).is_ok());
        assert!(matches!(
            ElasticNet::<f64>::new(0.1, 1.5),
            Err(LinearError::InvalidHyperparameter { name: "l1_ratio", .. })
        ));
        assert!(matches!(
            ElasticNet::<f64>::new(0.1, -0.1),
            Err(LinearError::InvalidHyperparameter { name: "l1_ratio", .. })
        ));
    }

    #[test]
    fn zero_max_iterations_is_rejected_eagerly() {
        let err = Lasso::<f64>::new(0.1).unwrap().with_max_iterations(0);
        assert!(matches!(
            err,
            Err(LinearError::InvalidHyperparameter { name: "max_iterations", .. })
        ));
    }

    #[test]
    fn lasso_with_tiny_alpha_matches_ols() {
        let (x, y) = data();
        let mut ols = LinearRegression::new(true);
        let ols_out = ols.fit(&x, &y).unwrap();

        let mut lasso = Lasso::new(1e-8)
            .unwrap()
            .with_tolerance(1e-8)
            .unwrap()
            .with_max_iterations(10_000)
            .unwrap();
        let lasso_out = lasso.fit(&x, &y).unwrap();
        assert_relative_eq!(lasso_out.weights[0], ols_out.weights[0], max_relative = 1e-4);
    }

    #[test]
    fn fit_warm_rejects_wrong_coefficient_count() {
        let (x, y) = data();
        let mut lasso = Lasso::new(0.1).unwrap();
        assert!(matches!(
            lasso.fit_warm(&x, &y, Some(&[1.0, 2.0, 3.0])),
            Err(LinearError::DimensionMismatch { expected: 2, got: 3, .. })
        ));
    }

    #[test]
    fn large_alpha_zeroes_every_coefficient() {
        let (x, y) = data();
        let mut lasso = Lasso::new(1e5).unwrap();
        let outcome = lasso.fit(&x, &y).unwrap();
        assert!(outcome.weights.iter().all(|&w| w == 0.0));
    }

    #[test]
    fn ratio_one_reproduces_lasso() {
        let (x, y) = data();
        let mut lasso = Lasso::new(0.05).unwrap();
        let mut net = ElasticNet::new(0.05, 1.0).unwrap();
        let a = lasso.fit(&x, &y).unwrap();
        let b = net.fit(&x, &y).unwrap();
        for (&wa, &wb) in a.weights.iter().zip(b.weights.iter()) {
            assert_abs_diff_eq!(wa, wb, epsilon = 1e-10);
        }
        assert_abs_diff_eq!(a.intercept, b.intercept, epsilon = 1e-10);
    }

    #[test]
    fn ratio_zero_behaves_like_ridge() {
        let (x, y) = data();
        let mut net = ElasticNet::new(0.5, 0.0)
            .unwrap()
            .with_tolerance(1e-8)
            .unwrap()
            .with_max_iterations(10_000)
            .unwrap();
        let net_out = net.fit(&x, &y).unwrap();
        // No L1 component: nothing is thresholded to an exact zero.
        assert!(net_out.weights[0] != 0.0);
        // Shrinks relative to OLS, like a ridge penalty does.
        let mut ols = LinearRegression::new(true);
        let ols_out = ols.fit(&x, &y).unwrap();
        assert!(net_out.weights[0].abs() < ols_out.weights[0].abs());

        // The zero-ratio net takes the same coordinate steps as a pure
        // quadratic penalty of the same strength.
        let mut l2 = CoordinateDescent::new(Penalty::L2 { alpha: 0.5 }, true);
        l2.tolerance = 1e-8;
        l2.max_iterations = 10_000;
        let l2_out = l2.run(&x, &y, None).unwrap();
        for (&wn, &wr) in net_out.weights.iter().zip(l2_out.weights.iter()) {
            assert_abs_diff_eq!(wn, wr, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(net_out.intercept, l2_out.intercept, epsilon = 1e-12);
    }

    #[test]
    fn elastic_net_predicts_the_training_targets() {
        let (x, y) = data();
        let mut net = ElasticNet::new(0.01, 0.5).unwrap();
        net.fit(&x, &y).unwrap();
        assert!(net.score(&x, &y).unwrap() > 0.98);
    }
}
