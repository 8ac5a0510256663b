use lineal_core::{Float, LinearError, LinearResult, Matrix};
use lineal_metrics::{accuracy, r2_score};
use lineal_objective::{Loss, Objective, Penalty};
use lineal_solvers::{
    FitOutcome, GradientDescent, LearningRate, MarginRule, MistakeDriven, Traversal,
};
use serde::{Deserialize, Serialize};

use crate::validate::{
    check_fit_inputs, check_score_target, decision_values, require_non_negative,
    require_positive, require_positive_count,
};

/// Linear regression trained by stochastic gradient descent: one shuffled
/// example per update, reshuffled every pass from a fixed seed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "T: Float")]
pub struct SgdRegressor<T: Float> {
    pub learning_rate: LearningRate<T>,
    pub l2: T,
    pub fit_intercept: bool,
    pub max_iterations: usize,
    pub tolerance: T,
    pub random_seed: u64,
    fitted: Option<FitOutcome<T>>,
}

impl<T: Float> SgdRegressor<T> {
    pub fn new(learning_rate: T) -> LinearResult<Self> {
        Ok(SgdRegressor {
            learning_rate: LearningRate::Constant(require_positive(
                "learning_rate",
                learning_rate,
            )?),
            l2: T::ZERO,
            fit_intercept: true,
            max_iterations: 1000,
            tolerance: T::from_f64(1e-6),
            random_seed: 0,
            fitted: None,
        })
    }

    pub fn with_decay(mut self, decay: T) -> LinearResult<Self> {
        let decay = require_non_negative("decay", decay)?;
        self.learning_rate = LearningRate::Decaying {
            initial: self.learning_rate.initial(),
            decay,
        };
        Ok(self)
    }

    pub fn with_l2(mut self, alpha: T) -> LinearResult<Self> {
        self.l2 = require_non_negative("alpha", alpha)?;
        Ok(self)
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> LinearResult<Self> {
        self.max_iterations = require_positive_count("max_iterations", max_iterations)?;
        Ok(self)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    pub fn fit(&mut self, x: &Matrix<T>, y: &[T]) -> LinearResult<FitOutcome<T>> {
        check_fit_inputs(x, y)?;
        let penalty = if self.l2 > T::ZERO {
            Penalty::L2 { alpha: self.l2 }
        } else {
            Penalty::None
        };
        let mut solver =
            GradientDescent::new(Objective::new(Loss::Squared, penalty), self.learning_rate);
        solver.traversal = Traversal::Stochastic { seed: self.random_seed };
        solver.fit_intercept = self.fit_intercept;
        solver.max_iterations = self.max_iterations;
        solver.tolerance = self.tolerance;
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
}

/// Classic perceptron classifier on {0, 1} targets; labels are mapped to
/// signed form internally for the mistake-driven update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "T: Float")]
pub struct Perceptron<T: Float> {
    pub learning_rate: T,
    pub fit_intercept: bool,
    pub max_iterations: usize,
    fitted: Option<FitOutcome<T>>,
}

impl<T: Float> Perceptron<T> {
    pub fn new(learning_rate: T) -> LinearResult<Self> {
        Ok(Perceptron {
            learning_rate: require_positive("learning_rate", learning_rate)?,
            fit_intercept: true,
            max_iterations: 1000,
            fitted: None,
        })
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> LinearResult<Self> {
        self.max_iterations = require_positive_count("max_iterations", max_iterations)?;
        Ok(self)
    }

    pub fn fit(&mut self, x: &Matrix<T>, y: &[T]) -> LinearResult<FitOutcome<T>> {
        check_fit_inputs(x, y)?;
        let signed = to_signed_labels(y);
        let mut solver =
            MistakeDriven::new(MarginRule::Perceptron { learning_rate: self.learning_rate });
        solver.fit_intercept = self.fit_intercept;
        solver.max_iterations = self.max_iterations;
        let outcome = solver.run(x, &signed)?;
        self.fitted = Some(outcome.clone());
        Ok(outcome)
    }

    /// Raw margin w·x + b for each row.
    pub fn decision_function(&self, x: &Matrix<T>) -> LinearResult<Vec<T>> {
        let fitted = self.fitted.as_ref().ok_or(LinearError::NotFitted)?;
        decision_values(x, fitted)
    }

    pub fn predict(&self, x: &Matrix<T>) -> LinearResult<Vec<T>> {
        Ok(self
            .decision_function(x)?
            .into_iter()
            .map(|s| if s >= T::ZERO { T::ONE } else { T::ZERO })
            .collect())
    }

    pub fn score(&self, x: &Matrix<T>, y: &[T]) -> LinearResult<f64> {
        let predictions = self.predict(x)?;
        check_score_target(&predictions, y)?;
        Ok(accuracy(y, &predictions))
    }
}

/// Passive-Aggressive classifier (PA-I) on {0, 1} targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "T: Float")]
pub struct PassiveAggressive<T: Float> {
    /// Aggressiveness C: cap on the per-mistake step size.
    pub aggressiveness: T,
    pub fit_intercept: bool,
    pub max_iterations: usize,
    pub tolerance: T,
    fitted: Option<FitOutcome<T>>,
}

impl<T: Float> PassiveAggressive<T> {
    pub fn new(aggressiveness: T) -> LinearResult<Self> {
        Ok(PassiveAggressive {
            aggressiveness: require_positive("aggressiveness", aggressiveness)?,
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

    pub fn fit(&mut self, x: &Matrix<T>, y: &[T]) -> LinearResult<FitOutcome<T>> {
        check_fit_inputs(x, y)?;
        let signed = to_signed_labels(y);
        let mut solver = MistakeDriven::new(MarginRule::PassiveAggressive {
            aggressiveness: self.aggressiveness,
        });
        solver.fit_intercept = self.fit_intercept;
        solver.max_iterations = self.max_iterations;
        solver.tolerance = self.tolerance;
        let outcome = solver.run(x, &signed)?;
        self.fitted = Some(outcome.clone());
        Ok(outcome)
    }

    pub fn decision_function(&self, x: &Matrix<T>) -> LinearResult<Vec<T>> {
        let fitted = self.fitted.as_ref().ok_or(LinearError::NotFitted)?;
        decision_values(x, fitted)
    }

    pub fn predict(&self, x: &Matrix<T>) -> LinearResult<Vec<T>> {
        Ok(self
            .decision_function(x)?
            .into_iter()
            .map(|s| if s >= T::ZERO { T::ONE } else { T::ZERO })
            .collect())
    }

    pub fn score(&self, x: &Matrix<T>, y: &[T]) -> LinearResult<f64> {
        let predictions = self.predict(x)?;
        check_score_target(&predictions, y)?;
        Ok(accuracy(y, &predictions))
    }
}

/// Map {0, 1} targets onto the signed labels the margin rules expect.
fn to_signed_labels<T: Float>(y: &[T]) -> Vec<T> {
    y.iter()
        .map(|&v| if v > T::HALF { T::ONE } else { T::NEG_ONE })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::regression::LinearRegression;

    fn line() -> (Matrix<f64>, Vec<f64>) {
        let x = Matrix::from_rows(&[vec![1.0], vec![2.0], vec![3.0], vec![4.0]]).unwrap();
        (x, vec![2.0, 4.0, 6.0, 8.0])
    }

    fn classes() -> (Matrix<f64>, Vec<f64>) {
        let x = Matrix::from_rows(&[
            vec![0.0, 0.1],
            vec![0.3, 0.2],
            vec![1.0, 0.8],
            vec![5.0, 5.1],
            vec![5.4, 5.6],
            vec![6.0, 6.2],
        ])
        .unwrap();
        let y = vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        (x, y)
    }

    #[test]
    fn sgd_approaches_the_closed_form_solution() {
        let (x, y) = line();
        let mut ols = LinearRegression::new(true);
        let exact = ols.fit(&x, &y).unwrap();

        let mut sgd = SgdRegressor::new(0.05)
            .unwrap()
            .with_decay(0.001)
            .unwrap()
            .with_max_iterations(5000)
            .unwrap()
            .with_seed(3);
        let approx_out = sgd.fit(&x, &y).unwrap();
        assert_relative_eq!(approx_out.weights[0], exact.weights[0], max_relative = 0.05);
        assert!(sgd.score(&x, &y).unwrap() > 0.99);
    }

    #[test]
    fn sgd_same_seed_same_fit() {
        let (x, y) = line();
        let mut a = SgdRegressor::new(0.05).unwrap().with_seed(9);
        let mut b = SgdRegressor::new(0.05).unwrap().with_seed(9);
        assert_eq!(a.fit(&x, &y).unwrap(), b.fit(&x, &y).unwrap());
    }

    #[test]
    fn perceptron_learns_separable_classes() {
        let (x, y) = classes();
        let mut model = Perceptron::new(0.1).unwrap();
        let outcome = model.fit(&x, &y).unwrap();
        assert!(outcome.converged());
        assert_relative_eq!(model.score(&x, &y).unwrap(), 1.0);
    }

    #[test]
    fn passive_aggressive_learns_separable_classes() {
        let (x, y) = classes();
        let mut model = PassiveAggressive::new(1.0).unwrap();
        model.fit(&x, &y).unwrap();
        assert_relative_eq!(model.score(&x, &y).unwrap(), 1.0);
    }

    #[test]
    fn invalid_hyperparameters_fail_before_fit() {
        assert!(matches!(
            SgdRegressor::<f64>::new(-0.1),
            Err(LinearError::InvalidHyperparameter { .. })
        ));
        assert!(matches!(
            Perceptron::<f64>::new(0.0),
            Err(LinearError::InvalidHyperparameter { .. })
        ));
        assert!(matches!(
            PassiveAggressive::<f64>::new(-1.0),
            Err(LinearError::InvalidHyperparameter { .. })
        ));
    }

    #[test]
    fn decision_function_requires_fit() {
        let model = Perceptron::<f64>::new(0.1).unwrap();
        assert_eq!(
            model.decision_function(&Matrix::zeros(1, 1)),
            Err(LinearError::NotFitted)
        );
    }
}
