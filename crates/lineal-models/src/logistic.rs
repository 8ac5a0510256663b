use lineal_core::{Float, LinearError, LinearResult, Matrix};
use lineal_metrics::accuracy;
use lineal_objective::{sigmoid, Loss, Objective, Penalty};
use lineal_solvers::{FitOutcome, GradientDescent, LearningRate};
use serde::{Deserialize, Serialize};

use crate::validate::{
    check_fit_inputs, check_score_target, decision_values, require_non_negative,
    require_positive, require_positive_count,
};

/// Binary logistic regression trained by batch gradient descent, with an
/// optional L2 penalty. Targets are {0, 1}.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "T: Float")]
pub struct LogisticRegression<T: Float> {
    pub learning_rate: LearningRate<T>,
    pub l2: T,
    pub fit_intercept: bool,
    pub max_iterations: usize,
    pub tolerance: T,
    fitted: Option<FitOutcome<T>>,
}

impl<T: Float> LogisticRegression<T> {
    pub fn new(learning_rate: T) -> LinearResult<Self> {
        Ok(LogisticRegression {
            learning_rate: LearningRate::Constant(require_positive(
                "learning_rate",
                learning_rate,
            )?),
            l2: T::ZERO,
            fit_intercept: true,
            max_iterations: 1000,
            tolerance: T::from_f64(1e-6),
            fitted: None,
        })
    }

    /// Switch to the decaying schedule η₀/(1 + decay·t).
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

    pub fn with_tolerance(mut self, tolerance: T) -> LinearResult<Self> {
        self.tolerance = require_positive("tolerance", tolerance)?;
        Ok(self)
    }

    pub fn fit(&mut self, x: &Matrix<T>, y: &[T]) -> LinearResult<FitOutcome<T>> {
        check_fit_inputs(x, y)?;
        let penalty = if self.l2 > T::ZERO {
            Penalty::L2 { alpha: self.l2 }
        } else {
            Penalty::None
        };
        let mut solver =
            GradientDescent::new(Objective::new(Loss::Logistic, penalty), self.learning_rate);
        solver.fit_intercept = self.fit_intercept;
        solver.max_iterations = self.max_iterations;
        solver.tolerance = self.tolerance;
        let outcome = solver.run(x, y)?;
        self.fitted = Some(outcome.clone());
        Ok(outcome)
    }

    /// Probability of the positive class for each row.
    pub fn predict_proba(&self, x: &Matrix<T>) -> LinearResult<Vec<T>> {
        let fitted = self.fitted.as_ref().ok_or(LinearError::NotFitted)?;
        let logits = decision_values(x, fitted)?;
        Ok(logits.into_iter().map(sigmoid).collect())
    }

    /// Class labels at the 0.5 probability threshold.
    pub fn predict(&self, x: &Matrix<T>) -> LinearResult<Vec<T>> {
        let proba = self.predict_proba(x)?;
        Ok(proba
            .into_iter()
            .map(|p| if p >= T::HALF { T::ONE } else { T::ZERO })
            .collect())
    }

    /// Classification accuracy.
    pub fn score(&self, x: &Matrix<T>, y: &[T]) -> LinearResult<f64> {
        let predictions = self.predict(x)?;
        check_score_target(&predictions, y)?;
        Ok(accuracy(y, &predictions))
    }

    pub fn coefficients(&self) -> Option<&FitOutcome<T>> {
        self.fitted.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn separable() -> (Matrix<f64>, Vec<f64>) {
        let x = Matrix::from_rows(&[
            vec![0.0, 0.0],
            vec![0.5, 0.5],
            vec![1.0, 1.0],
            vec![5.0, 5.0],
            vec![5.5, 5.5],
            vec![6.0, 6.0],
        ])
        .unwrap();
        let y = vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        (x, y)
    }

    #[test]
    fn classifies_separable_data() {
        let (x, y) = separable();
        let mut model = LogisticRegression::new(0.1)
            .unwrap()
            .with_max_iterations(2000)
            .unwrap();
        model.fit(&x, &y).unwrap();
        assert_relative_eq!(model.score(&x, &y).unwrap(), 1.0);
    }

    #[test]
    fn probabilities_lie_in_unit_interval_and_order_with_margin() {
        let (x, y) = separable();
        let mut model = LogisticRegression::new(0.1).unwrap();
        model.fit(&x, &y).unwrap();
        let proba = model.predict_proba(&x).unwrap();
        assert!(proba.iter().all(|&p| (0.0..=1.0).contains(&p)));
        assert!(proba[0] < proba[5]);
    }

    #[test]
    fn rejects_non_positive_learning_rate() {
        assert!(matches!(
            LogisticRegression::<f64>::new(0.0),
            Err(LinearError::InvalidHyperparameter { name: "learning_rate", .. })
        ));
    }

    #[test]
    fn l2_penalty_shrinks_weights() {
        let (x, y) = separable();
        let mut plain = LogisticRegression::new(0.1)
            .unwrap()
            .with_max_iterations(500)
            .unwrap();
        let a = plain.fit(&x, &y).unwrap();
        let mut ridge = LogisticRegression::new(0.1)
            .unwrap()
            .with_l2(1.0)
            .unwrap()
            .with_max_iterations(500)
            .unwrap();
        let b = ridge.fit(&x, &y).unwrap();
        let norm = |w: &[f64]| w.iter().map(|v| v * v).sum::<f64>();
        assert!(norm(&b.weights) < norm(&a.weights));
    }

    #[test]
    fn predict_before_fit_fails() {
        let model = LogisticRegression::<f64>::new(0.1).unwrap();
        assert_eq!(
            model.predict(&Matrix::zeros(1, 2)),
            Err(LinearError::NotFitted)
        );
    }
}
