use lineal_core::{Float, LinearResult, Matrix};
use lineal_linalg::dot;
use lineal_objective::Objective;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::outcome::{ConvergenceStatus, FitOutcome};
use crate::schedule::LearningRate;

/// How the gradient solver walks the training table each pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    /// Gradient over the full table per step.
    Batch,
    /// One shuffled example per step; the order is re-randomized every
    /// pass from a deterministic stream seeded by the caller.
    Stochastic { seed: u64 },
}

/// Iterative gradient descent over a differentiable objective.
///
/// The L1 term of a penalty is invisible here on purpose: plain gradient
/// steps cannot handle the non-smooth part, so only the smooth penalty
/// gradient is applied. Solvers that need L1 use coordinate descent.
#[derive(Debug, Clone, Copy)]
pub struct GradientDescent<T: Float> {
    pub objective: Objective<T>,
    pub learning_rate: LearningRate<T>,
    pub traversal: Traversal,
    pub fit_intercept: bool,
    pub max_iterations: usize,
    pub tolerance: T,
}

impl<T: Float> GradientDescent<T> {
    pub fn new(objective: Objective<T>, learning_rate: LearningRate<T>) -> Self {
        GradientDescent {
            objective,
            learning_rate,
            traversal: Traversal::Batch,
            fit_intercept: true,
            max_iterations: 1000,
            tolerance: T::from_f64(1e-4),
        }
    }

    pub fn run(&self, x: &Matrix<T>, y: &[T]) -> LinearResult<FitOutcome<T>> {
        let n = x.rows();
        let p = x.cols();

        let mut w = vec![T::ZERO; p];
        let mut b = T::ZERO;
        let mut step = 0usize;
        let mut prev_objective = T::INFINITY;

        // Deterministic shuffle stream; untouched by the batch traversal.
        let mut rng = match self.traversal {
            Traversal::Stochastic { seed } => StdRng::seed_from_u64(seed),
            Traversal::Batch => StdRng::seed_from_u64(0),
        };
        let mut order: Vec<usize> = (0..n).collect();

        let mut status = ConvergenceStatus::MaxIterationsReached;
        let mut iterations = self.max_iterations;

        for pass in 0..self.max_iterations {
            match self.traversal {
                Traversal::Batch => {
                    let predictions = self.decision(x, &w, b);
                    let g_pred = self.objective.loss.prediction_gradient(y, &predictions);
                    let g_pen = self.objective.penalty.gradient(&w);

                    let eta = self.learning_rate.at(step);
                    step += 1;

                    let mut grad_b = T::ZERO;
                    for j in 0..p {
                        let mut grad = g_pen[j];
                        for i in 0..n {
                            grad += g_pred[i] * x.get(i, j);
                        }
                        w[j] -= eta * grad;
                    }
                    for &g in &g_pred {
                        grad_b += g;
                    }
                    if self.fit_intercept {
                        b -= eta * grad_b;
                    }
                }
                Traversal::Stochastic { .. } => {
                    order.shuffle(&mut rng);
                    for &i in &order {
                        let row = x.row(i);
                        let z = dot(row, &w) + b;
                        let g = self.objective.loss.sample_gradient(y[i], z);
                        let g_pen = self.objective.penalty.gradient(&w);

                        let eta = self.learning_rate.at(step);
                        step += 1;

                        for j in 0..p {
                            w[j] -= eta * (g * row[j] + g_pen[j]);
                        }
                        if self.fit_intercept {
                            b -= eta * g;
                        }
                    }
                }
            }

            let predictions = self.decision(x, &w, b);
            let objective = self.objective.value(y, &predictions, &w);
            if (prev_objective - objective).abs() < self.tolerance {
                status = ConvergenceStatus::Converged;
                iterations = pass + 1;
                break;
            }
            prev_objective = objective;
        }

        let predictions = self.decision(x, &w, b);
        let final_objective = self.objective.value(y, &predictions, &w);

        Ok(FitOutcome {
            weights: w,
            intercept: b,
            status,
            iterations,
            final_objective,
        })
    }

    fn decision(&self, x: &Matrix<T>, w: &[T], b: T) -> Vec<T> {
        (0..x.rows()).map(|i| dot(x.row(i), w) + b).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use lineal_objective::{Loss, Penalty};

    fn line_data() -> (Matrix<f64>, Vec<f64>) {
        let x = Matrix::from_rows(&[vec![1.0], vec![2.0], vec![3.0], vec![4.0]]).unwrap();
        (x, vec![2.0, 4.0, 6.0, 8.0])
    }

    fn squared(penalty: Penalty<f64>) -> Objective<f64> {
        Objective::new(Loss::Squared, penalty)
    }

    #[test]
    fn batch_descent_fits_a_line() {
        let (x, y) = line_data();
        let mut solver =
            GradientDescent::new(squared(Penalty::None), LearningRate::Constant(0.05));
        solver.max_iterations = 20_000;
        solver.tolerance = 1e-12;
        let outcome = solver.run(&x, &y).unwrap();
        assert_relative_eq!(outcome.weights[0], 2.0, max_relative = 1e-3);
        assert_abs_diff_eq!(outcome.intercept, 0.0, epsilon = 1e-2);
        assert!(outcome.converged());
    }

    #[test]
    fn stochastic_descent_is_reproducible_for_a_seed() {
        let (x, y) = line_data();
        let mut solver = GradientDescent::new(
            squared(Penalty::None),
            LearningRate::Decaying { initial: 0.05, decay: 0.01 },
        );
        solver.traversal = Traversal::Stochastic { seed: 42 };
        solver.max_iterations = 200;
        let a = solver.run(&x, &y).unwrap();
        let b = solver.run(&x, &y).unwrap();
        assert_eq!(a.weights, b.weights);
        assert_eq!(a.intercept, b.intercept);
    }

    #[test]
    fn stochastic_descent_approaches_the_solution() {
        let (x, y) = line_data();
        let mut solver = GradientDescent::new(
            squared(Penalty::None),
            LearningRate::Decaying { initial: 0.05, decay: 0.001 },
        );
        solver.traversal = Traversal::Stochastic { seed: 7 };
        solver.max_iterations = 2000;
        solver.tolerance = 1e-10;
        let outcome = solver.run(&x, &y).unwrap();
        assert_relative_eq!(outcome.weights[0], 2.0, max_relative = 0.05);
    }

    #[test]
    fn iteration_cap_is_flagged() {
        let (x, y) = line_data();
        let mut solver =
            GradientDescent::new(squared(Penalty::None), LearningRate::Constant(1e-6));
        solver.max_iterations = 3;
        solver.tolerance = 1e-15;
        let outcome = solver.run(&x, &y).unwrap();
        assert_eq!(outcome.status, ConvergenceStatus::MaxIterationsReached);
        assert_eq!(outcome.iterations, 3);
    }

    #[test]
    fn all_unpenalized_strategies_agree_on_full_rank_data() {
        let x = Matrix::from_rows(&[
            vec![1.0, 0.3],
            vec![2.0, -0.5],
            vec![3.0, 0.9],
            vec![4.0, -0.2],
            vec![5.0, 0.6],
        ])
        .unwrap();
        let y = vec![2.3, 3.5, 6.9, 7.8, 10.6];

        let exact = crate::ClosedForm::new(0.0, true).run(&x, &y).unwrap();

        let mut cd = crate::CoordinateDescent::new(Penalty::<f64>::None, true);
        cd.tolerance = 1e-10;
        cd.max_iterations = 100_000;
        let cd_out = cd.run(&x, &y, None).unwrap();

        let mut gd =
            GradientDescent::new(squared(Penalty::None), LearningRate::Constant(0.05));
        gd.tolerance = 1e-16;
        gd.max_iterations = 200_000;
        let gd_out = gd.run(&x, &y).unwrap();

        for j in 0..2 {
            assert_relative_eq!(cd_out.weights[j], exact.weights[j], epsilon = 1e-6);
            assert_relative_eq!(gd_out.weights[j], exact.weights[j], epsilon = 1e-4);
        }
        assert_abs_diff_eq!(cd_out.intercept, exact.intercept, epsilon = 1e-6);
        assert_abs_diff_eq!(gd_out.intercept, exact.intercept, epsilon = 1e-4);
    }

    #[test]
    fn l2_penalty_shrinks_relative_to_unpenalized() {
        let (x, y) = line_data();
        let mut plain =
            GradientDescent::new(squared(Penalty::None), LearningRate::Constant(0.05));
        plain.max_iterations = 10_000;
        let mut ridge = GradientDescent::new(
            squared(Penalty::L2 { alpha: 1.0 }),
            LearningRate::Constant(0.05),
        );
        ridge.max_iterations = 10_000;
        let a = plain.run(&x, &y).unwrap();
        let b = ridge.run(&x, &y).unwrap();
        assert!(b.weights[0] < a.weights[0]);
    }
}
