use lineal_core::{Float, LinearResult, Matrix};
use lineal_linalg::dot;

use crate::outcome::{ConvergenceStatus, FitOutcome};

/// Per-mistake update rule shared by the margin-based online estimators.
/// Targets are signed labels in {-1, +1}.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarginRule<T: Float> {
    /// Rosenblatt update: on a sign mistake, w += η·y·x.
    Perceptron { learning_rate: T },
    /// PA-I: step size τ = min(C, hinge/‖x‖²) bounds the loss while
    /// keeping the coefficient change minimal.
    PassiveAggressive { aggressiveness: T },
}

/// Pass-based driver for mistake-driven rules. Samples are visited in
/// order; all randomness-free, so refitting is deterministic.
#[derive(Debug, Clone, Copy)]
pub struct MistakeDriven<T: Float> {
    pub rule: MarginRule<T>,
    pub fit_intercept: bool,
    pub max_iterations: usize,
    /// Convergence threshold on the cumulative mean hinge loss of a pass
    /// (the perceptron rule converges on a mistake-free pass instead).
    pub tolerance: T,
}

impl<T: Float> MistakeDriven<T> {
    pub fn new(rule: MarginRule<T>) -> Self {
        MistakeDriven {
            rule,
            fit_intercept: true,
            max_iterations: 1000,
            tolerance: T::from_f64(1e-4),
        }
    }

    /// Fit on signed labels y ∈ {-1, +1}.
    pub fn run(&self, x: &Matrix<T>, y: &[T]) -> LinearResult<FitOutcome<T>> {
        let n = x.rows();
        let p = x.cols();
        let n_t = T::from_usize(n.max(1));

        let mut w = vec![T::ZERO; p];
        let mut b = T::ZERO;

        let mut status = ConvergenceStatus::MaxIterationsReached;
        let mut iterations = self.max_iterations;
        let mut pass_loss = T::ZERO;

        for pass in 0..self.max_iterations {
            let mut mistakes = 0usize;
            pass_loss = T::ZERO;

            for i in 0..n {
                let row = x.row(i);
                let score = dot(row, &w) + b;
                let yi = y[i];

                match self.rule {
                    MarginRule::Perceptron { learning_rate } => {
                        if yi * score <= T::ZERO {
                            for j in 0..p {
                                w[j] += learning_rate * yi * row[j];
                            }
                            if self.fit_intercept {
                                b += learning_rate * yi;
                            }
                            mistakes += 1;
                            pass_loss += T::ONE;
                        }
                    }
                    MarginRule::PassiveAggressive { aggressiveness } => {
                        let hinge = (T::ONE - yi * score).max(T::ZERO);
                        if hinge > T::ZERO {
                            let sq_norm = dot(row, row)
                                + if self.fit_intercept { T::ONE } else { T::ZERO };
                            let tau = if sq_norm > T::ZERO {
                                aggressiveness.min(hinge / sq_norm)
                            } else {
                                T::ZERO
                            };
                            for j in 0..p {
                                w[j] += tau * yi * row[j];
                            }
                            if self.fit_intercept {
                                b += tau * yi;
                            }
                            mistakes += 1;
                            pass_loss += hinge;
                        }
                    }
                }
            }
            pass_loss /= n_t;

            let done = match self.rule {
                MarginRule::Perceptron { .. } => mistakes == 0,
                MarginRule::PassiveAggressive { .. } => pass_loss < self.tolerance,
            };
            if done {
                status = ConvergenceStatus::Converged;
                iterations = pass + 1;
                break;
            }
        }

        Ok(FitOutcome {
            weights: w,
            intercept: b,
            status,
            iterations,
            final_objective: pass_loss,
        })
    }
}
