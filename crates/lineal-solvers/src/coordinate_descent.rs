use lineal_core::{Float, LinearError, LinearResult, Matrix};
use lineal_objective::{soft_threshold, Loss, Penalty};

use crate::outcome::{ConvergenceStatus, FitOutcome};

/// Cyclic coordinate descent for L1-bearing penalties (lasso, elastic net).
///
/// One iteration is one full pass over all coordinates. Each coordinate is
/// set to the exact minimizer of its one-dimensional subproblem: the
/// soft-thresholded partial correlation, scaled by the feature's squared
/// norm plus the quadratic penalty share.
#[derive(Debug, Clone, Copy)]
pub struct CoordinateDescent<T: Float> {
    pub penalty: Penalty<T>,
    pub fit_intercept: bool,
    pub max_iterations: usize,
    pub tolerance: T,
}

impl<T: Float> CoordinateDescent<T> {
    pub fn new(penalty: Penalty<T>, fit_intercept: bool) -> Self {
        CoordinateDescent {
            penalty,
            fit_intercept,
            max_iterations: 1000,
            tolerance: T::from_f64(1e-4),
        }
    }

    pub fn run(
        &self,
        x: &Matrix<T>,
        y: &[T],
        warm_start: Option<&[T]>,
    ) -> LinearResult<FitOutcome<T>> {
        let n = x.rows();
        let p = x.cols();
        if let Some(start) = warm_start {
            if start.len() != p {
                return Err(LinearError::DimensionMismatch {
                    context: "warm start length vs feature count",
                    expected: p,
                    got: start.len(),
                });
            }
        }
        let n_t = T::from_usize(n.max(1));
        let l1 = self.penalty.l1_strength();
        let l2 = self.penalty.l2_strength();

        let columns: Vec<Vec<T>> = (0..p).map(|j| x.column(j)).collect();
        // Precomputed ‖x_j‖²/n, the curvature of each subproblem.
        let col_sq: Vec<T> = columns
            .iter()
            .map(|c| c.iter().map(|&v| v * v).sum::<T>() / n_t)
            .collect();

        let mut w: Vec<T> = match warm_start {
            Some(start) => start.to_vec(),
            None => vec![T::ZERO; p],
        };
        let mut b = T::ZERO;

        // Residuals r_i = y_i - b - Σ_j w_j x_ij, maintained incrementally.
        let mut residual: Vec<T> = (0..n)
            .map(|i| {
                let mut r = y[i] - b;
                for j in 0..p {
                    r -= w[j] * x.get(i, j);
                }
                r
            })
            .collect();

        let mut status = ConvergenceStatus::MaxIterationsReached;
        let mut iterations = self.max_iterations;

        for pass in 0..self.max_iterations {
            let mut max_change = T::ZERO;

            if self.fit_intercept {
                let shift: T = residual.iter().copied().sum::<T>() / n_t;
                b += shift;
                for r in residual.iter_mut() {
                    *r -= shift;
                }
                max_change = max_change.max(shift.abs());
            }

            for j in 0..p {
                if col_sq[j] == T::ZERO {
                    continue; // constant-zero feature, nothing to estimate
                }
                // Partial correlation with this coordinate's own
                // contribution added back into the residual.
                let mut rho = T::ZERO;
                for i in 0..n {
                    rho += columns[j][i] * (residual[i] + w[j] * columns[j][i]);
                }
                rho /= n_t;

                let updated = soft_threshold(rho, l1) / (col_sq[j] + l2);
                let delta = updated - w[j];
                if delta != T::ZERO {
                    for i in 0..n {
                        residual[i] -= delta * columns[j][i];
                    }
                    w[j] = updated;
                }
                max_change = max_change.max(delta.abs());
            }

            if max_change < self.tolerance {
                status = ConvergenceStatus::Converged;
                iterations = pass + 1;
                break;
            }
        }

        let predictions: Vec<T> = (0..n).map(|i| y[i] - residual[i]).collect();
        let final_objective =
            Loss::Squared.value(y, &predictions) + self.penalty.value(&w);

        Ok(FitOutcome {
            weights: w,
            intercept: b,
            status,
            iterations,
            final_objective,
        })
    }
}
