use lineal_core::{Float, LinearError, LinearResult, Matrix};
use lineal_linalg::solve_with_tolerance;
use lineal_objective::{Loss, Penalty};

use crate::outcome::{ConvergenceStatus, FitOutcome};

/// Ridge strength used for the one-shot retry when the normal equations
/// come out singular.
pub const RIDGE_FALLBACK: f64 = 1e-8;

/// Direct normal-equations solver for squared-error objectives with at
/// most an L2 penalty: (XᵀX + λI)w = Xᵀy.
///
/// Deterministic; identical input always produces identical output.
#[derive(Debug, Clone, Copy)]
pub struct ClosedForm<T: Float> {
    /// λ for the ridge term; zero for plain least squares.
    pub l2: T,
    pub fit_intercept: bool,
    pub pivot_tolerance: T,
}

impl<T: Float> ClosedForm<T> {
    pub fn new(l2: T, fit_intercept: bool) -> Self {
        ClosedForm {
            l2,
            fit_intercept,
            pivot_tolerance: T::from_f64(lineal_linalg::DEFAULT_PIVOT_TOLERANCE),
        }
    }

    pub fn run(&self, x: &Matrix<T>, y: &[T]) -> LinearResult<FitOutcome<T>> {
        let n = x.rows();
        let p = x.cols();

        // Bias column first, as in the augmented design [1 | X].
        let design = if self.fit_intercept {
            let mut rows = Vec::with_capacity(n);
            for i in 0..n {
                let mut row = Vec::with_capacity(p + 1);
                row.push(T::ONE);
                row.extend_from_slice(x.row(i));
                rows.push(row);
            }
            Matrix::from_rows(&rows)?
        } else {
            x.clone()
        };

        let xt = design.transpose();
        let gram = xt.matmul(&design)?;
        let rhs = xt.matvec(y)?;

        let (solution, status) = match self.solve_regularized(&gram, &rhs, self.l2) {
            Ok(w) => (w, ConvergenceStatus::Converged),
            Err(LinearError::SingularMatrix { .. }) => {
                // Retry exactly once with a small ridge perturbation rather
                // than surfacing a raw numeric error.
                let l2_eff = self.l2.max(T::from_f64(RIDGE_FALLBACK));
                let w = self.solve_regularized(&gram, &rhs, l2_eff)?;
                (w, ConvergenceStatus::NumericallyUnstable)
            }
            Err(e) => return Err(e),
        };

        let (intercept, weights) = if self.fit_intercept {
            (solution[0], solution[1..].to_vec())
        } else {
            (T::ZERO, solution)
        };

        let mut predictions = x.matvec(&weights)?;
        for pred in predictions.iter_mut() {
            *pred += intercept;
        }
        let penalty = Penalty::L2 { alpha: self.l2 };
        let final_objective =
            Loss::Squared.value(y, &predictions) + penalty.value(&weights);

        Ok(FitOutcome {
            weights,
            intercept,
            status,
            iterations: 1,
            final_objective,
        })
    }

    /// Solve (G + λI)w = rhs, leaving the bias row/column unpenalized.
    fn solve_regularized(&self, gram: &Matrix<T>, rhs: &[T], l2: T) -> LinearResult<Vec<T>> {
        let d = gram.rows();
        let mut system = gram.clone();
        if l2 > T::ZERO {
            let start = usize::from(self.fit_intercept);
            for i in start..d {
                system.set(i, i, system.get(i, i) + l2);
            }
        }
        solve_with_tolerance(&system, rhs, self.pivot_tolerance)
    }
}
