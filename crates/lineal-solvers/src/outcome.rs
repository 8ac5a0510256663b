use lineal_core::Float;
use serde::{Deserialize, Serialize};

/// How a fit terminated. Hitting the iteration cap is reported, never
/// raised as an error: the coefficients at the cap are still usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConvergenceStatus {
    Converged,
    MaxIterationsReached,
    /// The closed-form path hit a singular system and recovered through
    /// a one-shot ridge perturbation.
    NumericallyUnstable,
}

/// Everything a solver hands back to its estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "T: Float")]
pub struct FitOutcome<T: Float> {
    pub weights: Vec<T>,
    pub intercept: T,
    pub status: ConvergenceStatus,
    /// Number of solver passes performed (1 for a direct solve).
    pub iterations: usize,
    pub final_objective: T,
}

impl<T: Float> FitOutcome<T> {
    pub fn converged(&self) -> bool {
        self.status == ConvergenceStatus::Converged
    }

    pub fn n_features(&self) -> usize {
        self.weights.len()
    }
}
