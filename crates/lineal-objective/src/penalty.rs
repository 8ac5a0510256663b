use lineal_core::Float;
use serde::{Deserialize, Serialize};

/// Soft-threshold operator S(z, t) = sign(z)·max(|z| − t, 0), the proximal
/// step for the L1 penalty.
#[inline]
pub fn soft_threshold<T: Float>(z: T, threshold: T) -> T {
    if z > threshold {
        z - threshold
    } else if z < -threshold {
        z + threshold
    } else {
        T::ZERO
    }
}

/// Regularization term of an objective. The intercept is never penalized;
/// every solver applies a penalty to the coefficient vector only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(bound = "T: Float")]
pub enum Penalty<T: Float> {
    None,
    /// alpha·‖w‖₁
    L1 { alpha: T },
    /// alpha·‖w‖²
    L2 { alpha: T },
    /// alpha·(ratio·‖w‖₁ + (1 − ratio)/2·‖w‖²), ratio in [0, 1]
    ElasticNet { alpha: T, l1_ratio: T },
}

impl<T: Float> Penalty<T> {
    /// Penalty value for a coefficient vector.
    pub fn value(&self, weights: &[T]) -> T {
        let l1: T = weights.iter().map(|&w| w.abs()).sum();
        let l2: T = weights.iter().map(|&w| w * w).sum();
        match *self {
            Penalty::None => T::ZERO,
            Penalty::L1 { alpha } => alpha * l1,
            Penalty::L2 { alpha } => alpha * l2,
            Penalty::ElasticNet { alpha, l1_ratio } => {
                alpha * (l1_ratio * l1 + (T::ONE - l1_ratio) * T::HALF * l2)
            }
        }
    }

    /// Gradient of the smooth part of the penalty. The L1 term contributes
    /// nothing here; plain gradient descent must not see a subgradient.
    pub fn gradient(&self, weights: &[T]) -> Vec<T> {
        match *self {
            Penalty::None | Penalty::L1 { .. } => vec![T::ZERO; weights.len()],
            Penalty::L2 { alpha } => weights.iter().map(|&w| T::TWO * alpha * w).collect(),
            Penalty::ElasticNet { alpha, l1_ratio } => weights
                .iter()
                .map(|&w| alpha * (T::ONE - l1_ratio) * w)
                .collect(),
        }
    }

    /// Subgradient of the full penalty, for solvers that handle the
    /// non-smooth L1 term explicitly.
    pub fn subgradient(&self, weights: &[T]) -> Vec<T> {
        let mut grad = self.gradient(weights);
        let l1 = self.l1_strength();
        if l1 > T::ZERO {
            for (g, &w) in grad.iter_mut().zip(weights.iter()) {
                *g += l1 * w.signum();
            }
        }
        grad
    }

    /// Coefficient of the ‖w‖₁ term.
    pub fn l1_strength(&self) -> T {
        match *self {
            Penalty::None | Penalty::L2 { .. } => T::ZERO,
            Penalty::L1 { alpha } => alpha,
            Penalty::ElasticNet { alpha, l1_ratio } => alpha * l1_ratio,
        }
    }

    /// Coefficient of the quadratic term as coordinate descent sees it
    /// (the (1 − ratio) share of an elastic net).
    pub fn l2_strength(&self) -> T {
        match *self {
            Penalty::None | Penalty::L1 { .. } => T::ZERO,
            Penalty::L2 { alpha } => alpha,
            Penalty::ElasticNet { alpha, l1_ratio } => alpha * (T::ONE - l1_ratio),
        }
    }
}
