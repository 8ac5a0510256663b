use lineal_core::Float;
use serde::{Deserialize, Serialize};

/// Logits are clamped to this magnitude before exponentiation; e^20 is
/// already far past where the sigmoid saturates in double precision.
const LOGIT_CLAMP: f64 = 20.0;

/// Numerically stable sigmoid on a clamped logit.
#[inline]
pub fn sigmoid<T: Float>(z: T) -> T {
    let c = T::from_f64(LOGIT_CLAMP);
    let z = z.max(-c).min(c);
    T::ONE / (T::ONE + (-z).exp())
}

/// Loss kind of an objective. Both variants are evaluated on raw linear
/// predictions (logits, for the logistic case).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Loss {
    /// (1/2n)·Σ(y − ŷ)²
    Squared,
    /// Mean log-loss on sigmoid-transformed logits.
    Logistic,
}

impl Loss {
    /// Loss value over all samples.
    pub fn value<T: Float>(&self, y_true: &[T], predictions: &[T]) -> T {
        debug_assert_eq!(y_true.len(), predictions.len());
        let n = T::from_usize(y_true.len().max(1));
        match self {
            Loss::Squared => {
                let sum: T = y_true
                    .iter()
                    .zip(predictions.iter())
                    .map(|(&y, &p)| {
                        let d = y - p;
                        d * d
                    })
                    .sum();
                sum / (T::TWO * n)
            }
            Loss::Logistic => {
                // log(1 + e^z) - y·z, with the logit clamped first.
                let c = T::from_f64(LOGIT_CLAMP);
                let sum: T = y_true
                    .iter()
                    .zip(predictions.iter())
                    .map(|(&y, &z)| {
                        let z = z.max(-c).min(c);
                        (T::ONE + z.exp()).ln() - y * z
                    })
                    .sum();
                sum / n
            }
        }
    }

    /// Gradient of the mean loss with respect to each prediction.
    pub fn prediction_gradient<T: Float>(&self, y_true: &[T], predictions: &[T]) -> Vec<T> {
        debug_assert_eq!(y_true.len(), predictions.len());
        let n = T::from_usize(y_true.len().max(1));
        match self {
            Loss::Squared => y_true
                .iter()
                .zip(predictions.iter())
                .map(|(&y, &p)| (p - y) / n)
                .collect(),
            Loss::Logistic => y_true
                .iter()
                .zip(predictions.iter())
                .map(|(&y, &z)| (sigmoid(z) - y) / n)
                .collect(),
        }
    }

    /// Per-sample gradient with respect to a single prediction, without
    /// the 1/n factor; used by the stochastic traversal.
    #[inline]
    pub fn sample_gradient<T: Float>(&self, y: T, prediction: T) -> T {
        match self {
            Loss::Squared => prediction - y,
            Loss::Logistic => sigmoid(prediction) - y,
        }
    }
}
