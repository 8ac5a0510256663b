use lineal_core::Float;
use serde::{Deserialize, Serialize};

/// Learning-rate schedule for the gradient-descent solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(bound = "T: Float")]
pub enum LearningRate<T: Float> {
    /// Fixed rate η₀ for every step.
    Constant(T),
    /// η₀ / (1 + decay·t), where t counts update steps from zero.
    Decaying { initial: T, decay: T },
}

impl<T: Float> LearningRate<T> {
    /// Rate for update step `t`.
    pub fn at(&self, t: usize) -> T {
        match *self {
            LearningRate::Constant(eta) => eta,
            LearningRate::Decaying { initial, decay } => {
                initial / (T::ONE + decay * T::from_usize(t))
            }
        }
    }

    pub fn initial(&self) -> T {
        match *self {
            LearningRate::Constant(eta) => eta,
            LearningRate::Decaying { initial, .. } => initial,
        }
    }
}
