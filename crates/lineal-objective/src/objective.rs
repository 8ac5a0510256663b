use lineal_core::Float;
use serde::{Deserialize, Serialize};

use crate::loss::Loss;
use crate::penalty::Penalty;

/// A pure fitting objective: loss kind plus regularization. Built fresh
/// from estimator configuration on every fit call; carries no state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(bound = "T: Float")]
pub struct Objective<T: Float> {
    pub loss: Loss,
    pub penalty: Penalty<T>,
}

impl<T: Float> Objective<T> {
    pub fn new(loss: Loss, penalty: Penalty<T>) -> Self {
        Objective { loss, penalty }
    }

    /// Full objective value: mean loss plus penalty on the coefficients.
    /// The intercept contributes to the predictions, never to the penalty.
    pub fn value(&self, y_true: &[T], predictions: &[T], weights: &[T]) -> T {
        self.loss.value(y_true, predictions) + self.penalty.value(weights)
    }
}
