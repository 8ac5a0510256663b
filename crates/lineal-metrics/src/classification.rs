use lineal_core::Float;

/// Fraction of predictions matching the true label.
pub fn accuracy<T: Float>(y_true: &[T], y_pred: &[T]) -> f64 {
    assert_eq!(y_true.len(), y_pred.len());
    let n = y_true.len().max(1);
    let correct = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(&t, &p)| (t - p).abs() < T::HALF)
        .count();
    correct as f64 / n as f64
}
