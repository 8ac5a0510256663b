use lineal_core::Float;

/// Mean squared error.
pub fn mse<T: Float>(y_true: &[T], y_pred: &[T]) -> f64 {
    assert_eq!(y_true.len(), y_pred.len());
    let n = y_true.len().max(1);
    let sum: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(&t, &p)| {
            let d = (t - p).to_f64();
            d * d
        })
        .sum();
    sum / n as f64
}

/// R² (coefficient of determination). Returns 0.0 for a constant target,
/// where the ratio is undefined.
pub fn r2_score<T: Float>(y_true: &[T], y_pred: &[T]) -> f64 {
    assert_eq!(y_true.len(), y_pred.len());
    let n = y_true.len() as f64;
    let mean_true: f64 = y_true.iter().map(|v| v.to_f64()).sum::<f64>() / n;

    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(&t, &p)| {
            let d = t.to_f64() - p.to_f64();
            d * d
        })
        .sum();
    let ss_tot: f64 = y_true
        .iter()
        .map(|&t| {
            let d = t.to_f64() - mean_true;
            d * d
        })
        .sum();

    if ss_tot < 1e-15 {
        return 0.0;
    }
    1.0 - ss_res / ss_tot
}
