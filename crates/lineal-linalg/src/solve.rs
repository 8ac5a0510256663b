use lineal_core::{Float, LinearError, LinearResult, Matrix};

/// Pivot threshold, relative to the largest absolute entry of the matrix.
pub const DEFAULT_PIVOT_TOLERANCE: f64 = 1e-12;

/// Solve the square system Ax = b with the default pivot tolerance.
pub fn solve<T: Float>(a: &Matrix<T>, b: &[T]) -> LinearResult<Vec<T>> {
    solve_with_tolerance(a, b, T::from_f64(DEFAULT_PIVOT_TOLERANCE))
}

/// Solve Ax = b by Gaussian elimination with partial pivoting.
///
/// A pivot is accepted only when its magnitude exceeds
/// `pivot_tolerance * max|A|`; otherwise the column is reported as
/// singular so the caller can fall back to a regularized path.
pub fn solve_with_tolerance<T: Float>(
    a: &Matrix<T>,
    b: &[T],
    pivot_tolerance: T,
) -> LinearResult<Vec<T>> {
    let n = a.rows();
    if a.cols() != n {
        return Err(LinearError::DimensionMismatch {
            context: "solve: square matrix",
            expected: n,
            got: a.cols(),
        });
    }
    if b.len() != n {
        return Err(LinearError::DimensionMismatch {
            context: "solve: right-hand side length",
            expected: n,
            got: b.len(),
        });
    }
    a.ensure_finite()?;

    // Augmented working copy [A | b].
    let mut aug = vec![T::ZERO; n * (n + 1)];
    for i in 0..n {
        aug[i * (n + 1)..i * (n + 1) + n].copy_from_slice(a.row(i));
        aug[i * (n + 1) + n] = b[i];
    }

    let scale = a.max_abs();
    let threshold = if scale > T::ZERO {
        pivot_tolerance * scale
    } else {
        pivot_tolerance
    };
    let w = n + 1;

    for k in 0..n {
        // Partial pivoting: largest magnitude in column k at or below row k.
        let mut max_val = aug[k * w + k].abs();
        let mut max_row = k;
        for i in (k + 1)..n {
            let v = aug[i * w + k].abs();
            if v > max_val {
                max_val = v;
                max_row = i;
            }
        }
        if max_val <= threshold {
            return Err(LinearError::SingularMatrix { column: k });
        }
        if max_row != k {
            for j in k..w {
                aug.swap(k * w + j, max_row * w + j);
            }
        }

        let pivot = aug[k * w + k];
        for i in (k + 1)..n {
            let factor = aug[i * w + k] / pivot;
            if factor == T::ZERO {
                continue;
            }
            for j in k..w {
                let above = aug[k * w + j];
                aug[i * w + j] -= factor * above;
            }
        }
    }

    // Back substitution.
    let mut x = vec![T::ZERO; n];
    for i in (0..n).rev() {
        let mut sum = aug[i * w + n];
        for j in (i + 1)..n {
            sum -= aug[i * w + j] * x[j];
        }
        x[i] = sum / aug[i * w + i];
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn solves_known_system() {
        // 2x + y = 5, x + 3y = 7 -> x = 1.6, y = 1.8
        let a = Matrix::from_rows(&[vec![2.0, 1.0], vec![1.0, 3.0]]).unwrap();
        let x = solve(&a, &[5.0, 7.0]).unwrap();
        assert_relative_eq!(x[0], 1.6, max_relative = 1e-12);
        assert_relative_eq!(x[1], 1.8, max_relative = 1e-12);
    }

    #[test]
    fn pivoting_handles_zero_leading_entry() {
        let a = Matrix::from_rows(&[vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();
        let x = solve(&a, &[2.0, 3.0]).unwrap();
        assert_relative_eq!(x[0], 3.0);
        assert_relative_eq!(x[1], 2.0);
    }

    #[test]
    fn detects_singular_matrix() {
        let a = Matrix::from_rows(&[vec![1.0, 2.0], vec![2.0, 4.0]]).unwrap();
        let err = solve(&a, &[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, LinearError::SingularMatrix { column: 1 }));
    }

    #[test]
    fn rejects_non_square_matrix() {
        let a = Matrix::<f64>::zeros(2, 3);
        assert!(matches!(
            solve(&a, &[0.0, 0.0]),
            Err(LinearError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn rejects_non_finite_input() {
        let a = Matrix::from_rows(&[vec![1.0, f64::INFINITY], vec![0.0, 1.0]]).unwrap();
        assert!(matches!(
            solve(&a, &[1.0, 1.0]),
            Err(LinearError::NonNumericInput { .. })
        ));
    }

    #[test]
    fn tolerance_is_relative_to_matrix_scale() {
        // Well-conditioned but tiny entries must still solve.
        let a = Matrix::from_rows(&[vec![1e-20, 0.0], vec![0.0, 1e-20]]).unwrap();
        let x = solve(&a, &[1e-20, 2e-20]).unwrap();
        assert_relative_eq!(x[0], 1.0, max_relative = 1e-9);
        assert_relative_eq!(x[1], 2.0, max_relative = 1e-9);
    }
}
