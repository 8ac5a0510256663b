use lineal_core::Float;

/// Dot product of two equally long slices.
///
/// Length agreement is the caller's responsibility; every call site in
/// this workspace passes slices cut from the same shape-checked matrix.
#[inline]
pub fn dot<T: Float>(a: &[T], b: &[T]) -> T {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b.iter()).map(|(&x, &y)| x * y).sum()
}

/// Sum of absolute values.
#[inline]
pub fn l1_norm<T: Float>(v: &[T]) -> T {
    v.iter().map(|&x| x.abs()).sum()
}

/// Euclidean norm.
#[inline]
pub fn l2_norm<T: Float>(v: &[T]) -> T {
    dot(v, v).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn dot_product() {
        assert_eq!(dot(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]), 32.0);
    }

    #[test]
    fn norms() {
        assert_eq!(l1_norm(&[1.0, -2.0, 3.0]), 6.0);
        assert_relative_eq!(l2_norm(&[3.0, 4.0]), 5.0);
    }
}
