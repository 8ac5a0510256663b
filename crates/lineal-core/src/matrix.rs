use crate::dtype::Float;
use crate::error::{LinearError, LinearResult};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dense 2-D numeric table with row-major (C-order) storage.
///
/// This is the substrate every solver operates on: the design matrix,
/// and intermediate products such as XᵀX. The engine only ever reads a
/// matrix it was handed; all construction goes through shape-checked
/// constructors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "T: Float")]
pub struct Matrix<T: Float> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T: Float> Matrix<T> {
    /// Create a matrix from a flat row-major buffer.
    pub fn new(data: Vec<T>, rows: usize, cols: usize) -> LinearResult<Self> {
        if data.len() != rows * cols {
            return Err(LinearError::DimensionMismatch {
                context: "matrix construction",
                expected: rows * cols,
                got: data.len(),
            });
        }
        Ok(Matrix { data, rows, cols })
    }

    /// Create a matrix from nested rows; every row must have the same length.
    pub fn from_rows(rows: &[Vec<T>]) -> LinearResult<Self> {
        if rows.is_empty() {
            return Ok(Matrix { data: vec![], rows: 0, cols: 0 });
        }
        let cols = rows[0].len();
        for row in rows {
            if row.len() != cols {
                return Err(LinearError::DimensionMismatch {
                    context: "matrix row length",
                    expected: cols,
                    got: row.len(),
                });
            }
        }
        let data: Vec<T> = rows.iter().flat_map(|r| r.iter().copied()).collect();
        Ok(Matrix { data, rows: rows.len(), cols })
    }

    /// Matrix filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Matrix { data: vec![T::ZERO; rows * cols], rows, cols }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> T {
        debug_assert!(i < self.rows && j < self.cols);
        self.data[i * self.cols + j]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: T) {
        debug_assert!(i < self.rows && j < self.cols);
        self.data[i * self.cols + j] = value;
    }

    /// Borrow row `i` as a contiguous slice.
    #[inline]
    pub fn row(&self, i: usize) -> &[T] {
        debug_assert!(i < self.rows);
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Copy out column `j`.
    pub fn column(&self, j: usize) -> Vec<T> {
        debug_assert!(j < self.cols);
        (0..self.rows).map(|i| self.data[i * self.cols + j]).collect()
    }

    /// Transposed copy.
    pub fn transpose(&self) -> Matrix<T> {
        let mut data = vec![T::ZERO; self.data.len()];
        for i in 0..self.rows {
            for j in 0..self.cols {
                data[j * self.rows + i] = self.data[i * self.cols + j];
            }
        }
        Matrix { data, rows: self.cols, cols: self.rows }
    }

    /// Matrix–matrix product.
    pub fn matmul(&self, other: &Matrix<T>) -> LinearResult<Matrix<T>> {
        if self.cols != other.rows {
            return Err(LinearError::DimensionMismatch {
                context: "matrix multiply inner dimension",
                expected: self.cols,
                got: other.rows,
            });
        }
        let (m, k, n) = (self.rows, self.cols, other.cols);
        let mut data = vec![T::ZERO; m * n];
        for i in 0..m {
            for p in 0..k {
                let a = self.data[i * k + p];
                for j in 0..n {
                    data[i * n + j] += a * other.data[p * n + j];
                }
            }
        }
        Ok(Matrix { data, rows: m, cols: n })
    }

    /// Matrix–vector product.
    pub fn matvec(&self, v: &[T]) -> LinearResult<Vec<T>> {
        if self.cols != v.len() {
            return Err(LinearError::DimensionMismatch {
                context: "matrix-vector multiply",
                expected: self.cols,
                got: v.len(),
            });
        }
        let mut out = Vec::with_capacity(self.rows);
        for i in 0..self.rows {
            let row = self.row(i);
            let mut sum = T::ZERO;
            for j in 0..self.cols {
                sum += row[j] * v[j];
            }
            out.push(sum);
        }
        Ok(out)
    }

    /// Largest absolute entry; zero for an empty matrix.
    pub fn max_abs(&self) -> T {
        self.data
            .iter()
            .map(|v| v.abs())
            .fold(T::ZERO, |acc, v| acc.max(v))
    }

    /// Fail with the position of the first non-finite entry, if any.
    pub fn ensure_finite(&self) -> LinearResult<()> {
        for (idx, v) in self.data.iter().enumerate() {
            if !v.is_finite() {
                return Err(LinearError::NonNumericInput {
                    row: idx / self.cols.max(1),
                    col: idx % self.cols.max(1),
                });
            }
        }
        Ok(())
    }
}

impl<T: Float> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "matrix({}x{}) [", self.rows, self.cols)?;
        for i in 0..self.rows.min(8) {
            write!(f, "  [")?;
            for j in 0..self.cols.min(8) {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{:.4}", self.data[i * self.cols + j])?;
            }
            if self.cols > 8 {
                write!(f, ", ...")?;
            }
            writeln!(f, "],")?;
        }
        if self.rows > 8 {
            writeln!(f, "  ...")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_checks_length() {
        let ok = Matrix::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
        assert!(ok.is_ok());
        let err = Matrix::<f64>::new(vec![1.0, 2.0, 3.0], 2, 2);
        assert!(matches!(err, Err(LinearError::DimensionMismatch { .. })));
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        let err = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]);
        assert!(matches!(err, Err(LinearError::DimensionMismatch { .. })));
    }

    #[test]
    fn row_and_column_access() {
        let m = Matrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(m.row(1), &[4.0, 5.0, 6.0]);
        assert_eq!(m.column(2), vec![3.0, 6.0]);
        assert_eq!(m.get(0, 1), 2.0);
    }

    #[test]
    fn transpose_roundtrip() {
        let m = Matrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        let t = m.transpose();
        assert_eq!(t.rows(), 3);
        assert_eq!(t.cols(), 2);
        assert_eq!(t.transpose(), m);
    }

    #[test]
    fn matmul_known_product() {
        let a = Matrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        let b = Matrix::from_rows(&[
            vec![7.0, 8.0],
            vec![9.0, 10.0],
            vec![11.0, 12.0],
        ])
        .unwrap();
        let c = a.matmul(&b).unwrap();
        assert_eq!(c.data(), &[58.0, 64.0, 139.0, 154.0]);
    }

    #[test]
    fn matmul_rejects_mismatched_shapes() {
        let a = Matrix::<f64>::zeros(2, 3);
        let b = Matrix::<f64>::zeros(2, 3);
        assert!(matches!(
            a.matmul(&b),
            Err(LinearError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn matvec_known_product() {
        let a = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(a.matvec(&[1.0, 1.0]).unwrap(), vec![3.0, 7.0]);
    }

    #[test]
    fn ensure_finite_locates_bad_entry() {
        let m = Matrix::from_rows(&[vec![1.0, 2.0], vec![f64::NAN, 4.0]]).unwrap();
        assert_eq!(
            m.ensure_finite(),
            Err(LinearError::NonNumericInput { row: 1, col: 0 })
        );
    }
}
