//! Dictionary-of-keys sparse matrix.
//!
//! Only non-zero entries are stored. The representation exists so the
//! kernel's generic code paths run against something other than a flat
//! buffer; it makes no attempt at sparse-specific fast paths.

use rustc_hash::FxHashMap;

use crate::dense::{DenseMatrix, DenseVector};
use crate::error::{invalid_argument, KernelResult};
use crate::storage::MatrixAccess;

#[derive(Clone, Debug, Default)]
pub struct SparseMatrix {
    rows: usize,
    cols: usize,
    entries: FxHashMap<(usize, usize), f64>,
}

impl SparseMatrix {
    pub fn new(rows: usize, cols: usize) -> KernelResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(invalid_argument(
                "sparse_new",
                "rows and cols must be greater than zero",
            ));
        }
        Ok(Self::empty(rows, cols))
    }

    fn empty(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            entries: FxHashMap::default(),
        }
    }

    /// Builds a matrix from `(row, col, value)` triplets; later duplicates
    /// overwrite earlier ones.
    pub fn from_triplets(
        rows: usize,
        cols: usize,
        triplets: &[(usize, usize, f64)],
    ) -> KernelResult<Self> {
        let mut matrix = Self::new(rows, cols)?;
        for &(row, col, value) in triplets {
            if row >= rows || col >= cols {
                return Err(invalid_argument(
                    "from_triplets",
                    format!("entry ({row}, {col}) is outside {rows}x{cols}"),
                ));
            }
            matrix.set_at(row, col, value);
        }
        Ok(matrix)
    }

    pub fn from_dense(dense: &DenseMatrix) -> Self {
        let mut matrix = Self::empty(dense.rows(), dense.columns());
        for i in 0..dense.rows() {
            for j in 0..dense.columns() {
                matrix.set_at(i, j, dense.at(i, j));
            }
        }
        matrix
    }

    pub fn to_dense(&self) -> DenseMatrix {
        let mut dense = DenseMatrix::zeros(self.rows, self.cols);
        for (&(row, col), &value) in &self.entries {
            dense[(row, col)] = value;
        }
        dense
    }

    pub fn nnz(&self) -> usize {
        self.entries.len()
    }
}

impl PartialEq for SparseMatrix {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows && self.cols == other.cols && self.entries == other.entries
    }
}

impl MatrixAccess for SparseMatrix {
    type Vector = DenseVector;

    fn rows(&self) -> usize {
        self.rows
    }

    fn columns(&self) -> usize {
        self.cols
    }

    fn at(&self, row: usize, column: usize) -> f64 {
        debug_assert!(row < self.rows && column < self.cols);
        self.entries.get(&(row, column)).copied().unwrap_or(0.0)
    }

    fn set_at(&mut self, row: usize, column: usize, value: f64) {
        debug_assert!(row < self.rows && column < self.cols);
        if value == 0.0 {
            self.entries.remove(&(row, column));
        } else {
            self.entries.insert((row, column), value);
        }
    }

    fn create_matrix(&self, rows: usize, columns: usize) -> Self {
        Self::empty(rows, columns)
    }

    fn create_vector(&self, length: usize) -> DenseVector {
        DenseVector::zeros(length)
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeros_are_not_stored() {
        let mut m = SparseMatrix::new(3, 3).unwrap();
        m.set_at(0, 1, 2.5);
        m.set_at(2, 2, -1.0);
        assert_eq!(m.nnz(), 2);
        m.set_at(0, 1, 0.0);
        assert_eq!(m.nnz(), 1);
        assert_eq!(m.at(0, 1), 0.0);
        assert_eq!(m.at(2, 2), -1.0);
    }

    #[test]
    fn dense_round_trip() {
        let dense = DenseMatrix::from_rows(&[[1.0, 0.0, 2.0], [0.0, 3.0, 0.0]]).unwrap();
        let sparse = SparseMatrix::from_dense(&dense);
        assert_eq!(sparse.nnz(), 3);
        assert_eq!(sparse.to_dense(), dense);
    }

    #[test]
    fn triplets_are_bounds_checked() {
        assert!(SparseMatrix::from_triplets(2, 2, &[(2, 0, 1.0)]).is_err());
        assert!(SparseMatrix::new(0, 2).is_err());
        let m = SparseMatrix::from_triplets(2, 2, &[(0, 0, 1.0), (0, 0, 4.0)]).unwrap();
        assert_eq!(m.at(0, 0), 4.0);
    }
}
