//! Conversions between [`DenseMatrix`] and `ndarray::Array2`.

use ndarray::Array2;

use crate::dense::DenseMatrix;
use crate::error::{shape_mismatch, KernelResult};
use crate::storage::MatrixAccess;

impl DenseMatrix {
    /// Copies a two-dimensional array in logical (row-major) order, whatever
    /// its memory layout.
    pub fn from_array2(array: &Array2<f64>) -> KernelResult<Self> {
        let (rows, cols) = array.dim();
        DenseMatrix::from_vec(array.iter().copied().collect(), rows, cols)
    }

    pub fn to_array2(&self) -> KernelResult<Array2<f64>> {
        Array2::from_shape_vec(self.shape(), self.as_slice().to_vec())
            .map_err(|err| shape_mismatch("to_array2", err.to_string()))
    }
}
