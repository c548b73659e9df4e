//! Trace, p-norm normalisation, and the decomposition-backed queries that
//! are not part of the arithmetic core.

use crate::error::{invalid_argument, not_implemented, shape_mismatch, KernelResult};
use crate::kernel::Kernel;
use crate::scheduler::Scheduler;
use crate::storage::{MatrixAccess, VectorAccess};

impl<S: Scheduler> Kernel<S> {
    /// Sum of the diagonal. Runs sequentially on the calling thread.
    pub fn trace<M: MatrixAccess>(&self, matrix: &M) -> KernelResult<f64> {
        if !matrix.is_square() {
            return Err(shape_mismatch(
                "trace",
                format!(
                    "matrix must be square, got {}x{}",
                    matrix.rows(),
                    matrix.columns()
                ),
            ));
        }
        let mut sum = 0.0;
        for i in 0..matrix.rows() {
            sum += matrix.at(i, i);
        }
        Ok(sum)
    }

    /// Copy of `matrix` with every column divided by its own p-norm.
    pub fn normalize_columns<M: MatrixAccess>(&self, matrix: &M, p: u32) -> KernelResult<M> {
        ensure_norm_order("normalize_columns", p)?;
        let norms = self.scheduler().parallel_map(0, matrix.columns(), |j| {
            matrix.column_vector(j).p_norm(p)
        });
        let mut result = self.clone_matrix(matrix);
        result.update_columns(self.scheduler(), |j, column| divide(column, norms[j]));
        Ok(result)
    }

    /// Copy of `matrix` with every row divided by its own p-norm.
    pub fn normalize_rows<M: MatrixAccess>(&self, matrix: &M, p: u32) -> KernelResult<M> {
        ensure_norm_order("normalize_rows", p)?;
        let norms = self
            .scheduler()
            .parallel_map(0, matrix.rows(), |i| matrix.row_vector(i).p_norm(p));
        let mut result = self.clone_matrix(matrix);
        result.update_rows(self.scheduler(), |i, row| divide(row, norms[i]));
        Ok(result)
    }

    pub fn determinant<M: MatrixAccess>(&self, _matrix: &M) -> KernelResult<f64> {
        Err(not_implemented("determinant"))
    }

    pub fn condition_number<M: MatrixAccess>(&self, _matrix: &M) -> KernelResult<f64> {
        Err(not_implemented("condition_number"))
    }

    pub fn rank<M: MatrixAccess>(&self, _matrix: &M) -> KernelResult<usize> {
        Err(not_implemented("rank"))
    }
}

fn ensure_norm_order(op: &'static str, p: u32) -> KernelResult<()> {
    if p < 1 {
        return Err(invalid_argument(op, format!("norm order must be >= 1, got {p}")));
    }
    Ok(())
}

// A zero lane has a zero norm and divides through to NaN.
fn divide(values: &mut [f64], norm: f64) {
    for value in values.iter_mut() {
        *value /= norm;
    }
}

#[cfg(test)]
mod tests {
    use crate::dense::DenseMatrix;
    use crate::error::KernelError;
    use crate::kernel::Kernel;
    use crate::scheduler::SequentialScheduler;
    use crate::storage::MatrixAccess;

    fn kernel() -> Kernel<SequentialScheduler> {
        Kernel::new(SequentialScheduler)
    }

    #[test]
    fn trace_sums_the_diagonal() {
        let k = kernel();
        let m = DenseMatrix::from_rows(&[[1.0, 9.0, 9.0], [9.0, 2.0, 9.0], [9.0, 9.0, 3.5]])
            .unwrap();
        assert_eq!(k.trace(&m).unwrap(), 6.5);
    }

    #[test]
    fn trace_rejects_non_square() {
        let k = kernel();
        let err = k.trace(&DenseMatrix::zeros(2, 3)).unwrap_err();
        assert!(matches!(err, KernelError::DimensionMismatch { op: "trace", .. }));
    }

    #[test]
    fn normalize_columns_uses_each_columns_norm() {
        let k = kernel();
        let m = DenseMatrix::from_rows(&[[3.0, 1.0], [4.0, -1.0]]).unwrap();
        let unit = k.normalize_columns(&m, 2).unwrap();
        assert_eq!(unit.column(0), vec![0.6, 0.8]);
        let ones = k.normalize_columns(&m, 1).unwrap();
        assert_eq!(ones.column(1), vec![0.5, -0.5]);
        assert_eq!(m.at(0, 0), 3.0);
    }

    #[test]
    fn normalize_rows_divides_by_that_rows_norm() {
        let k = kernel();
        let m = DenseMatrix::from_rows(&[[3.0, 4.0], [0.0, 2.0], [1.0, 1.0]]).unwrap();
        let unit = k.normalize_rows(&m, 2).unwrap();
        assert_eq!(unit.row(0), vec![0.6, 0.8]);
        assert_eq!(unit.row(1), vec![0.0, 1.0]);
        let l1 = k.normalize_rows(&m, 1).unwrap();
        assert_eq!(l1.row(2), vec![0.5, 0.5]);
    }

    #[test]
    fn very_high_norm_order_divides_by_the_largest_entry() {
        let k = kernel();
        let m = DenseMatrix::from_rows(&[[3.0, -4.0], [1.0, 2.0]]).unwrap();
        let rows = k.normalize_rows(&m, 1u32 << 31).unwrap();
        for (actual, expected) in rows.row(0).iter().zip([0.75, -1.0]) {
            assert!((actual - expected).abs() < 1e-9);
        }
        let columns = k.normalize_columns(&m, u32::MAX).unwrap();
        assert!(columns.as_slice().iter().all(|value| value.is_finite()));
        assert!((columns.at(1, 1) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn norm_order_zero_is_rejected() {
        let k = kernel();
        let m = DenseMatrix::identity(2);
        assert!(matches!(
            k.normalize_rows(&m, 0),
            Err(KernelError::InvalidArgument { op: "normalize_rows", .. })
        ));
        assert!(matches!(
            k.normalize_columns(&m, 0),
            Err(KernelError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn decomposition_queries_are_not_implemented() {
        let k = kernel();
        let m = DenseMatrix::identity(3);
        assert_eq!(k.determinant(&m).unwrap_err().code(), "E_NOT_IMPLEMENTED");
        assert!(matches!(
            k.condition_number(&m),
            Err(KernelError::NotImplemented { op: "condition_number" })
        ));
        assert!(k.rank(&m).is_err());
    }
}
