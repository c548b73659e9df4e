//! Structural composition: append, stack, diagonal stack and Kronecker
//! product. Every destination cell is written exactly once per call.

use crate::error::{ensure_same_shape, shape_mismatch, KernelResult};
use crate::kernel::Kernel;
use crate::scheduler::Scheduler;
use crate::storage::MatrixAccess;

impl<S: Scheduler> Kernel<S> {
    /// Horizontal concatenation `[left | right]`.
    pub fn append<M: MatrixAccess>(&self, left: &M, right: &M) -> KernelResult<M> {
        ensure_same_rows("append", left, right)?;
        let mut result = left.create_matrix(left.rows(), left.columns() + right.columns());
        self.append_into(left, right, &mut result)?;
        Ok(result)
    }

    /// Writes `[left | right]` into `result`. Each output row is split at
    /// `left.columns()` and the two halves are filled concurrently.
    pub fn append_into<M: MatrixAccess>(
        &self,
        left: &M,
        right: &M,
        result: &mut M,
    ) -> KernelResult<()> {
        ensure_same_rows("append", left, right)?;
        let split = left.columns();
        ensure_same_shape(
            "append",
            "result",
            (left.rows(), split + right.columns()),
            result.shape(),
        )?;
        let scheduler = self.scheduler();
        result.update_rows(scheduler, |i, row| {
            let (head, tail) = row.split_at_mut(split);
            scheduler.parallel_invoke(
                || copy_row(left, i, head),
                || copy_row(right, i, tail),
            );
        });
        Ok(())
    }

    /// Vertical concatenation with `lower` beneath `upper`.
    pub fn stack<M: MatrixAccess>(&self, upper: &M, lower: &M) -> KernelResult<M> {
        ensure_same_columns("stack", upper, lower)?;
        let mut result = upper.create_matrix(upper.rows() + lower.rows(), upper.columns());
        self.stack_into(upper, lower, &mut result)?;
        Ok(result)
    }

    pub fn stack_into<M: MatrixAccess>(
        &self,
        upper: &M,
        lower: &M,
        result: &mut M,
    ) -> KernelResult<()> {
        ensure_same_columns("stack", upper, lower)?;
        ensure_same_shape(
            "stack",
            "result",
            (upper.rows() + lower.rows(), upper.columns()),
            result.shape(),
        )?;
        let offset = upper.rows();
        result.update_rows(self.scheduler(), |i, row| {
            if i < offset {
                copy_row(upper, i, row);
            } else {
                copy_row(lower, i - offset, row);
            }
        });
        Ok(())
    }

    /// Block-diagonal composition `[[upper, 0], [0, lower]]`.
    pub fn diagonal_stack<M: MatrixAccess>(&self, upper: &M, lower: &M) -> KernelResult<M> {
        let mut result = upper.create_matrix(
            upper.rows() + lower.rows(),
            upper.columns() + lower.columns(),
        );
        self.diagonal_stack_into(upper, lower, &mut result)?;
        Ok(result)
    }

    /// Writes the block-diagonal composition into `result`. The off-diagonal
    /// blocks are zeroed explicitly, so `result` may hold stale values.
    pub fn diagonal_stack_into<M: MatrixAccess>(
        &self,
        upper: &M,
        lower: &M,
        result: &mut M,
    ) -> KernelResult<()> {
        ensure_same_shape(
            "diagonal_stack",
            "result",
            (
                upper.rows() + lower.rows(),
                upper.columns() + lower.columns(),
            ),
            result.shape(),
        )?;
        let row_offset = upper.rows();
        let column_offset = upper.columns();
        result.update_rows(self.scheduler(), |i, row| {
            let (head, tail) = row.split_at_mut(column_offset);
            if i < row_offset {
                copy_row(upper, i, head);
                tail.fill(0.0);
            } else {
                head.fill(0.0);
                copy_row(lower, i - row_offset, tail);
            }
        });
        Ok(())
    }

    /// Kronecker product `left ⊗ right`.
    pub fn kronecker<M: MatrixAccess>(&self, left: &M, right: &M) -> KernelResult<M> {
        let mut result = left.create_matrix(
            left.rows() * right.rows(),
            left.columns() * right.columns(),
        );
        self.kronecker_into(left, right, &mut result)?;
        Ok(result)
    }

    /// Writes `left ⊗ right` into `result`: the block at row offset
    /// `i * right.rows()` and column offset `j * right.columns()` holds
    /// `left[i, j] * right`. One unit of work per output row.
    pub fn kronecker_into<M: MatrixAccess>(
        &self,
        left: &M,
        right: &M,
        result: &mut M,
    ) -> KernelResult<()> {
        ensure_same_shape(
            "kronecker",
            "result",
            (left.rows() * right.rows(), left.columns() * right.columns()),
            result.shape(),
        )?;
        let block_rows = right.rows();
        let block_columns = right.columns();
        if block_columns == 0 {
            return Ok(());
        }
        result.update_rows(self.scheduler(), |r, row| {
            let (i, bi) = (r / block_rows, r % block_rows);
            for (j, block) in row.chunks_mut(block_columns).enumerate() {
                let factor = left.at(i, j);
                for (bj, value) in block.iter_mut().enumerate() {
                    *value = factor * right.at(bi, bj);
                }
            }
        });
        Ok(())
    }
}

fn copy_row<M: MatrixAccess>(source: &M, row: usize, target: &mut [f64]) {
    for (j, value) in target.iter_mut().enumerate() {
        *value = source.at(row, j);
    }
}

fn ensure_same_rows<M: MatrixAccess>(op: &'static str, left: &M, right: &M) -> KernelResult<()> {
    if left.rows() != right.rows() {
        return Err(shape_mismatch(
            op,
            format!(
                "row counts differ ({} vs {})",
                left.rows(),
                right.rows()
            ),
        ));
    }
    Ok(())
}

fn ensure_same_columns<M: MatrixAccess>(
    op: &'static str,
    upper: &M,
    lower: &M,
) -> KernelResult<()> {
    if upper.columns() != lower.columns() {
        return Err(shape_mismatch(
            op,
            format!(
                "column counts differ ({} vs {})",
                upper.columns(),
                lower.columns()
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::dense::DenseMatrix;
    use crate::error::KernelError;
    use crate::kernel::Kernel;
    use crate::scheduler::SequentialScheduler;
    use crate::sparse::SparseMatrix;
    use crate::storage::MatrixAccess;

    fn kernel() -> Kernel<SequentialScheduler> {
        Kernel::new(SequentialScheduler)
    }

    fn a() -> DenseMatrix {
        DenseMatrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap()
    }

    fn b() -> DenseMatrix {
        DenseMatrix::from_rows(&[[5.0], [6.0]]).unwrap()
    }

    #[test]
    fn append_slices_back_to_operands() {
        let k = kernel();
        let joined = k.append(&a(), &b()).unwrap();
        assert_eq!(joined.to_rows(), vec![vec![1.0, 2.0, 5.0], vec![3.0, 4.0, 6.0]]);
        assert_eq!(joined.sub_matrix(0, 2, 0, 2).unwrap(), a());
        assert_eq!(joined.sub_matrix(0, 2, 2, 1).unwrap(), b());
    }

    #[test]
    fn append_requires_equal_row_counts() {
        let k = kernel();
        let err = k.append(&a(), &DenseMatrix::zeros(3, 1)).unwrap_err();
        assert!(matches!(err, KernelError::DimensionMismatch { op: "append", .. }));
        let mut wrong = DenseMatrix::filled(2, 2, 9.0);
        assert!(k.append_into(&a(), &b(), &mut wrong).is_err());
        assert_eq!(wrong, DenseMatrix::filled(2, 2, 9.0));
    }

    #[test]
    fn stack_slices_back_to_operands() {
        let k = kernel();
        let lower = DenseMatrix::from_rows(&[[7.0, 8.0]]).unwrap();
        let stacked = k.stack(&a(), &lower).unwrap();
        assert_eq!(stacked.shape(), (3, 2));
        assert_eq!(stacked.sub_matrix(0, 2, 0, 2).unwrap(), a());
        assert_eq!(stacked.sub_matrix(2, 1, 0, 2).unwrap(), lower);
        assert!(k.stack(&a(), &b()).is_err());
    }

    #[test]
    fn diagonal_stack_zeroes_off_diagonal_blocks() {
        let k = kernel();
        let mut result = DenseMatrix::filled(4, 3, f64::NAN);
        k.diagonal_stack_into(&a(), &b(), &mut result).unwrap();
        assert_eq!(
            result.to_rows(),
            vec![
                vec![1.0, 2.0, 0.0],
                vec![3.0, 4.0, 0.0],
                vec![0.0, 0.0, 5.0],
                vec![0.0, 0.0, 6.0],
            ]
        );
        assert_eq!(k.diagonal_stack(&a(), &b()).unwrap(), result);
        assert!(k
            .diagonal_stack_into(&a(), &b(), &mut DenseMatrix::zeros(3, 3))
            .is_err());
    }

    #[test]
    fn kronecker_of_row_and_swap_matrix() {
        let k = kernel();
        let left = DenseMatrix::from_rows(&[[1.0, 2.0]]).unwrap();
        let right = DenseMatrix::from_rows(&[[0.0, 1.0], [1.0, 0.0]]).unwrap();
        let product = k.kronecker(&left, &right).unwrap();
        assert_eq!(product.shape(), (2, 4));
        assert_eq!(
            product.to_rows(),
            vec![vec![0.0, 1.0, 0.0, 2.0], vec![1.0, 0.0, 2.0, 0.0]]
        );
        for i in 0..left.rows() {
            for j in 0..left.columns() {
                for bi in 0..right.rows() {
                    for bj in 0..right.columns() {
                        assert_eq!(
                            product.at(i * 2 + bi, j * 2 + bj),
                            left.at(i, j) * right.at(bi, bj)
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn kronecker_result_shape_is_checked() {
        let k = kernel();
        for (rows, columns) in [(2, 4), (4, 1)] {
            let mut wrong = DenseMatrix::filled(rows, columns, 7.0);
            let err = k.kronecker_into(&a(), &b(), &mut wrong).unwrap_err();
            assert!(matches!(err, KernelError::DimensionMismatch { op: "kronecker", .. }));
            assert_eq!(wrong, DenseMatrix::filled(rows, columns, 7.0));
        }
    }

    #[test]
    fn kronecker_with_columnless_right_operand() {
        let k = kernel();
        let left = SparseMatrix::from_dense(&a());
        let right = SparseMatrix::from_dense(&DenseMatrix::zeros(2, 0));
        let product = k.kronecker(&left, &right).unwrap();
        assert_eq!(product.shape(), (4, 0));
    }
}
