//! Matrix-vector, vector-matrix and matrix-matrix products.
//!
//! Each output element is a single left-to-right sum over the shared inner
//! index, so results do not depend on how units of work are scheduled.

use crate::error::{ensure_same_length, ensure_same_shape, shape_mismatch, KernelResult};
use crate::kernel::Kernel;
use crate::scheduler::Scheduler;
use crate::storage::{MatrixAccess, VectorAccess};

impl<S: Scheduler> Kernel<S> {
    /// `matrix * vector` as a new vector of length `matrix.rows()`.
    pub fn multiply_vector<M: MatrixAccess>(
        &self,
        matrix: &M,
        vector: &M::Vector,
    ) -> KernelResult<M::Vector> {
        let mut result = matrix.create_vector(matrix.rows());
        self.multiply_vector_into(matrix, vector, &mut result)?;
        Ok(result)
    }

    /// `result = matrix * vector`, one unit of work per output row.
    pub fn multiply_vector_into<M: MatrixAccess>(
        &self,
        matrix: &M,
        vector: &M::Vector,
        result: &mut M::Vector,
    ) -> KernelResult<()> {
        ensure_same_length(
            "multiply_vector",
            "vector",
            matrix.columns(),
            vector.len(),
        )?;
        ensure_same_length("multiply_vector", "result", matrix.rows(), result.len())?;
        let inner = matrix.columns();
        result.fill_with(self.scheduler(), |i| {
            let mut sum = 0.0;
            for j in 0..inner {
                sum += matrix.at(i, j) * vector.get(j);
            }
            sum
        });
        Ok(())
    }

    /// `vector = matrix * vector`. The product is computed into a temporary
    /// and copied back, so no unit of work reads an already-updated slot.
    pub fn multiply_vector_in_place<M: MatrixAccess>(
        &self,
        matrix: &M,
        vector: &mut M::Vector,
    ) -> KernelResult<()> {
        ensure_same_length(
            "multiply_vector",
            "vector",
            matrix.columns(),
            vector.len(),
        )?;
        ensure_same_length("multiply_vector", "result", matrix.rows(), vector.len())?;
        tracing::debug!(len = vector.len(), "multiply_vector: result aliases operand");
        let mut temporary = vector.create_vector(vector.len());
        self.multiply_vector_into(matrix, vector, &mut temporary)?;
        self.copy_back_vector(&temporary, vector);
        Ok(())
    }

    /// Row vector times matrix, `vector * matrix`, as a new vector of length
    /// `matrix.columns()`.
    pub fn left_multiply_vector<M: MatrixAccess>(
        &self,
        vector: &M::Vector,
        matrix: &M,
    ) -> KernelResult<M::Vector> {
        let mut result = matrix.create_vector(matrix.columns());
        self.left_multiply_vector_into(vector, matrix, &mut result)?;
        Ok(result)
    }

    /// `result = vector * matrix`, one unit of work per output column.
    pub fn left_multiply_vector_into<M: MatrixAccess>(
        &self,
        vector: &M::Vector,
        matrix: &M,
        result: &mut M::Vector,
    ) -> KernelResult<()> {
        ensure_same_length(
            "left_multiply_vector",
            "vector",
            matrix.rows(),
            vector.len(),
        )?;
        ensure_same_length(
            "left_multiply_vector",
            "result",
            matrix.columns(),
            result.len(),
        )?;
        let inner = matrix.rows();
        result.fill_with(self.scheduler(), |j| {
            let mut sum = 0.0;
            for i in 0..inner {
                sum += vector.get(i) * matrix.at(i, j);
            }
            sum
        });
        Ok(())
    }

    /// `vector = vector * matrix` through a temporary.
    pub fn left_multiply_vector_in_place<M: MatrixAccess>(
        &self,
        vector: &mut M::Vector,
        matrix: &M,
    ) -> KernelResult<()> {
        ensure_same_length(
            "left_multiply_vector",
            "vector",
            matrix.rows(),
            vector.len(),
        )?;
        ensure_same_length(
            "left_multiply_vector",
            "result",
            matrix.columns(),
            vector.len(),
        )?;
        tracing::debug!(
            len = vector.len(),
            "left_multiply_vector: result aliases operand"
        );
        let mut temporary = vector.create_vector(vector.len());
        self.left_multiply_vector_into(vector, matrix, &mut temporary)?;
        self.copy_back_vector(&temporary, vector);
        Ok(())
    }

    /// `left * right` as a new matrix.
    pub fn multiply<M: MatrixAccess>(&self, left: &M, right: &M) -> KernelResult<M> {
        ensure_inner_dimensions(left, right)?;
        let mut result = left.create_matrix(left.rows(), right.columns());
        self.multiply_into(left, right, &mut result)?;
        Ok(result)
    }

    /// `result = left * right`: the outer loop over output rows is the unit
    /// of work, the column and inner loops run sequentially inside it.
    pub fn multiply_into<M: MatrixAccess>(
        &self,
        left: &M,
        right: &M,
        result: &mut M,
    ) -> KernelResult<()> {
        ensure_inner_dimensions(left, right)?;
        ensure_same_shape(
            "multiply",
            "result",
            (left.rows(), right.columns()),
            result.shape(),
        )?;
        let inner = left.columns();
        result.update_rows(self.scheduler(), |i, row| {
            for (j, value) in row.iter_mut().enumerate() {
                let mut sum = 0.0;
                for l in 0..inner {
                    sum += left.at(i, l) * right.at(l, j);
                }
                *value = sum;
            }
        });
        Ok(())
    }

    /// `target = target * right` through a temporary; `right` must be square.
    pub fn multiply_assign<M: MatrixAccess>(&self, target: &mut M, right: &M) -> KernelResult<()> {
        ensure_inner_dimensions(target, right)?;
        ensure_same_shape(
            "multiply",
            "result",
            (target.rows(), right.columns()),
            target.shape(),
        )?;
        tracing::debug!(
            rows = target.rows(),
            cols = target.columns(),
            "multiply: result aliases left operand"
        );
        let mut temporary = target.create_matrix(target.rows(), target.columns());
        self.multiply_into(target, right, &mut temporary)?;
        self.copy_back_matrix(temporary, target);
        Ok(())
    }

    /// `target = left * target` through a temporary; `left` must be square.
    pub fn premultiply_assign<M: MatrixAccess>(
        &self,
        target: &mut M,
        left: &M,
    ) -> KernelResult<()> {
        ensure_inner_dimensions(left, target)?;
        ensure_same_shape(
            "multiply",
            "result",
            (left.rows(), target.columns()),
            target.shape(),
        )?;
        tracing::debug!(
            rows = target.rows(),
            cols = target.columns(),
            "multiply: result aliases right operand"
        );
        let mut temporary = target.create_matrix(target.rows(), target.columns());
        self.multiply_into(left, target, &mut temporary)?;
        self.copy_back_matrix(temporary, target);
        Ok(())
    }
}

fn ensure_inner_dimensions<M: MatrixAccess>(left: &M, right: &M) -> KernelResult<()> {
    if left.columns() != right.rows() {
        return Err(shape_mismatch(
            "multiply",
            format!(
                "inner dimensions do not match ({}x{} * {}x{})",
                left.rows(),
                left.columns(),
                right.rows(),
                right.columns()
            ),
        ));
    }
    Ok(())
}
