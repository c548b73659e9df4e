//! In-place and allocating add, subtract, scale and negate.
//!
//! The `_into` forms all follow one pattern: validate the result shape,
//! copy the source into the result, then run the in-place mutator on it.

use crate::error::{ensure_same_shape, KernelResult};
use crate::kernel::Kernel;
use crate::precision::{almost_equal_in_decimal_places, SCALE_IDENTITY_DECIMAL_PLACES};
use crate::scheduler::Scheduler;
use crate::storage::MatrixAccess;

impl<S: Scheduler> Kernel<S> {
    /// `target += other`, one unit of work per row.
    pub fn add_assign<M: MatrixAccess>(&self, target: &mut M, other: &M) -> KernelResult<()> {
        ensure_same_shape("add", "other", target.shape(), other.shape())?;
        target.update_rows(self.scheduler(), |i, row| {
            for (j, value) in row.iter_mut().enumerate() {
                *value += other.at(i, j);
            }
        });
        Ok(())
    }

    /// `target -= other`, one unit of work per row.
    pub fn subtract_assign<M: MatrixAccess>(
        &self,
        target: &mut M,
        other: &M,
    ) -> KernelResult<()> {
        ensure_same_shape("subtract", "other", target.shape(), other.shape())?;
        target.update_rows(self.scheduler(), |i, row| {
            for (j, value) in row.iter_mut().enumerate() {
                *value -= other.at(i, j);
            }
        });
        Ok(())
    }

    /// `result = left + right`: copies `left` into `result`, then adds.
    pub fn add_into<M: MatrixAccess>(
        &self,
        left: &M,
        right: &M,
        result: &mut M,
    ) -> KernelResult<()> {
        ensure_same_shape("add", "right", left.shape(), right.shape())?;
        ensure_same_shape("add", "result", left.shape(), result.shape())?;
        left.copy_to(result)?;
        self.add_assign(result, right)
    }

    pub fn subtract_into<M: MatrixAccess>(
        &self,
        left: &M,
        right: &M,
        result: &mut M,
    ) -> KernelResult<()> {
        ensure_same_shape("subtract", "right", left.shape(), right.shape())?;
        ensure_same_shape("subtract", "result", left.shape(), result.shape())?;
        left.copy_to(result)?;
        self.subtract_assign(result, right)
    }

    /// Scales every element of `target`. A scalar equal to one within 15
    /// decimal places leaves the matrix untouched without dispatching work.
    pub fn scale_assign<M: MatrixAccess>(&self, target: &mut M, scalar: f64) {
        if almost_equal_in_decimal_places(1.0, scalar, SCALE_IDENTITY_DECIMAL_PLACES) {
            return;
        }
        target.update_rows(self.scheduler(), |_, row| {
            for value in row.iter_mut() {
                *value *= scalar;
            }
        });
    }

    /// `result = scalar * source`.
    pub fn scale_into<M: MatrixAccess>(
        &self,
        source: &M,
        scalar: f64,
        result: &mut M,
    ) -> KernelResult<()> {
        ensure_same_shape("scale", "result", source.shape(), result.shape())?;
        source.copy_to(result)?;
        self.scale_assign(result, scalar);
        Ok(())
    }

    pub fn negate_assign<M: MatrixAccess>(&self, target: &mut M) {
        self.scale_assign(target, -1.0);
    }

    /// `result = -source`.
    pub fn negate_into<M: MatrixAccess>(&self, source: &M, result: &mut M) -> KernelResult<()> {
        ensure_same_shape("negate", "result", source.shape(), result.shape())?;
        source.copy_to(result)?;
        self.negate_assign(result);
        Ok(())
    }

    /// `left + right` as a new matrix; both operands are left untouched.
    pub fn add<M: MatrixAccess>(&self, left: &M, right: &M) -> KernelResult<M> {
        ensure_same_shape("add", "right", left.shape(), right.shape())?;
        let mut result = self.clone_matrix(left);
        self.add_assign(&mut result, right)?;
        Ok(result)
    }

    pub fn subtract<M: MatrixAccess>(&self, left: &M, right: &M) -> KernelResult<M> {
        ensure_same_shape("subtract", "right", left.shape(), right.shape())?;
        let mut result = self.clone_matrix(left);
        self.subtract_assign(&mut result, right)?;
        Ok(result)
    }

    /// Unary plus: an independent copy of `source`.
    pub fn plus<M: MatrixAccess>(&self, source: &M) -> M {
        self.clone_matrix(source)
    }

    pub fn negate<M: MatrixAccess>(&self, source: &M) -> M {
        let mut result = self.clone_matrix(source);
        self.negate_assign(&mut result);
        result
    }

    /// `source * scalar` as a new matrix.
    pub fn scale<M: MatrixAccess>(&self, source: &M, scalar: f64) -> M {
        let mut result = self.clone_matrix(source);
        self.scale_assign(&mut result, scalar);
        result
    }

    /// `scalar * source`; identical to [`Kernel::scale`].
    pub fn scale_left<M: MatrixAccess>(&self, scalar: f64, source: &M) -> M {
        self.scale(source, scalar)
    }
}
