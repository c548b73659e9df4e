//! Element-by-element combination of two equally shaped matrices.
//!
//! Work is partitioned by column. Division follows IEEE-754: a zero divisor
//! yields an infinity or NaN rather than an error.

use crate::error::{ensure_same_shape, KernelResult};
use crate::kernel::Kernel;
use crate::scheduler::Scheduler;
use crate::storage::MatrixAccess;

impl<S: Scheduler> Kernel<S> {
    pub fn pointwise_multiply<M: MatrixAccess>(&self, left: &M, right: &M) -> KernelResult<M> {
        self.pointwise("pointwise_multiply", left, right, |a, b| a * b)
    }

    pub fn pointwise_multiply_into<M: MatrixAccess>(
        &self,
        left: &M,
        right: &M,
        result: &mut M,
    ) -> KernelResult<()> {
        self.pointwise_into("pointwise_multiply", left, right, result, |a, b| a * b)
    }

    pub fn pointwise_add<M: MatrixAccess>(&self, left: &M, right: &M) -> KernelResult<M> {
        self.pointwise("pointwise_add", left, right, |a, b| a + b)
    }

    pub fn pointwise_add_into<M: MatrixAccess>(
        &self,
        left: &M,
        right: &M,
        result: &mut M,
    ) -> KernelResult<()> {
        self.pointwise_into("pointwise_add", left, right, result, |a, b| a + b)
    }

    pub fn pointwise_subtract<M: MatrixAccess>(&self, left: &M, right: &M) -> KernelResult<M> {
        self.pointwise("pointwise_subtract", left, right, |a, b| a - b)
    }

    pub fn pointwise_subtract_into<M: MatrixAccess>(
        &self,
        left: &M,
        right: &M,
        result: &mut M,
    ) -> KernelResult<()> {
        self.pointwise_into("pointwise_subtract", left, right, result, |a, b| a - b)
    }

    pub fn pointwise_divide<M: MatrixAccess>(&self, left: &M, right: &M) -> KernelResult<M> {
        self.pointwise("pointwise_divide", left, right, |a, b| a / b)
    }

    pub fn pointwise_divide_into<M: MatrixAccess>(
        &self,
        left: &M,
        right: &M,
        result: &mut M,
    ) -> KernelResult<()> {
        self.pointwise_into("pointwise_divide", left, right, result, |a, b| a / b)
    }

    fn pointwise<M, F>(
        &self,
        op: &'static str,
        left: &M,
        right: &M,
        combine: F,
    ) -> KernelResult<M>
    where
        M: MatrixAccess,
        F: Fn(f64, f64) -> f64 + Send + Sync,
    {
        ensure_same_shape(op, "right", left.shape(), right.shape())?;
        let mut result = left.create_matrix(left.rows(), left.columns());
        self.pointwise_into(op, left, right, &mut result, combine)?;
        Ok(result)
    }

    fn pointwise_into<M, F>(
        &self,
        op: &'static str,
        left: &M,
        right: &M,
        result: &mut M,
        combine: F,
    ) -> KernelResult<()>
    where
        M: MatrixAccess,
        F: Fn(f64, f64) -> f64 + Send + Sync,
    {
        ensure_same_shape(op, "right", left.shape(), right.shape())?;
        ensure_same_shape(op, "result", left.shape(), result.shape())?;
        result.update_columns(self.scheduler(), |j, column| {
            for (i, value) in column.iter_mut().enumerate() {
                *value = combine(left.at(i, j), right.at(i, j));
            }
        });
        Ok(())
    }
}
