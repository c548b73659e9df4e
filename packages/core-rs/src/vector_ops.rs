//! Vector arithmetic: scalar offsets, sums and differences, scaling, dot and
//! outer products.

use crate::dense::DenseMatrix;
use crate::error::{ensure_same_length, KernelResult};
use crate::kernel::Kernel;
use crate::precision::{almost_equal_in_decimal_places, SCALE_IDENTITY_DECIMAL_PLACES};
use crate::scheduler::Scheduler;
use crate::storage::{MatrixAccess, VectorAccess};

impl<S: Scheduler> Kernel<S> {
    /// `vector + scalar` applied to every element.
    pub fn vector_add_scalar<V: VectorAccess>(&self, vector: &V, scalar: f64) -> V {
        let mut result = vector.create_vector(vector.len());
        result.fill_with(self.scheduler(), |i| vector.get(i) + scalar);
        result
    }

    pub fn vector_add_scalar_into<V: VectorAccess>(
        &self,
        vector: &V,
        scalar: f64,
        result: &mut V,
    ) -> KernelResult<()> {
        ensure_same_length("vector_add_scalar", "result", vector.len(), result.len())?;
        result.fill_with(self.scheduler(), |i| vector.get(i) + scalar);
        Ok(())
    }

    /// `vector - scalar` applied to every element.
    pub fn vector_subtract_scalar<V: VectorAccess>(&self, vector: &V, scalar: f64) -> V {
        self.vector_add_scalar(vector, -scalar)
    }

    pub fn vector_subtract_scalar_into<V: VectorAccess>(
        &self,
        vector: &V,
        scalar: f64,
        result: &mut V,
    ) -> KernelResult<()> {
        ensure_same_length("vector_subtract_scalar", "result", vector.len(), result.len())?;
        result.fill_with(self.scheduler(), |i| vector.get(i) - scalar);
        Ok(())
    }

    pub fn vector_add<V: VectorAccess>(&self, left: &V, right: &V) -> KernelResult<V> {
        self.vector_zip("vector_add", left, right, |a, b| a + b)
    }

    pub fn vector_add_into<V: VectorAccess>(
        &self,
        left: &V,
        right: &V,
        result: &mut V,
    ) -> KernelResult<()> {
        self.vector_zip_into("vector_add", left, right, result, |a, b| a + b)
    }

    /// `target += other`.
    pub fn vector_add_assign<V: VectorAccess>(
        &self,
        target: &mut V,
        other: &V,
    ) -> KernelResult<()> {
        self.vector_zip_assign("vector_add", target, other, |a, b| a + b)
    }

    pub fn vector_subtract<V: VectorAccess>(&self, left: &V, right: &V) -> KernelResult<V> {
        self.vector_zip("vector_subtract", left, right, |a, b| a - b)
    }

    pub fn vector_subtract_into<V: VectorAccess>(
        &self,
        left: &V,
        right: &V,
        result: &mut V,
    ) -> KernelResult<()> {
        self.vector_zip_into("vector_subtract", left, right, result, |a, b| a - b)
    }

    /// `target -= other`.
    pub fn vector_subtract_assign<V: VectorAccess>(
        &self,
        target: &mut V,
        other: &V,
    ) -> KernelResult<()> {
        self.vector_zip_assign("vector_subtract", target, other, |a, b| a - b)
    }

    /// `vector * scalar`. A scalar equal to one within 15 decimal places
    /// returns a plain copy.
    pub fn vector_scale<V: VectorAccess>(&self, vector: &V, scalar: f64) -> V {
        if almost_equal_in_decimal_places(1.0, scalar, SCALE_IDENTITY_DECIMAL_PLACES) {
            return self.clone_vector(vector);
        }
        let mut result = vector.create_vector(vector.len());
        result.fill_with(self.scheduler(), |i| vector.get(i) * scalar);
        result
    }

    pub fn vector_scale_into<V: VectorAccess>(
        &self,
        vector: &V,
        scalar: f64,
        result: &mut V,
    ) -> KernelResult<()> {
        ensure_same_length("vector_scale", "result", vector.len(), result.len())?;
        if almost_equal_in_decimal_places(1.0, scalar, SCALE_IDENTITY_DECIMAL_PLACES) {
            self.copy_back_vector(vector, result);
            return Ok(());
        }
        result.fill_with(self.scheduler(), |i| vector.get(i) * scalar);
        Ok(())
    }

    /// `vector / scalar`; a zero divisor yields infinities or NaN.
    pub fn vector_divide<V: VectorAccess>(&self, vector: &V, scalar: f64) -> V {
        self.vector_scale(vector, 1.0 / scalar)
    }

    pub fn vector_divide_into<V: VectorAccess>(
        &self,
        vector: &V,
        scalar: f64,
        result: &mut V,
    ) -> KernelResult<()> {
        ensure_same_length("vector_divide", "result", vector.len(), result.len())?;
        self.vector_scale_into(vector, 1.0 / scalar, result)
    }

    pub fn vector_negate<V: VectorAccess>(&self, vector: &V) -> V {
        self.vector_scale(vector, -1.0)
    }

    /// Inner product, summed left to right on the calling thread.
    pub fn dot<V: VectorAccess>(&self, left: &V, right: &V) -> KernelResult<f64> {
        ensure_same_length("dot", "right", left.len(), right.len())?;
        let mut sum = 0.0;
        for i in 0..left.len() {
            sum += left.get(i) * right.get(i);
        }
        Ok(sum)
    }

    pub fn vector_pointwise_multiply<V: VectorAccess>(
        &self,
        left: &V,
        right: &V,
    ) -> KernelResult<V> {
        self.vector_zip("vector_pointwise_multiply", left, right, |a, b| a * b)
    }

    pub fn vector_pointwise_multiply_into<V: VectorAccess>(
        &self,
        left: &V,
        right: &V,
        result: &mut V,
    ) -> KernelResult<()> {
        self.vector_zip_into("vector_pointwise_multiply", left, right, result, |a, b| a * b)
    }

    pub fn vector_pointwise_divide<V: VectorAccess>(
        &self,
        left: &V,
        right: &V,
    ) -> KernelResult<V> {
        self.vector_zip("vector_pointwise_divide", left, right, |a, b| a / b)
    }

    pub fn vector_pointwise_divide_into<V: VectorAccess>(
        &self,
        left: &V,
        right: &V,
        result: &mut V,
    ) -> KernelResult<()> {
        self.vector_zip_into("vector_pointwise_divide", left, right, result, |a, b| a / b)
    }

    /// Dyadic product `left * right^T` as a `left.len() x right.len()`
    /// dense matrix, one unit of work per row.
    pub fn outer_product<V: VectorAccess>(&self, left: &V, right: &V) -> DenseMatrix {
        let mut result = DenseMatrix::zeros(left.len(), right.len());
        result.update_rows(self.scheduler(), |i, row| {
            let factor = left.get(i);
            for (j, value) in row.iter_mut().enumerate() {
                *value = factor * right.get(j);
            }
        });
        result
    }

    fn vector_zip<V, F>(
        &self,
        op: &'static str,
        left: &V,
        right: &V,
        combine: F,
    ) -> KernelResult<V>
    where
        V: VectorAccess,
        F: Fn(f64, f64) -> f64 + Send + Sync,
    {
        ensure_same_length(op, "right", left.len(), right.len())?;
        let mut result = left.create_vector(left.len());
        result.fill_with(self.scheduler(), |i| combine(left.get(i), right.get(i)));
        Ok(result)
    }

    fn vector_zip_into<V, F>(
        &self,
        op: &'static str,
        left: &V,
        right: &V,
        result: &mut V,
        combine: F,
    ) -> KernelResult<()>
    where
        V: VectorAccess,
        F: Fn(f64, f64) -> f64 + Send + Sync,
    {
        ensure_same_length(op, "right", left.len(), right.len())?;
        ensure_same_length(op, "result", left.len(), result.len())?;
        result.fill_with(self.scheduler(), |i| combine(left.get(i), right.get(i)));
        Ok(())
    }

    fn vector_zip_assign<V, F>(
        &self,
        op: &'static str,
        target: &mut V,
        other: &V,
        combine: F,
    ) -> KernelResult<()>
    where
        V: VectorAccess,
        F: Fn(f64, f64) -> f64 + Send + Sync,
    {
        ensure_same_length(op, "other", target.len(), other.len())?;
        let source = &*target;
        let values = self
            .scheduler()
            .parallel_map(0, source.len(), |i| combine(source.get(i), other.get(i)));
        for (i, value) in values.into_iter().enumerate() {
            target.set(i, value);
        }
        Ok(())
    }
}
