//! Element accessor contract shared by every matrix and vector representation.
//!
//! The arithmetic kernel only ever touches storage through these traits, so
//! a new representation gets the whole operation set by implementing the
//! required methods. Representations with contiguous rows should override
//! [`MatrixAccess::update_rows`] to avoid the gather/scatter round trip.

use crate::error::{ensure_same_length, ensure_same_shape, shape_mismatch, KernelResult};
use crate::scheduler::Scheduler;

pub trait VectorAccess: Clone + Send + Sync + Sized {
    fn len(&self) -> usize;

    fn get(&self, index: usize) -> f64;

    fn set(&mut self, index: usize, value: f64);

    /// Creates a zero-filled vector of the same representation.
    fn create_vector(&self, length: usize) -> Self;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn to_vec(&self) -> Vec<f64> {
        (0..self.len()).map(|index| self.get(index)).collect()
    }

    /// p-norm `(sum |x_i|^p)^(1/p)`. `p` must be at least 1; the kernel
    /// validates that before calling.
    fn p_norm(&self, p: u32) -> f64 {
        match p {
            1 => (0..self.len()).map(|i| self.get(i).abs()).sum(),
            2 => (0..self.len())
                .map(|i| {
                    let value = self.get(i);
                    value * value
                })
                .sum::<f64>()
                .sqrt(),
            _ => {
                // Scaled by the largest magnitude so high orders neither
                // overflow nor underflow to zero.
                let max = (0..self.len()).map(|i| self.get(i).abs()).fold(0.0, f64::max);
                if max == 0.0 || !max.is_finite() {
                    return max;
                }
                let exponent = f64::from(p);
                let sum: f64 = (0..self.len())
                    .map(|i| (self.get(i).abs() / max).powf(exponent))
                    .sum();
                max * sum.powf(1.0 / exponent)
            }
        }
    }

    fn copy_to(&self, target: &mut Self) -> KernelResult<()> {
        ensure_same_length("copy_to", "target", self.len(), target.len())?;
        for index in 0..self.len() {
            target.set(index, self.get(index));
        }
        Ok(())
    }

    /// Overwrites every element with `work(index)`, one unit of work per
    /// element.
    fn fill_with<S, F>(&mut self, scheduler: &S, work: F)
    where
        S: Scheduler,
        F: Fn(usize) -> f64 + Send + Sync,
    {
        let values = scheduler.parallel_map(0, self.len(), work);
        for (index, value) in values.into_iter().enumerate() {
            self.set(index, value);
        }
    }
}

pub trait MatrixAccess: Clone + Send + Sync + Sized {
    type Vector: VectorAccess;

    fn rows(&self) -> usize;

    fn columns(&self) -> usize;

    fn at(&self, row: usize, column: usize) -> f64;

    fn set_at(&mut self, row: usize, column: usize, value: f64);

    /// Creates a zero-filled matrix of the same representation.
    fn create_matrix(&self, rows: usize, columns: usize) -> Self;

    fn create_vector(&self, length: usize) -> Self::Vector;

    fn shape(&self) -> (usize, usize) {
        (self.rows(), self.columns())
    }

    fn is_square(&self) -> bool {
        self.rows() == self.columns()
    }

    fn row(&self, row: usize) -> Vec<f64> {
        (0..self.columns()).map(|j| self.at(row, j)).collect()
    }

    fn column(&self, column: usize) -> Vec<f64> {
        (0..self.rows()).map(|i| self.at(i, column)).collect()
    }

    fn row_vector(&self, row: usize) -> Self::Vector {
        let mut vector = self.create_vector(self.columns());
        for j in 0..self.columns() {
            vector.set(j, self.at(row, j));
        }
        vector
    }

    fn column_vector(&self, column: usize) -> Self::Vector {
        let mut vector = self.create_vector(self.rows());
        for i in 0..self.rows() {
            vector.set(i, self.at(i, column));
        }
        vector
    }

    fn copy_to(&self, target: &mut Self) -> KernelResult<()> {
        ensure_same_shape("copy_to", "target", self.shape(), target.shape())?;
        for i in 0..self.rows() {
            for j in 0..self.columns() {
                target.set_at(i, j, self.at(i, j));
            }
        }
        Ok(())
    }

    fn transpose(&self) -> Self {
        let mut result = self.create_matrix(self.columns(), self.rows());
        for i in 0..self.rows() {
            for j in 0..self.columns() {
                result.set_at(j, i, self.at(i, j));
            }
        }
        result
    }

    /// Copies the `row_count x column_count` block starting at
    /// `(row_start, column_start)` into a new matrix.
    fn sub_matrix(
        &self,
        row_start: usize,
        row_count: usize,
        column_start: usize,
        column_count: usize,
    ) -> KernelResult<Self> {
        if row_count == 0
            || column_count == 0
            || row_start + row_count > self.rows()
            || column_start + column_count > self.columns()
        {
            return Err(shape_mismatch(
                "sub_matrix",
                format!(
                    "block {row_count}x{column_count} at ({row_start}, {column_start}) is outside {}x{}",
                    self.rows(),
                    self.columns()
                ),
            ));
        }
        let mut result = self.create_matrix(row_count, column_count);
        for i in 0..row_count {
            for j in 0..column_count {
                result.set_at(i, j, self.at(row_start + i, column_start + j));
            }
        }
        Ok(result)
    }

    /// Sets every element to zero.
    fn clear(&mut self) {
        for i in 0..self.rows() {
            for j in 0..self.columns() {
                self.set_at(i, j, 0.0);
            }
        }
    }

    /// Writes `source` into the block whose top-left corner is
    /// `(row_offset, column_offset)`.
    fn set_sub_matrix<M: MatrixAccess>(
        &mut self,
        row_offset: usize,
        column_offset: usize,
        source: &M,
    ) -> KernelResult<()> {
        if row_offset + source.rows() > self.rows()
            || column_offset + source.columns() > self.columns()
        {
            return Err(shape_mismatch(
                "set_sub_matrix",
                format!(
                    "{}x{} block at ({row_offset}, {column_offset}) exceeds {}x{} target",
                    source.rows(),
                    source.columns(),
                    self.rows(),
                    self.columns()
                ),
            ));
        }
        for i in 0..source.rows() {
            for j in 0..source.columns() {
                self.set_at(row_offset + i, column_offset + j, source.at(i, j));
            }
        }
        Ok(())
    }

    /// Runs `work(row, values)` once per row, where `values` holds the
    /// current contents of that row and whatever `work` leaves in it is
    /// written back.
    fn update_rows<S, F>(&mut self, scheduler: &S, work: F)
    where
        S: Scheduler,
        F: Fn(usize, &mut [f64]) + Send + Sync,
    {
        let source = &*self;
        let updated = scheduler.parallel_map(0, source.rows(), |i| {
            let mut values = source.row(i);
            work(i, &mut values);
            values
        });
        for (i, values) in updated.into_iter().enumerate() {
            for (j, value) in values.into_iter().enumerate() {
                self.set_at(i, j, value);
            }
        }
    }

    /// Column counterpart of [`MatrixAccess::update_rows`].
    fn update_columns<S, F>(&mut self, scheduler: &S, work: F)
    where
        S: Scheduler,
        F: Fn(usize, &mut [f64]) + Send + Sync,
    {
        let source = &*self;
        let updated = scheduler.parallel_map(0, source.columns(), |j| {
            let mut values = source.column(j);
            work(j, &mut values);
            values
        });
        for (j, values) in updated.into_iter().enumerate() {
            for (i, value) in values.into_iter().enumerate() {
                self.set_at(i, j, value);
            }
        }
    }
}
