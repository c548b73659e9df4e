use std::ops::{Index, IndexMut};

use crate::error::{invalid_argument, shape_mismatch, KernelResult};
use crate::scheduler::Scheduler;
use crate::storage::{MatrixAccess, VectorAccess};

/// Dense matrix stored in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct DenseMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl DenseMatrix {
    /// Creates a zero-filled matrix. Shapes are not validated here; the
    /// checked constructors are [`DenseMatrix::from_vec`] and
    /// [`DenseMatrix::from_rows`].
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    pub fn identity(n: usize) -> Self {
        let mut matrix = Self::zeros(n, n);
        for i in 0..n {
            matrix[(i, i)] = 1.0;
        }
        matrix
    }

    pub fn from_vec(data: Vec<f64>, rows: usize, cols: usize) -> KernelResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(invalid_argument(
                "from_vec",
                "rows and cols must be greater than zero",
            ));
        }
        if data.len() != rows * cols {
            return Err(shape_mismatch(
                "from_vec",
                format!("{} values do not fill a {rows}x{cols} matrix", data.len()),
            ));
        }
        Ok(Self { rows, cols, data })
    }

    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> KernelResult<Self> {
        let cols = rows.first().map_or(0, |row| row.as_ref().len());
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(shape_mismatch(
                    "from_rows",
                    format!("row {index} has {} values, expected {cols}", row.len()),
                ));
            }
            data.extend_from_slice(row);
        }
        Self::from_vec(data, rows.len(), cols)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    pub fn row_slice(&self, row: usize) -> &[f64] {
        let start = row * self.cols;
        &self.data[start..start + self.cols]
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.rows).map(|i| self.row_slice(i).to_vec()).collect()
    }
}

impl Index<(usize, usize)> for DenseMatrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.data[row * self.cols + col]
    }
}

impl IndexMut<(usize, usize)> for DenseMatrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        &mut self.data[row * self.cols + col]
    }
}

impl MatrixAccess for DenseMatrix {
    type Vector = DenseVector;

    fn rows(&self) -> usize {
        self.rows
    }

    fn columns(&self) -> usize {
        self.cols
    }

    fn at(&self, row: usize, column: usize) -> f64 {
        self[(row, column)]
    }

    fn set_at(&mut self, row: usize, column: usize, value: f64) {
        self[(row, column)] = value;
    }

    fn create_matrix(&self, rows: usize, columns: usize) -> Self {
        Self::zeros(rows, columns)
    }

    fn create_vector(&self, length: usize) -> DenseVector {
        DenseVector::zeros(length)
    }

    fn row(&self, row: usize) -> Vec<f64> {
        self.row_slice(row).to_vec()
    }

    fn clear(&mut self) {
        self.data.fill(0.0);
    }

    fn copy_to(&self, target: &mut Self) -> KernelResult<()> {
        crate::error::ensure_same_shape("copy_to", "target", self.shape(), target.shape())?;
        target.data.copy_from_slice(&self.data);
        Ok(())
    }

    // Rows are contiguous, so each unit of work mutates its own slice.
    fn update_rows<S, F>(&mut self, scheduler: &S, work: F)
    where
        S: Scheduler,
        F: Fn(usize, &mut [f64]) + Send + Sync,
    {
        let cols = self.cols;
        scheduler.for_each_lane(&mut self.data, cols, work);
    }
}

/// Dense vector of `f64` values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DenseVector {
    data: Vec<f64>,
}

impl DenseVector {
    pub fn zeros(length: usize) -> Self {
        Self {
            data: vec![0.0; length],
        }
    }

    pub fn from_vec(data: Vec<f64>) -> Self {
        Self { data }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }
}

impl From<Vec<f64>> for DenseVector {
    fn from(data: Vec<f64>) -> Self {
        Self { data }
    }
}

impl Index<usize> for DenseVector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.data[index]
    }
}

impl IndexMut<usize> for DenseVector {
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        &mut self.data[index]
    }
}

impl VectorAccess for DenseVector {
    fn len(&self) -> usize {
        self.data.len()
    }

    fn get(&self, index: usize) -> f64 {
        self.data[index]
    }

    fn set(&mut self, index: usize, value: f64) {
        self.data[index] = value;
    }

    fn create_vector(&self, length: usize) -> Self {
        Self::zeros(length)
    }

    fn to_vec(&self) -> Vec<f64> {
        self.data.clone()
    }

    fn fill_with<S, F>(&mut self, scheduler: &S, work: F)
    where
        S: Scheduler,
        F: Fn(usize) -> f64 + Send + Sync,
    {
        scheduler.for_each_lane(&mut self.data, 1, |index, slot| slot[0] = work(index));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KernelError;
    use crate::scheduler::SequentialScheduler;

    #[test]
    fn constructors_validate_shape() {
        let err = DenseMatrix::from_vec(vec![], 0, 3).unwrap_err();
        assert!(matches!(err, KernelError::InvalidArgument { .. }));
        let err = DenseMatrix::from_vec(vec![1.0; 5], 2, 3).unwrap_err();
        assert!(matches!(err, KernelError::DimensionMismatch { .. }));
        let err = DenseMatrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, KernelError::DimensionMismatch { .. }));
    }

    #[test]
    fn row_major_indexing() {
        let m = DenseMatrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m.at(1, 0), 4.0);
        assert_eq!(m.row(1), vec![4.0, 5.0, 6.0]);
        assert_eq!(m.column(2), vec![3.0, 6.0]);
        assert_eq!(m.as_slice(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(m.to_rows(), vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
    }

    #[test]
    fn update_rows_sees_current_values() {
        let mut m = DenseMatrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
        m.update_rows(&SequentialScheduler, |i, row| {
            for value in row.iter_mut() {
                *value += i as f64;
            }
        });
        assert_eq!(m.as_slice(), &[1.0, 2.0, 4.0, 5.0]);
    }

    #[test]
    fn update_columns_uses_strided_default() {
        let mut m = DenseMatrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
        m.update_columns(&SequentialScheduler, |j, column| {
            for value in column.iter_mut() {
                *value *= (j + 1) as f64;
            }
        });
        assert_eq!(m.as_slice(), &[1.0, 4.0, 3.0, 8.0]);
    }

    #[test]
    fn transpose_and_sub_matrix() {
        let m = DenseMatrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
        let t = m.transpose();
        assert_eq!(t.to_rows(), vec![vec![1.0, 4.0], vec![2.0, 5.0], vec![3.0, 6.0]]);
        let block = m.sub_matrix(0, 2, 1, 2).unwrap();
        assert_eq!(block.to_rows(), vec![vec![2.0, 3.0], vec![5.0, 6.0]]);
        assert!(m.sub_matrix(1, 2, 0, 1).is_err());
    }

    #[test]
    fn set_sub_matrix_bounds() {
        let mut m = DenseMatrix::zeros(3, 3);
        let block = DenseMatrix::identity(2);
        m.set_sub_matrix(1, 1, &block).unwrap();
        assert_eq!(m.at(2, 2), 1.0);
        assert_eq!(m.at(0, 0), 0.0);
        assert!(m.set_sub_matrix(2, 2, &block).is_err());
    }

    #[test]
    fn copy_to_requires_matching_shape() {
        let m = DenseMatrix::identity(2);
        let mut same = DenseMatrix::zeros(2, 2);
        m.copy_to(&mut same).unwrap();
        assert_eq!(same, m);
        let mut wrong = DenseMatrix::zeros(3, 2);
        assert!(m.copy_to(&mut wrong).is_err());
    }

    #[test]
    fn vector_fill_and_norms() {
        let mut v = DenseVector::zeros(4);
        v.fill_with(&SequentialScheduler, |i| i as f64 - 1.0);
        assert_eq!(v.as_slice(), &[-1.0, 0.0, 1.0, 2.0]);
        assert_eq!(v.p_norm(1), 4.0);
        assert!((v.p_norm(2) - 6f64.sqrt()).abs() < 1e-12);
        assert!((v.p_norm(3) - 10f64.powf(1.0 / 3.0)).abs() < 1e-12);
    }

    #[test]
    fn high_order_norms_approach_the_largest_magnitude() {
        let v = DenseVector::from(vec![3.0, -4.0]);
        assert!((v.p_norm(1u32 << 31) - 4.0).abs() < 1e-9);
        assert!((v.p_norm(u32::MAX) - 4.0).abs() < 1e-9);
        assert!((v.p_norm(2000) - 4.0).abs() < 1e-9);
        assert_eq!(DenseVector::zeros(3).p_norm(1u32 << 31), 0.0);
    }

    #[test]
    fn columnless_matrix_still_has_rows() {
        let m = DenseMatrix::zeros(3, 0);
        assert_eq!(m.to_rows(), vec![Vec::<f64>::new(); 3]);
        assert!(DenseMatrix::zeros(0, 2).to_rows().is_empty());
    }
}
