//! Containers filled with samples drawn from a `rand` distribution.
//!
//! Sampling is sequential: the generator is stateful, and drawing in
//! row-major order keeps a seeded generator reproducible.

use rand::distributions::Distribution;
use rand::Rng;

use crate::error::{invalid_argument, KernelResult};
use crate::storage::{MatrixAccess, VectorAccess};

/// A `rows x columns` matrix of the same representation as `prototype`,
/// filled in row-major order from `distribution`.
pub fn random_matrix<M, D, R>(
    prototype: &M,
    rows: usize,
    columns: usize,
    distribution: &D,
    rng: &mut R,
) -> KernelResult<M>
where
    M: MatrixAccess,
    D: Distribution<f64>,
    R: Rng + ?Sized,
{
    if rows < 1 || columns < 1 {
        return Err(invalid_argument(
            "random_matrix",
            format!("rows and columns must be at least 1, got {rows}x{columns}"),
        ));
    }
    let mut result = prototype.create_matrix(rows, columns);
    for i in 0..rows {
        for j in 0..columns {
            result.set_at(i, j, distribution.sample(rng));
        }
    }
    Ok(result)
}

pub fn random_vector<V, D, R>(
    prototype: &V,
    length: usize,
    distribution: &D,
    rng: &mut R,
) -> KernelResult<V>
where
    V: VectorAccess,
    D: Distribution<f64>,
    R: Rng + ?Sized,
{
    if length < 1 {
        return Err(invalid_argument(
            "random_vector",
            "length must be at least 1",
        ));
    }
    let mut result = prototype.create_vector(length);
    for index in 0..length {
        result.set(index, distribution.sample(rng));
    }
    Ok(result)
}
