//! Dynamic dispatch over the kernel's matrix operations.
//!
//! A request names an operation and carries optional operand and result
//! slots, which is how absent operands surface as
//! [`KernelError::NullOperand`](crate::error::KernelError::NullOperand).
//! Requests built with [`OperationRequest::into_result`] must carry a result
//! container; the filled container comes back in the [`Outcome`].

use crate::error::{invalid_argument, null_operand, KernelResult};
use crate::kernel::Kernel;
use crate::scheduler::Scheduler;
use crate::storage::MatrixAccess;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OperationKind {
    Add,
    Subtract,
    Negate,
    Plus,
    Scale { scalar: f64 },
    MultiplyVector,
    LeftMultiplyVector,
    Multiply,
    PointwiseMultiply,
    PointwiseAdd,
    PointwiseSubtract,
    PointwiseDivide,
    Append,
    Stack,
    DiagonalStack,
    Kronecker,
    Transpose,
    Trace,
    NormalizeColumns { p: u32 },
    NormalizeRows { p: u32 },
    Determinant,
    ConditionNumber,
    Rank,
}

impl OperationKind {
    pub fn name(&self) -> &'static str {
        match self {
            OperationKind::Add => "add",
            OperationKind::Subtract => "subtract",
            OperationKind::Negate => "negate",
            OperationKind::Plus => "plus",
            OperationKind::Scale { .. } => "scale",
            OperationKind::MultiplyVector => "multiply_vector",
            OperationKind::LeftMultiplyVector => "left_multiply_vector",
            OperationKind::Multiply => "multiply",
            OperationKind::PointwiseMultiply => "pointwise_multiply",
            OperationKind::PointwiseAdd => "pointwise_add",
            OperationKind::PointwiseSubtract => "pointwise_subtract",
            OperationKind::PointwiseDivide => "pointwise_divide",
            OperationKind::Append => "append",
            OperationKind::Stack => "stack",
            OperationKind::DiagonalStack => "diagonal_stack",
            OperationKind::Kronecker => "kronecker",
            OperationKind::Transpose => "transpose",
            OperationKind::Trace => "trace",
            OperationKind::NormalizeColumns { .. } => "normalize_columns",
            OperationKind::NormalizeRows { .. } => "normalize_rows",
            OperationKind::Determinant => "determinant",
            OperationKind::ConditionNumber => "condition_number",
            OperationKind::Rank => "rank",
        }
    }

    /// Whether the operation reads a second operand.
    pub fn is_binary(&self) -> bool {
        matches!(
            self,
            OperationKind::Add
                | OperationKind::Subtract
                | OperationKind::MultiplyVector
                | OperationKind::LeftMultiplyVector
                | OperationKind::Multiply
                | OperationKind::PointwiseMultiply
                | OperationKind::PointwiseAdd
                | OperationKind::PointwiseSubtract
                | OperationKind::PointwiseDivide
                | OperationKind::Append
                | OperationKind::Stack
                | OperationKind::DiagonalStack
                | OperationKind::Kronecker
        )
    }
}

#[derive(Clone, Debug)]
pub enum Operand<M: MatrixAccess> {
    Matrix(M),
    Vector(M::Vector),
}

#[derive(Clone, Debug)]
pub enum Outcome<M: MatrixAccess> {
    Matrix(M),
    Vector(M::Vector),
    Scalar(f64),
    Count(usize),
}

impl<M: MatrixAccess> Outcome<M> {
    pub fn into_matrix(self) -> Option<M> {
        match self {
            Outcome::Matrix(matrix) => Some(matrix),
            _ => None,
        }
    }

    pub fn into_vector(self) -> Option<M::Vector> {
        match self {
            Outcome::Vector(vector) => Some(vector),
            _ => None,
        }
    }

    pub fn scalar(&self) -> Option<f64> {
        match self {
            Outcome::Scalar(value) => Some(*value),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct OperationRequest<M: MatrixAccess> {
    kind: OperationKind,
    left: Option<Operand<M>>,
    right: Option<Operand<M>>,
    result: Option<Operand<M>>,
    requires_result: bool,
}

impl<M: MatrixAccess> OperationRequest<M> {
    /// A request for the allocating form; a supplied result slot is still
    /// honoured.
    pub fn new(kind: OperationKind) -> Self {
        Self {
            kind,
            left: None,
            right: None,
            result: None,
            requires_result: false,
        }
    }

    /// A request for the result-writing form.
    pub fn into_result(kind: OperationKind) -> Self {
        Self {
            requires_result: true,
            ..Self::new(kind)
        }
    }

    pub fn left(mut self, operand: Operand<M>) -> Self {
        self.left = Some(operand);
        self
    }

    pub fn right(mut self, operand: Operand<M>) -> Self {
        self.right = Some(operand);
        self
    }

    pub fn result(mut self, operand: Operand<M>) -> Self {
        self.result = Some(operand);
        self
    }

    pub fn left_matrix(self, matrix: M) -> Self {
        self.left(Operand::Matrix(matrix))
    }

    pub fn right_matrix(self, matrix: M) -> Self {
        self.right(Operand::Matrix(matrix))
    }

    pub fn result_matrix(self, matrix: M) -> Self {
        self.result(Operand::Matrix(matrix))
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }
}

impl<S: Scheduler> Kernel<S> {
    /// Runs one request. Slots are checked in order `left`, `right`,
    /// `result` before any operand kind or shape is looked at.
    pub fn execute<M: MatrixAccess>(
        &self,
        request: OperationRequest<M>,
    ) -> KernelResult<Outcome<M>> {
        let OperationRequest {
            kind,
            left,
            right,
            result,
            requires_result,
        } = request;
        let op = kind.name();
        let left = left.ok_or_else(|| null_operand("left"))?;
        let right = if kind.is_binary() {
            Some(right.ok_or_else(|| null_operand("right"))?)
        } else {
            None
        };
        if requires_result && result.is_none() {
            return Err(null_operand("result"));
        }
        tracing::trace!(op, with_result = result.is_some(), "executing request");

        match kind {
            OperationKind::MultiplyVector => {
                let matrix = expect_matrix(op, "left", left)?;
                let vector = expect_vector(op, "right", right)?;
                match result {
                    Some(target) => {
                        let mut target = expect_vector(op, "result", Some(target))?;
                        self.multiply_vector_into(&matrix, &vector, &mut target)?;
                        Ok(Outcome::Vector(target))
                    }
                    None => Ok(Outcome::Vector(self.multiply_vector(&matrix, &vector)?)),
                }
            }
            OperationKind::LeftMultiplyVector => {
                let vector = expect_vector(op, "left", Some(left))?;
                let matrix = right.ok_or_else(|| null_operand("right"))?;
                let matrix = expect_matrix(op, "right", matrix)?;
                match result {
                    Some(target) => {
                        let mut target = expect_vector(op, "result", Some(target))?;
                        self.left_multiply_vector_into(&vector, &matrix, &mut target)?;
                        Ok(Outcome::Vector(target))
                    }
                    None => Ok(Outcome::Vector(self.left_multiply_vector(&vector, &matrix)?)),
                }
            }
            OperationKind::Trace
            | OperationKind::Determinant
            | OperationKind::ConditionNumber
            | OperationKind::Rank => {
                if result.is_some() {
                    return Err(invalid_argument(op, "returns a scalar, not a container"));
                }
                let matrix = expect_matrix(op, "left", left)?;
                match kind {
                    OperationKind::Trace => Ok(Outcome::Scalar(self.trace(&matrix)?)),
                    OperationKind::Determinant => Ok(Outcome::Scalar(self.determinant(&matrix)?)),
                    OperationKind::ConditionNumber => {
                        Ok(Outcome::Scalar(self.condition_number(&matrix)?))
                    }
                    _ => Ok(Outcome::Count(self.rank(&matrix)?)),
                }
            }
            _ => {
                let left = expect_matrix(op, "left", left)?;
                let right = match right {
                    Some(operand) => Some(expect_matrix(op, "right", operand)?),
                    None => None,
                };
                let result = match result {
                    Some(operand) => Some(expect_matrix(op, "result", operand)?),
                    None => None,
                };
                self.execute_matrix(kind, left, right, result).map(Outcome::Matrix)
            }
        }
    }

    fn execute_matrix<M: MatrixAccess>(
        &self,
        kind: OperationKind,
        mut left: M,
        right: Option<M>,
        result: Option<M>,
    ) -> KernelResult<M> {
        let op = kind.name();
        let other = || right.as_ref().ok_or_else(|| null_operand("right"));
        let Some(mut target) = result else {
            return match kind {
                OperationKind::Add => {
                    self.add_assign(&mut left, other()?)?;
                    Ok(left)
                }
                OperationKind::Subtract => {
                    self.subtract_assign(&mut left, other()?)?;
                    Ok(left)
                }
                OperationKind::Negate => {
                    self.negate_assign(&mut left);
                    Ok(left)
                }
                OperationKind::Scale { scalar } => {
                    self.scale_assign(&mut left, scalar);
                    Ok(left)
                }
                OperationKind::Plus => Ok(left),
                OperationKind::Multiply => self.multiply(&left, other()?),
                OperationKind::PointwiseMultiply => self.pointwise_multiply(&left, other()?),
                OperationKind::PointwiseAdd => self.pointwise_add(&left, other()?),
                OperationKind::PointwiseSubtract => self.pointwise_subtract(&left, other()?),
                OperationKind::PointwiseDivide => self.pointwise_divide(&left, other()?),
                OperationKind::Append => self.append(&left, other()?),
                OperationKind::Stack => self.stack(&left, other()?),
                OperationKind::DiagonalStack => self.diagonal_stack(&left, other()?),
                OperationKind::Kronecker => self.kronecker(&left, other()?),
                OperationKind::Transpose => Ok(left.transpose()),
                OperationKind::NormalizeColumns { p } => self.normalize_columns(&left, p),
                OperationKind::NormalizeRows { p } => self.normalize_rows(&left, p),
                _ => Err(invalid_argument(op, "not a matrix-valued operation")),
            };
        };
        match kind {
            OperationKind::Add => self.add_into(&left, other()?, &mut target)?,
            OperationKind::Subtract => self.subtract_into(&left, other()?, &mut target)?,
            OperationKind::Negate => self.negate_into(&left, &mut target)?,
            OperationKind::Scale { scalar } => self.scale_into(&left, scalar, &mut target)?,
            OperationKind::Plus => left.copy_to(&mut target)?,
            OperationKind::Multiply => self.multiply_into(&left, other()?, &mut target)?,
            OperationKind::PointwiseMultiply => {
                self.pointwise_multiply_into(&left, other()?, &mut target)?
            }
            OperationKind::PointwiseAdd => self.pointwise_add_into(&left, other()?, &mut target)?,
            OperationKind::PointwiseSubtract => {
                self.pointwise_subtract_into(&left, other()?, &mut target)?
            }
            OperationKind::PointwiseDivide => {
                self.pointwise_divide_into(&left, other()?, &mut target)?
            }
            OperationKind::Append => self.append_into(&left, other()?, &mut target)?,
            OperationKind::Stack => self.stack_into(&left, other()?, &mut target)?,
            OperationKind::DiagonalStack => {
                self.diagonal_stack_into(&left, other()?, &mut target)?
            }
            OperationKind::Kronecker => self.kronecker_into(&left, other()?, &mut target)?,
            OperationKind::Transpose => left.transpose().copy_to(&mut target)?,
            OperationKind::NormalizeColumns { p } => {
                self.normalize_columns(&left, p)?.copy_to(&mut target)?
            }
            OperationKind::NormalizeRows { p } => {
                self.normalize_rows(&left, p)?.copy_to(&mut target)?
            }
            _ => return Err(invalid_argument(op, "not a matrix-valued operation")),
        }
        Ok(target)
    }
}

fn expect_matrix<M: MatrixAccess>(
    op: &'static str,
    slot: &str,
    operand: Operand<M>,
) -> KernelResult<M> {
    match operand {
        Operand::Matrix(matrix) => Ok(matrix),
        Operand::Vector(_) => Err(invalid_argument(
            op,
            format!("{slot} must be a matrix, got a vector"),
        )),
    }
}

fn expect_vector<M: MatrixAccess>(
    op: &'static str,
    slot: &'static str,
    operand: Option<Operand<M>>,
) -> KernelResult<M::Vector> {
    match operand {
        Some(Operand::Vector(vector)) => Ok(vector),
        Some(Operand::Matrix(_)) => Err(invalid_argument(
            op,
            format!("{slot} must be a vector, got a matrix"),
        )),
        None => Err(null_operand(slot)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dense::{DenseMatrix, DenseVector};
    use crate::error::KernelError;
    use crate::scheduler::SequentialScheduler;

    fn kernel() -> Kernel<SequentialScheduler> {
        Kernel::new(SequentialScheduler)
    }

    #[test]
    fn missing_operands_are_named() {
        let k = kernel();
        for kind in [
            OperationKind::Add,
            OperationKind::PointwiseMultiply,
            OperationKind::Multiply,
        ] {
            let request =
                OperationRequest::<DenseMatrix>::new(kind).right_matrix(DenseMatrix::identity(2));
            let err = k.execute(request).unwrap_err();
            assert_eq!(err, KernelError::NullOperand { operand: "left" });

            let err = k
                .execute(OperationRequest::new(kind).left_matrix(DenseMatrix::identity(2)))
                .unwrap_err();
            assert_eq!(err, KernelError::NullOperand { operand: "right" });

            let err = k
                .execute(
                    OperationRequest::into_result(kind)
                        .left_matrix(DenseMatrix::identity(2))
                        .right_matrix(DenseMatrix::identity(2)),
                )
                .unwrap_err();
            assert_eq!(err, KernelError::NullOperand { operand: "result" });
        }
    }

    #[test]
    fn add_mutates_and_returns_left() {
        let k = kernel();
        let left = DenseMatrix::from_rows(&[[1.0, 2.0]]).unwrap();
        let right = DenseMatrix::from_rows(&[[0.5, 0.5]]).unwrap();
        let sum = k
            .execute(
                OperationRequest::new(OperationKind::Add)
                    .left_matrix(left)
                    .right_matrix(right),
            )
            .unwrap()
            .into_matrix()
            .unwrap();
        assert_eq!(sum.as_slice(), &[1.5, 2.5]);
    }

    #[test]
    fn result_slot_receives_the_output() {
        let k = kernel();
        let outcome = k
            .execute(
                OperationRequest::into_result(OperationKind::Kronecker)
                    .left_matrix(DenseMatrix::from_rows(&[[1.0, 2.0]]).unwrap())
                    .right_matrix(DenseMatrix::identity(2))
                    .result_matrix(DenseMatrix::filled(2, 4, 7.0)),
            )
            .unwrap();
        let product = outcome.into_matrix().unwrap();
        assert_eq!(
            product.to_rows(),
            vec![vec![1.0, 0.0, 2.0, 0.0], vec![0.0, 1.0, 0.0, 2.0]]
        );
    }

    #[test]
    fn shape_errors_pass_through() {
        let k = kernel();
        let err = k
            .execute(
                OperationRequest::new(OperationKind::Add)
                    .left_matrix(DenseMatrix::zeros(2, 2))
                    .right_matrix(DenseMatrix::zeros(2, 3)),
            )
            .unwrap_err();
        assert!(matches!(err, KernelError::DimensionMismatch { op: "add", .. }));
    }

    #[test]
    fn vector_products_and_operand_kinds() {
        let k = kernel();
        let a = DenseMatrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
        let v = DenseVector::from(vec![1.0, 0.0, -1.0]);
        let outcome = k
            .execute(
                OperationRequest::new(OperationKind::MultiplyVector)
                    .left_matrix(a.clone())
                    .right(Operand::Vector(v)),
            )
            .unwrap();
        assert_eq!(outcome.into_vector().unwrap().as_slice(), &[-2.0, -2.0]);

        let err = k
            .execute(
                OperationRequest::new(OperationKind::MultiplyVector)
                    .left_matrix(a.clone())
                    .right_matrix(a),
            )
            .unwrap_err();
        assert!(matches!(err, KernelError::InvalidArgument { .. }));
    }

    #[test]
    fn scalar_queries() {
        let k = kernel();
        let request =
            OperationRequest::new(OperationKind::Trace).left_matrix(DenseMatrix::identity(3));
        let trace = k.execute(request).unwrap();
        assert_eq!(trace.scalar(), Some(3.0));
        let request =
            OperationRequest::new(OperationKind::Rank).left_matrix(DenseMatrix::identity(3));
        let err = k.execute(request).unwrap_err();
        assert_eq!(err.code(), "E_NOT_IMPLEMENTED");
    }
}
