use thiserror::Error;

/// Canonical error codes emitted by the kernel. The codes are stable so that
/// callers (and any binding layered on top) can branch on the failure kind
/// without parsing the human-readable part of the message.
pub mod codes {
    /// A required operand or result container was absent.
    pub const NULL_OPERAND: &str = "E_NULL_OPERAND";
    /// Operand or result shapes do not satisfy the operation's shape relation.
    pub const SHAPE_MISMATCH: &str = "E_SHAPE_MISMATCH";
    /// A scalar parameter violated a documented constraint.
    pub const INVALID_ARGUMENT: &str = "E_INVALID_ARGUMENT";
    /// The operation needs a decomposition and is not part of the arithmetic core.
    pub const NOT_IMPLEMENTED: &str = "E_NOT_IMPLEMENTED";
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KernelError {
    #[error("{}: {operand} must be supplied", codes::NULL_OPERAND)]
    NullOperand { operand: &'static str },

    #[error("{}: {op}: {message}", codes::SHAPE_MISMATCH)]
    DimensionMismatch { op: &'static str, message: String },

    #[error("{}: {op}: {message}", codes::INVALID_ARGUMENT)]
    InvalidArgument { op: &'static str, message: String },

    #[error("{}: {op} requires a matrix decomposition", codes::NOT_IMPLEMENTED)]
    NotImplemented { op: &'static str },
}

impl KernelError {
    pub fn code(&self) -> &'static str {
        match self {
            KernelError::NullOperand { .. } => codes::NULL_OPERAND,
            KernelError::DimensionMismatch { .. } => codes::SHAPE_MISMATCH,
            KernelError::InvalidArgument { .. } => codes::INVALID_ARGUMENT,
            KernelError::NotImplemented { .. } => codes::NOT_IMPLEMENTED,
        }
    }
}

pub type KernelResult<T> = Result<T, KernelError>;

/// Convenience constructor for shape mismatch style errors.
pub fn shape_mismatch(op: &'static str, message: impl AsRef<str>) -> KernelError {
    KernelError::DimensionMismatch {
        op,
        message: message.as_ref().to_string(),
    }
}

/// Convenience constructor for rejected scalar parameters.
pub fn invalid_argument(op: &'static str, message: impl AsRef<str>) -> KernelError {
    KernelError::InvalidArgument {
        op,
        message: message.as_ref().to_string(),
    }
}

pub fn null_operand(operand: &'static str) -> KernelError {
    KernelError::NullOperand { operand }
}

pub fn not_implemented(op: &'static str) -> KernelError {
    KernelError::NotImplemented { op }
}

/// Fails unless two `(rows, cols)` shapes are identical.
pub fn ensure_same_shape(
    op: &'static str,
    what: &str,
    expected: (usize, usize),
    actual: (usize, usize),
) -> KernelResult<()> {
    if expected != actual {
        return Err(shape_mismatch(
            op,
            format!(
                "{what} is {}x{}, expected {}x{}",
                actual.0, actual.1, expected.0, expected.1
            ),
        ));
    }
    Ok(())
}

pub fn ensure_same_length(
    op: &'static str,
    what: &str,
    expected: usize,
    actual: usize,
) -> KernelResult<()> {
    if expected != actual {
        return Err(shape_mismatch(
            op,
            format!("{what} has length {actual}, expected {expected}"),
        ));
    }
    Ok(())
}
