pub mod compose;
pub mod dense;
pub mod elementwise;
pub mod error;
pub mod interop;
pub mod kernel;
pub mod metrics;
pub mod pointwise;
pub mod precision;
pub mod product;
pub mod random;
pub mod reduce;
pub mod request;
pub mod scheduler;
pub mod sparse;
pub mod storage;
pub mod threading;
pub mod vector_ops;

pub use dense::{DenseMatrix, DenseVector};
pub use error::{KernelError, KernelResult};
pub use kernel::{DefaultScheduler, Kernel};
pub use metrics::CopyMetrics;
pub use random::{random_matrix, random_vector};
pub use request::{Operand, OperationKind, OperationRequest, Outcome};
#[cfg(feature = "parallel")]
pub use scheduler::RayonScheduler;
pub use scheduler::{Scheduler, SequentialScheduler};
pub use sparse::SparseMatrix;
pub use storage::{MatrixAccess, VectorAccess};
pub use threading::SchedulerConfig;

pub mod prelude {
    pub use crate::scheduler::Scheduler;
    pub use crate::storage::{MatrixAccess, VectorAccess};
}
