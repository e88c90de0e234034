//! Operation dispatch.

mod executor;

pub use executor::{EXEC_SQL_FUNCTION, ExecutorError, ExecutorResult, OperationExecutor};
