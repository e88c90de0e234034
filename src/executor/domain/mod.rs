//! Domain model for database operations.

mod operation;
mod outcome;
mod sanitizer;
mod table;

pub use operation::{DatabaseOperation, OperationError, PreparedOperation};
pub use outcome::ExecutionOutcome;
pub use sanitizer::{DENYLIST, ForbiddenQuery, SqlSanitizer};
pub use table::{
    ColumnDefinition, TableDefinition, TableSqlError, generate_table_sql, parse_create_table,
};
