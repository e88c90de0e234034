//! Schema introspection with a read-through cache.
//!
//! Tables and columns are read through helper procedures installed by the
//! bootstrap script, falling back to the information schema. A database
//! without either answers with an empty schema rather than an error.

mod domain;
mod service;

pub use domain::{ColumnInfo, DatabaseStats, SchemaInfo, SchemaSnapshot};
pub use service::{DEFAULT_CACHE_TTL, SchemaError, SchemaInspector, SchemaResult};

#[cfg(test)]
mod tests;
