//! Port contracts for credential persistence.

pub mod store;

pub use store::{KeyValueResult, KeyValueStore, KeyValueStoreError};
