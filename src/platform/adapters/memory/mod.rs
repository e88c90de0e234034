//! Scripted in-memory adapters for tests and offline demos.

mod data;
mod management;
mod oauth;

pub use data::{DataCall, ScriptedConnector, ScriptedDataApi, undefined_function, undefined_table};
pub use management::ScriptedManagementApi;
pub use oauth::ScriptedOAuthExchange;
