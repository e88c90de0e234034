//! Database access for the coding assistant.
//!
//! Renders the database context block injected into the assistant's
//! prompt and dispatches the JSON actions the assistant may send back.

mod context;
mod domain;
mod service;

pub use context::ContextBuilder;
pub use domain::{ACTION_INSTRUCTIONS, AssistantContext, DatabaseActionRequest, SUPPORTED_ACTIONS};
pub use service::{AssistantError, AssistantResult, DatabaseAssistant};

#[cfg(test)]
mod tests;
