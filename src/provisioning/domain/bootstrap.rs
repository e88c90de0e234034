//! Baseline schema applied after provisioning.

use serde::Serialize;

const BOOTSTRAP_SQL: &str = include_str!("../../../sql/bootstrap.sql");
const STEP_MARKER: &str = "-- step:";

/// One independently executed batch of bootstrap SQL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapStep {
    /// Step name from the marker line.
    pub name: String,
    /// SQL batch.
    pub sql: String,
}

/// Splits the bundled bootstrap script into its named steps.
///
/// Text before the first marker is ignored; steps with no SQL are dropped.
#[must_use]
pub fn bootstrap_steps() -> Vec<BootstrapStep> {
    split_steps(BOOTSTRAP_SQL)
}

pub(crate) fn split_steps(script: &str) -> Vec<BootstrapStep> {
    let mut steps = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;
    for line in script.lines() {
        if let Some(name) = line.trim().strip_prefix(STEP_MARKER) {
            if let Some(finished) = current.take() {
                steps.extend(finish_step(finished));
            }
            current = Some((name.trim().to_owned(), Vec::new()));
        } else if let Some((_, body)) = current.as_mut() {
            body.push(line);
        }
    }
    if let Some(finished) = current {
        steps.extend(finish_step(finished));
    }
    steps
}

fn finish_step((name, body): (String, Vec<&str>)) -> Option<BootstrapStep> {
    let sql = body.join("\n").trim().to_owned();
    (!sql.is_empty()).then_some(BootstrapStep { name, sql })
}

/// A bootstrap step that failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BootstrapFailure {
    /// Step name.
    pub step: String,
    /// Error reported by the platform.
    pub error: String,
}

/// Outcome of applying the bootstrap script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BootstrapReport {
    /// Steps that succeeded, in order.
    pub applied: Vec<String>,
    /// Steps that failed, in order.
    pub failed: Vec<BootstrapFailure>,
}

impl BootstrapReport {
    /// Returns `true` when every step succeeded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}
