//! Progress reporting port.

use crate::provisioning::domain::ProgressEvent;

/// Receives progress notifications from the provisioning flow.
///
/// Emission is fire-and-forget: a sink that cannot deliver an event drops
/// it rather than failing the flow.
pub trait ProgressSink: Send + Sync {
    /// Delivers one event.
    fn emit(&self, event: ProgressEvent);
}
