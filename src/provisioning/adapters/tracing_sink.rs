//! Sink writing progress to the log.

use tracing::{info, warn};

use crate::provisioning::{
    domain::{ProgressEvent, ProgressStage},
    ports::ProgressSink,
};

/// Logs every event at `info`, failures at `warn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgressSink;

impl ProgressSink for TracingProgressSink {
    fn emit(&self, event: ProgressEvent) {
        let status = event.status.as_ref().map(ToString::to_string);
        if event.stage == ProgressStage::Failed {
            warn!(stage = %event.stage, status = ?status, "{}", event.message);
        } else {
            info!(stage = %event.stage, status = ?status, "{}", event.message);
        }
    }
}
