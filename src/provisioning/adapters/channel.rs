//! Sink forwarding events over a `tokio` channel.

use tokio::sync::mpsc;
use tracing::debug;

use crate::provisioning::{domain::ProgressEvent, ports::ProgressSink};

/// Forwards events to an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelProgressSink {
    sender: mpsc::UnboundedSender<ProgressEvent>,
}

impl ChannelProgressSink {
    /// Creates a sink and the receiver its events arrive on.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: ProgressEvent) {
        if self.sender.send(event).is_err() {
            debug!("progress receiver dropped; discarding event");
        }
    }
}
