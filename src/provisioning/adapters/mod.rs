//! Progress sink implementations.

mod channel;
mod recording;
mod tracing_sink;

pub use channel::ChannelProgressSink;
pub use recording::RecordingProgressSink;
pub use tracing_sink::TracingProgressSink;
