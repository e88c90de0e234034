//! Unit tests for progress sinks and the backoff helper.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use crate::platform::domain::ProjectStatus;
use crate::provisioning::{
    adapters::{ChannelProgressSink, RecordingProgressSink, TracingProgressSink},
    domain::{BackoffPolicy, ProgressEvent, ProgressStage},
    ports::ProgressSink,
    services::retry_with_backoff,
};
use rstest::rstest;

fn quick_backoff(max_retries: u32) -> BackoffPolicy {
    BackoffPolicy {
        initial_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(2),
        max_retries,
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn channel_sink_forwards_events_in_order() {
    let (sink, mut receiver) = ChannelProgressSink::channel();

    sink.emit(ProgressEvent::new(ProgressStage::Creating, "Creating project demo"));
    sink.emit(ProgressEvent::status_changed(&ProjectStatus::ComingUp));

    let first = receiver.recv().await.expect("first event");
    let second = receiver.recv().await.expect("second event");
    assert_eq!(first.stage, ProgressStage::Creating);
    assert_eq!(second.status, Some(ProjectStatus::ComingUp));
}

#[rstest]
fn channel_sink_tolerates_dropped_receiver() {
    let (sink, receiver) = ChannelProgressSink::channel();
    drop(receiver);

    sink.emit(ProgressEvent::new(ProgressStage::Ready, "Project is ready"));
}

#[rstest]
fn recording_and_tracing_sinks_accept_events() {
    let recorder = RecordingProgressSink::new();
    let sinks: [&dyn ProgressSink; 2] = [&recorder, &TracingProgressSink];

    for sink in sinks {
        sink.emit(ProgressEvent::new(ProgressStage::Failed, "boom"));
    }

    assert_eq!(recorder.messages(), vec!["boom".to_owned()]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn backoff_retries_until_success() {
    let calls = AtomicU32::new(0);
    let counter = &calls;

    let result: Result<u32, String> = retry_with_backoff(
        &quick_backoff(3),
        move || async move {
            let attempt = counter.fetch_add(1, Ordering::SeqCst);
            if attempt < 2 {
                Err(format!("attempt {attempt} failed"))
            } else {
                Ok(attempt)
            }
        },
        |_| true,
    )
    .await;

    assert_eq!(result, Ok(2));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn backoff_gives_up_after_max_retries() {
    let calls = AtomicU32::new(0);
    let counter = &calls;

    let result: Result<(), String> = retry_with_backoff(
        &quick_backoff(2),
        move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err("still down".to_owned())
        },
        |_| true,
    )
    .await;

    assert_eq!(result, Err("still down".to_owned()));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn backoff_stops_on_permanent_errors() {
    let calls = AtomicU32::new(0);
    let counter = &calls;

    let result: Result<(), String> = retry_with_backoff(
        &quick_backoff(5),
        move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err("unauthorised".to_owned())
        },
        |err: &String| err != "unauthorised",
    )
    .await;

    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
