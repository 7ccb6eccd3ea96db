//! Integration tests for link lifecycle and data flow
//!
//! These tests drive a full ConnectionManager against the scripted mock
//! device: state transitions, ordered message delivery, outbound commands
//! and teardown.

mod common;

use common::{MockDevice, RecordingSink, SinkEvent};
use serialink::{ConnectionManager, ConnectionState, LinkError, NoRetry, RetryPolicy};
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(2);

fn manager_with(
    device: &MockDevice,
    sink: &RecordingSink,
    policy: impl RetryPolicy + 'static,
) -> ConnectionManager {
    serialink::builder()
        .sink(sink.clone())
        .provider(device.clone())
        .retry_policy(policy)
        .poll_interval(Duration::from_millis(5))
        .build()
}

#[tokio::test]
async fn open_transitions_to_connected() {
    let device = MockDevice::new();
    let sink = RecordingSink::new();
    let manager = manager_with(&device, &sink, NoRetry);

    manager.open("mock0", 9600).await.unwrap();

    assert!(manager.is_connected());
    assert_eq!(manager.state(), ConnectionState::Connected);
    assert!(
        sink.wait_until(WAIT, |events| events.contains(&SinkEvent::Reconnected))
            .await,
        "connect event not delivered"
    );
    assert_eq!(device.opens(), 1);

    manager.close().await.unwrap();
}

#[tokio::test]
async fn decoded_messages_arrive_in_order() {
    let device = MockDevice::new();
    let sink = RecordingSink::new();
    let manager = manager_with(&device, &sink, NoRetry);

    manager.open("mock0", 9600).await.unwrap();
    device.feed(b"TEMP:23.5,HUM:60.0;ERROR;TEMP:19");

    assert!(
        sink.wait_until(WAIT, |events| {
            events.iter().filter(|e| matches!(e, SinkEvent::Data(_))).count() == 2
        })
        .await,
        "expected two decoded messages"
    );

    let data: Vec<String> = sink
        .events()
        .into_iter()
        .filter_map(|e| match e {
            SinkEvent::Data(text) => Some(text),
            _ => None,
        })
        .collect();
    assert_eq!(data, vec!["TEMP:23.5,HUM:60.0", "ERROR"]);

    // The trailing fragment completes once its delimiter arrives
    device.feed(b".0;");
    assert!(
        sink.wait_until(WAIT, |events| {
            events.contains(&SinkEvent::Data("TEMP:19.0".to_string()))
        })
        .await,
        "buffered fragment was not completed"
    );

    manager.close().await.unwrap();
}

#[tokio::test]
async fn messages_survive_arbitrary_chunking() {
    let device = MockDevice::new();
    let sink = RecordingSink::new();
    let manager = manager_with(&device, &sink, NoRetry);

    manager.open("mock0", 9600).await.unwrap();

    // Same stream as above, dribbled one byte at a time
    for &b in b"TEMP:23.5,HUM:60.0;ERROR;" {
        device.feed(&[b]);
    }

    assert!(
        sink.wait_until(WAIT, |events| {
            events.iter().filter(|e| matches!(e, SinkEvent::Data(_))).count() == 2
        })
        .await
    );
    let data: Vec<String> = sink
        .events()
        .into_iter()
        .filter_map(|e| match e {
            SinkEvent::Data(text) => Some(text),
            _ => None,
        })
        .collect();
    assert_eq!(data, vec!["TEMP:23.5,HUM:60.0", "ERROR"]);

    manager.close().await.unwrap();
}

#[tokio::test]
async fn send_writes_token_with_newline_terminator() {
    let device = MockDevice::new();
    let sink = RecordingSink::new();
    let manager = manager_with(&device, &sink, NoRetry);

    manager.open("mock0", 9600).await.unwrap();
    manager.send("ON").unwrap();

    assert!(
        device
            .wait_for_writes(WAIT, |writes| writes.contains(&b"ON\n".to_vec()))
            .await,
        "command was not written to the device"
    );
    assert_eq!(manager.metrics().commands_sent, 1);

    manager.close().await.unwrap();
}

#[tokio::test]
async fn send_on_closed_link_reports_not_connected() {
    let device = MockDevice::new();
    let sink = RecordingSink::new();
    let manager = manager_with(&device, &sink, NoRetry);

    // Never opened
    assert!(matches!(manager.send("ON"), Err(LinkError::NotConnected)));

    // Nothing must have been queued for a later session
    manager.open("mock0", 9600).await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(device.writes().is_empty());

    manager.close().await.unwrap();
}

#[tokio::test]
async fn duplicate_open_is_rejected() {
    let device = MockDevice::new();
    let sink = RecordingSink::new();
    let manager = manager_with(&device, &sink, NoRetry);

    manager.open("mock0", 9600).await.unwrap();
    let second = manager.open("mock0", 9600).await;

    assert!(matches!(second, Err(LinkError::InvalidState(_))));
    assert_eq!(device.opens(), 1);

    manager.close().await.unwrap();
}

#[tokio::test]
async fn close_is_idempotent() {
    let device = MockDevice::new();
    let sink = RecordingSink::new();
    let manager = manager_with(&device, &sink, NoRetry);

    manager.open("mock0", 9600).await.unwrap();

    manager.close().await.unwrap();
    manager.close().await.unwrap();

    assert_eq!(manager.state(), ConnectionState::Disconnected);
    assert!(!manager.is_connected());

    // A closed manager is terminal
    assert!(matches!(
        manager.open("mock0", 9600).await,
        Err(LinkError::InvalidState(_))
    ));
}

#[tokio::test]
async fn close_without_open_succeeds() {
    let device = MockDevice::new();
    let sink = RecordingSink::new();
    let manager = manager_with(&device, &sink, NoRetry);

    manager.close().await.unwrap();
    assert_eq!(manager.state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn link_loss_emits_disconnected_before_anything_else() {
    let device = MockDevice::new();
    let sink = RecordingSink::new();
    let manager = manager_with(&device, &sink, NoRetry);

    manager.open("mock0", 9600).await.unwrap();
    device.feed(b"TEMP:20.0,HUM:50.0;");
    assert!(
        sink.wait_until(WAIT, |events| {
            events.iter().any(|e| matches!(e, SinkEvent::Data(_)))
        })
        .await
    );

    device.drop_link();

    assert!(
        sink.wait_until(WAIT, |events| events.contains(&SinkEvent::Disconnected))
            .await,
        "link loss not reported"
    );

    let events = sink.events();
    let disconnect_pos = events
        .iter()
        .position(|e| *e == SinkEvent::Disconnected)
        .unwrap();
    // With NoRetry the loss is followed only by the exhaustion report
    for later in &events[disconnect_pos + 1..] {
        assert!(matches!(later, SinkEvent::Exhausted { .. }));
    }

    manager.close().await.unwrap();
}

#[tokio::test]
async fn dead_handle_is_detected() {
    let device = MockDevice::new();
    let sink = RecordingSink::new();
    let manager = manager_with(&device, &sink, NoRetry);

    manager.open("mock0", 9600).await.unwrap();
    device.mark_closed();

    assert!(
        sink.wait_until(WAIT, |events| events.contains(&SinkEvent::Disconnected))
            .await,
        "closed handle not detected"
    );

    manager.close().await.unwrap();
}

#[tokio::test]
async fn device_enumeration_passes_through() {
    let device = MockDevice::new();
    let sink = RecordingSink::new();
    let manager = manager_with(&device, &sink, NoRetry);

    let devices = manager.list_devices().unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].name, "mock0");

    manager.close().await.unwrap();
}
