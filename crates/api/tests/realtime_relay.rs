//! Tests for delivery of bus events to socket connections.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::Message;
use serde_json::json;
use solesync_api::realtime::RealtimeRelay;
use solesync_api::ws::WsManager;
use solesync_core::realtime::{ChangeEvent, ServerMessage};
use solesync_events::collection::{APPOINTMENTS, DATES};
use solesync_events::{EventBus, FeedEvent};
use tokio::sync::mpsc::UnboundedReceiver;

async fn next_frame(rx: &mut UnboundedReceiver<Message>) -> ServerMessage {
    let message = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("frame should arrive")
        .expect("channel open");
    match message {
        Message::Text(body) => serde_json::from_str(body.as_str()).unwrap(),
        other => panic!("expected text frame, got {other:?}"),
    }
}

#[tokio::test]
async fn unscoped_events_are_broadcast_without_room() {
    let manager = Arc::new(WsManager::new());
    let mut rx = manager.add("conn-1".to_string()).await;
    let bus = EventBus::default();
    let relay = tokio::spawn(RealtimeRelay::new(Arc::clone(&manager)).run(bus.subscribe()));

    bus.publish(FeedEvent::new(
        APPOINTMENTS,
        ChangeEvent::insert("APPT-1", json!({"appointment_id": "APPT-1", "status": "Pending"})),
    ));

    let frame = next_frame(&mut rx).await;
    assert_eq!(frame.event, "appointmentUpdated");
    assert_eq!(frame.room, None);
    assert_eq!(frame.data.document_key.id, "APPT-1");

    drop(bus);
    relay.await.unwrap();
}

#[tokio::test]
async fn room_members_receive_tagged_copy_only() {
    let manager = Arc::new(WsManager::new());
    let mut member = manager.add("member".to_string()).await;
    let mut other = manager.add("other".to_string()).await;
    manager.join("member", "LI-7").await;

    let bus = EventBus::default();
    let relay = tokio::spawn(RealtimeRelay::new(Arc::clone(&manager)).run(bus.subscribe()));

    bus.publish(FeedEvent::new(DATES, ChangeEvent::delete("LI-7")));

    let scoped = next_frame(&mut member).await;
    assert_eq!(scoped.event, "datesUpdated");
    assert_eq!(scoped.room.as_deref(), Some("LI-7"));

    let plain = next_frame(&mut other).await;
    assert_eq!(plain.room, None);

    drop(bus);
    relay.await.unwrap();

    assert!(member.try_recv().is_err());
    assert!(other.try_recv().is_err());
}
