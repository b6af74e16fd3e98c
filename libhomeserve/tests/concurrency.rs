//! Async actions interleave freely; the store never serializes them

mod common;

use std::time::Duration;

use common::{booking, drain, service, setup_store};
use libhomeserve::slices::{ChatAction, LocationAction};
use libhomeserve::types::{BookingStatus, Chat, ChatMessage, LocationSnapshot};
use libhomeserve::ActionError;

#[tokio::test]
async fn test_concurrent_fetches_last_settlement_wins() {
    let (store, mock) = setup_store();
    // First request settles last
    mock.respond_after(
        "GET /api/bookings",
        vec![booking("slow", BookingStatus::Pending)],
        Duration::from_millis(80),
    )
    .respond_after(
        "GET /api/bookings",
        vec![booking("fast", BookingStatus::Pending)],
        Duration::from_millis(5),
    );

    let (slow, fast) = futures::join!(store.fetch_bookings(), store.fetch_bookings());
    assert_eq!(slow.unwrap()[0].id, "slow");
    assert_eq!(fast.unwrap()[0].id, "fast");

    let state = store.state();
    let ids: Vec<String> = state.booking.bookings().into_iter().map(|b| b.id).collect();
    assert_eq!(ids, vec!["slow"]);
    assert!(!state.booking.status.loading);
    assert_eq!(mock.calls("GET /api/bookings"), 2);
}

#[tokio::test]
async fn test_late_failure_overwrites_earlier_success() {
    let (store, mock) = setup_store();
    mock.fail_after(
        "GET /api/services",
        ActionError::status(503),
        Duration::from_millis(60),
    )
    .respond_after(
        "GET /api/services",
        vec![service("s1", "cleaning")],
        Duration::from_millis(5),
    );

    let (failed, ok) = futures::join!(store.fetch_services(), store.fetch_services());
    assert!(failed.is_err());
    assert!(ok.is_ok());

    let state = store.state();
    assert_eq!(state.service.status.error, Some(ActionError::status(503)));
    // A failure leaves data alone
    assert_eq!(state.service.services.len(), 1);
}

#[tokio::test]
async fn test_other_actions_run_while_request_in_flight() {
    let (store, mock) = setup_store();
    mock.respond_after(
        "GET /api/bookings",
        vec![booking("b1", BookingStatus::Pending)],
        Duration::from_millis(50),
    );
    let mut rx = store.subscribe();

    let location = LocationSnapshot {
        latitude: 38.7,
        longitude: -9.1,
        address: Some("Lisboa".to_string()),
    };
    let chat = Chat {
        id: "c1".to_string(),
        booking_id: "b1".to_string(),
        participants: vec!["u1".to_string(), "p1".to_string()],
        messages: vec![],
        updated_at: None,
    };

    let fetch = store.fetch_bookings();
    let local = async {
        store.dispatch(LocationAction::SetUserLocation(location.clone()));
        store.dispatch(ChatAction::SetChats(vec![chat.clone()]));
        store.dispatch(ChatAction::OpenChat(chat.clone()));
        store.dispatch(ChatAction::AddMessage {
            chat_id: "c1".to_string(),
            message: ChatMessage::new("c1", "u1", "On my way?"),
        });
    };
    let (fetched, ()) = futures::join!(fetch, local);
    fetched.unwrap();

    let snapshots = drain(&mut rx);
    // requested, 4 local actions, succeeded
    assert_eq!(snapshots.len(), 6);
    assert!(snapshots[0].booking.status.loading);
    assert!(snapshots[4].booking.status.loading);
    assert!(!snapshots[5].booking.status.loading);

    let state = store.state();
    assert_eq!(state.location.user_location(), Some(&location));
    assert_eq!(state.location.user_location(), state.location.current_location());
    let active = state.chat.active_chat().unwrap();
    assert_eq!(active.messages.len(), 1);
    assert_eq!(state.chat.chats.first().map(|c| c.messages.len()), Some(1));
    assert_eq!(state.booking.bookings().len(), 1);
}
