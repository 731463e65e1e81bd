use std::sync::Arc;

use tokio::sync::broadcast::error::TryRecvError;

use taskops_chat::domain::rooms::{ChatRooms, RoomEvent};
use taskops_chat::domain::types::{ClosedReason, ParticipantRole};
use taskops_chat::usecase::chat::{JoinChatUseCase, JoinOutcome, PostMessageUseCase, PostOutcome};

use crate::helpers::{MockParticipantStore, join_input, message_input};

fn two_party_store() -> MockParticipantStore {
    MockParticipantStore::new()
        .with_participant(42, 1, ParticipantRole::Customer)
        .with_participant(42, 2, ParticipantRole::Employee)
}

#[tokio::test]
async fn should_deliver_messages_to_both_participants() {
    // Scenario: customer and employee join an empty room, customer says hello.
    let rooms = Arc::new(ChatRooms::new());
    let store = two_party_store();

    let join = JoinChatUseCase {
        store: store.clone(),
        rooms: Arc::clone(&rooms),
    };
    let JoinOutcome::Joined {
        history,
        events: mut customer_rx,
        ..
    } = join.execute(join_input(42, 1, "customer", "Cara")).await
    else {
        panic!("customer join should be admitted");
    };
    assert!(history.is_empty());

    let join = JoinChatUseCase {
        store: store.clone(),
        rooms: Arc::clone(&rooms),
    };
    let JoinOutcome::Joined {
        history,
        events: mut employee_rx,
        ..
    } = join.execute(join_input(42, 2, "employee", "Evan")).await
    else {
        panic!("employee join should be admitted");
    };
    assert!(history.is_empty());

    let post = PostMessageUseCase {
        store: store.clone(),
        rooms: Arc::clone(&rooms),
    };
    let outcome = post
        .execute(message_input(42, "hello", 1, "customer", "Cara"))
        .await;
    assert!(matches!(outcome, PostOutcome::Posted));

    for rx in [&mut customer_rx, &mut employee_rx] {
        match rx.recv().await.unwrap() {
            RoomEvent::Message(msg) => {
                assert_eq!(msg.text, "hello");
                assert_eq!(msg.sender_type, ParticipantRole::Customer);
                assert_eq!(msg.sender_id, 1);
            }
            other => panic!("expected message event, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn should_replay_history_to_late_joiner() {
    let rooms = Arc::new(ChatRooms::new());
    let store = two_party_store();

    let join = JoinChatUseCase {
        store: store.clone(),
        rooms: Arc::clone(&rooms),
    };
    let JoinOutcome::Joined { .. } = join.execute(join_input(42, 1, "customer", "Cara")).await
    else {
        panic!("customer join should be admitted");
    };

    let post = PostMessageUseCase {
        store: store.clone(),
        rooms: Arc::clone(&rooms),
    };
    post.execute(message_input(42, "anyone there?", 1, "customer", "Cara"))
        .await;

    let join = JoinChatUseCase {
        store: store.clone(),
        rooms: Arc::clone(&rooms),
    };
    let JoinOutcome::Joined { history, .. } =
        join.execute(join_input(42, 2, "employee", "Evan")).await
    else {
        panic!("employee join should be admitted");
    };
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].text, "anyone there?");
}

#[tokio::test]
async fn should_lock_out_room_when_request_completes_mid_conversation() {
    // Scenario: request 42 turns Completed after both sides joined; the next
    // message is dropped and every subscriber sees chatClosed{completed}.
    let rooms = Arc::new(ChatRooms::new());
    let store = two_party_store();

    let join = JoinChatUseCase {
        store: store.clone(),
        rooms: Arc::clone(&rooms),
    };
    let JoinOutcome::Joined {
        events: mut customer_rx,
        ..
    } = join.execute(join_input(42, 1, "customer", "Cara")).await
    else {
        panic!("customer join should be admitted");
    };
    let join = JoinChatUseCase {
        store: store.clone(),
        rooms: Arc::clone(&rooms),
    };
    let JoinOutcome::Joined {
        events: mut employee_rx,
        ..
    } = join.execute(join_input(42, 2, "employee", "Evan")).await
    else {
        panic!("employee join should be admitted");
    };

    store.completed_handle().lock().unwrap().insert(42);

    let post = PostMessageUseCase {
        store: store.clone(),
        rooms: Arc::clone(&rooms),
    };
    let outcome = post
        .execute(message_input(42, "all done", 2, "employee", "Evan"))
        .await;
    assert!(matches!(outcome, PostOutcome::RoomClosed));

    // No message event was broadcast and the log is unchanged.
    assert!(rooms.history(42).is_empty());
    for rx in [&mut customer_rx, &mut employee_rx] {
        match rx.recv().await.unwrap() {
            RoomEvent::Closed { reason } => assert_eq!(reason, ClosedReason::Completed),
            other => panic!("expected closed event, got {other:?}"),
        }
    }

    // Joins are rejected from now on too, even for prior participants.
    let join = JoinChatUseCase {
        store: store.clone(),
        rooms: Arc::clone(&rooms),
    };
    let outcome = join.execute(join_input(42, 1, "customer", "Cara")).await;
    assert!(matches!(
        outcome,
        JoinOutcome::Refused(ClosedReason::Completed)
    ));
}

#[tokio::test]
async fn should_refuse_join_for_stranger_without_subscribing() {
    // Scenario: user 9 claims to be the customer of request 42 but is not.
    let rooms = Arc::new(ChatRooms::new());
    let store = two_party_store();

    let join = JoinChatUseCase {
        store: store.clone(),
        rooms: Arc::clone(&rooms),
    };
    let outcome = join.execute(join_input(42, 9, "customer", "Mallory")).await;
    assert!(matches!(
        outcome,
        JoinOutcome::Refused(ClosedReason::Unauthorized)
    ));

    // The refusal handed out no receiver, so later room traffic cannot reach
    // the stranger; a legitimate participant still receives it.
    let join = JoinChatUseCase {
        store: store.clone(),
        rooms: Arc::clone(&rooms),
    };
    let JoinOutcome::Joined {
        events: mut customer_rx,
        ..
    } = join.execute(join_input(42, 1, "customer", "Cara")).await
    else {
        panic!("customer join should be admitted");
    };
    let post = PostMessageUseCase {
        store: store.clone(),
        rooms: Arc::clone(&rooms),
    };
    post.execute(message_input(42, "private", 1, "customer", "Cara"))
        .await;
    assert!(matches!(
        customer_rx.recv().await.unwrap(),
        RoomEvent::Message(_)
    ));
}

#[tokio::test]
async fn should_refuse_message_from_stranger_without_touching_room() {
    let rooms = Arc::new(ChatRooms::new());
    let store = two_party_store();

    let join = JoinChatUseCase {
        store: store.clone(),
        rooms: Arc::clone(&rooms),
    };
    let JoinOutcome::Joined {
        events: mut customer_rx,
        ..
    } = join.execute(join_input(42, 1, "customer", "Cara")).await
    else {
        panic!("customer join should be admitted");
    };

    let post = PostMessageUseCase {
        store: store.clone(),
        rooms: Arc::clone(&rooms),
    };
    let outcome = post
        .execute(message_input(42, "let me in", 9, "customer", "Mallory"))
        .await;
    assert!(matches!(
        outcome,
        PostOutcome::Refused(ClosedReason::Unauthorized)
    ));

    // Nothing was appended or broadcast to the room.
    assert!(rooms.history(42).is_empty());
    assert!(matches!(customer_rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn should_let_one_connection_join_multiple_rooms() {
    // Joins are additive: a second join subscribes the connection to the
    // second room without dropping the first.
    let rooms = Arc::new(ChatRooms::new());
    let store = MockParticipantStore::new()
        .with_participant(1, 5, ParticipantRole::Employee)
        .with_participant(2, 5, ParticipantRole::Employee)
        .with_participant(1, 6, ParticipantRole::Customer)
        .with_participant(2, 7, ParticipantRole::Customer);

    let join = JoinChatUseCase {
        store: store.clone(),
        rooms: Arc::clone(&rooms),
    };
    let JoinOutcome::Joined {
        events: mut room_one_rx,
        ..
    } = join.execute(join_input(1, 5, "employee", "Evan")).await
    else {
        panic!("first join should be admitted");
    };
    let join = JoinChatUseCase {
        store: store.clone(),
        rooms: Arc::clone(&rooms),
    };
    let JoinOutcome::Joined {
        events: mut room_two_rx,
        ..
    } = join.execute(join_input(2, 5, "employee", "Evan")).await
    else {
        panic!("second join should be admitted");
    };

    let post = PostMessageUseCase {
        store: store.clone(),
        rooms: Arc::clone(&rooms),
    };
    post.execute(message_input(1, "in one", 6, "customer", "Ana"))
        .await;
    let post = PostMessageUseCase {
        store: store.clone(),
        rooms: Arc::clone(&rooms),
    };
    post.execute(message_input(2, "in two", 7, "customer", "Bea"))
        .await;

    match room_one_rx.recv().await.unwrap() {
        RoomEvent::Message(msg) => assert_eq!(msg.text, "in one"),
        other => panic!("expected message event, got {other:?}"),
    }
    match room_two_rx.recv().await.unwrap() {
        RoomEvent::Message(msg) => assert_eq!(msg.text, "in two"),
        other => panic!("expected message event, got {other:?}"),
    }
}
