use visio_core::{ClientEvent, RoomId, ServerEvent};

use crate::integration::{create_test_service, init_tracing};
use crate::utils::{TestPeer, next_outcome};

fn chat(content: &str, room: &RoomId, sender_id: &str) -> ClientEvent {
    ClientEvent::SendChatMessage {
        content: content.to_string(),
        room_id: room.clone(),
        sender_id: sender_id.to_string(),
    }
}

#[tokio::test]
async fn test_chat_reaches_everyone_but_the_sender() {
    init_tracing();

    let (service, store, mut outcomes) = create_test_service();
    let mut a = TestPeer::connect(&service);
    let mut b = TestPeer::connect(&service);
    let mut c = TestPeer::connect(&service);
    let room = RoomId::from("R1");
    for peer in [&a, &b, &c] {
        service.dispatch(peer.id, ClientEvent::JoinRoom { room_id: room.clone() });
    }
    a.drain().await;
    b.drain().await;
    c.drain().await;

    service.dispatch(c.id, chat("hello", &room, "user-c"));

    for peer in [&mut a, &mut b] {
        match peer.next_event().await.unwrap() {
            ServerEvent::ReceiveChatMessage { content, sender_id, .. } => {
                assert_eq!(content, "hello");
                assert_eq!(sender_id, "user-c");
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
    c.expect_silence().await.unwrap();

    let outcome = next_outcome(&mut outcomes).await.unwrap();
    let stored = outcome.result.unwrap();
    assert_eq!(stored.content, "hello");
    assert_eq!(stored.sender, "user-c");
    assert_eq!(stored.room, room);
    assert_eq!(store.saved().await.len(), 1);
}

#[tokio::test]
async fn test_chat_stays_inside_its_room() {
    init_tracing();

    let (service, _store, _outcomes) = create_test_service();
    let mut a = TestPeer::connect(&service);
    let mut b = TestPeer::connect(&service);
    let mut other = TestPeer::connect(&service);
    let (r1, r2) = (RoomId::from("R1"), RoomId::from("R2"));
    service.dispatch(a.id, ClientEvent::JoinRoom { room_id: r1.clone() });
    service.dispatch(b.id, ClientEvent::JoinRoom { room_id: r1.clone() });
    service.dispatch(other.id, ClientEvent::JoinRoom { room_id: r2 });
    a.drain().await;
    b.drain().await;
    other.drain().await;

    service.dispatch(a.id, chat("only R1", &r1, "user-a"));

    assert!(matches!(
        b.next_event().await.unwrap(),
        ServerEvent::ReceiveChatMessage { .. }
    ));
    other.expect_silence().await.unwrap();
}

#[tokio::test]
async fn test_chat_for_a_room_the_sender_is_not_in_is_discarded() {
    init_tracing();

    let (service, store, mut outcomes) = create_test_service();
    let mut a = TestPeer::connect(&service);
    let b = TestPeer::connect(&service);
    let room = RoomId::from("R1");
    service.dispatch(a.id, ClientEvent::JoinRoom { room_id: room.clone() });
    a.drain().await;

    service.dispatch(b.id, chat("spoofed", &room, "user-b"));

    a.expect_silence().await.unwrap();
    assert!(
        tokio::time::timeout(std::time::Duration::from_millis(150), outcomes.recv())
            .await
            .is_err()
    );
    assert!(store.saved().await.is_empty());
    assert!(service.registry().lookup(b.id).is_ok());
}
