use bytes::Bytes;
use playground_core::{GameMessage, ObjectState, PeerId, Quat, Vec3};
use playground_session::TransportEvent;

use crate::integration::init_tracing;
use crate::utils::{CallbackRecorder, FakeChannel, SessionEvent, local_session};

fn crate_state() -> ObjectState {
    ObjectState {
        id: "crate_7".into(),
        position: Vec3::new(0.5, 4.0, -2.0),
        rotation: Quat::from_yaw(1.2),
        velocity: Vec3::new(0.0, -8.0, 0.0),
    }
}

#[tokio::test]
async fn test_object_state_reaches_callback() {
    init_tracing();

    let session = local_session();
    let events = CallbackRecorder::attach(&session);
    let link = FakeChannel::open();
    session.registry().register(PeerId::generate(), link.clone());

    let state = crate_state();
    session
        .event_sender()
        .send(TransportEvent::Message(
            link.id(),
            Bytes::from(GameMessage::ObjectState(state.clone()).encode().unwrap()),
        ))
        .unwrap();

    assert!(
        events
            .wait_for(2000, |e| matches!(e, SessionEvent::ObjectState(s) if *s == state))
            .await
    );
    assert!(
        !events
            .events()
            .iter()
            .any(|e| matches!(e, SessionEvent::StateUpdate(_))),
        "object frames must not surface as player updates"
    );
}

#[tokio::test]
async fn test_host_sends_object_state() {
    init_tracing();

    let session = local_session();
    let link = FakeChannel::open();
    session.registry().register(PeerId::generate(), link.clone());

    assert_eq!(session.send_object_state(&crate_state()).await, 0);
    assert!(link.sent().await.is_empty());

    session.host_game();
    assert_eq!(session.send_object_state(&crate_state()).await, 1);

    let frames = link.sent_json().await;
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0]["type"], "objectState");
    assert_eq!(frames[0]["data"]["id"], "crate_7");
    assert_eq!(frames[0]["data"]["velocity"]["y"], -8.0);
}
