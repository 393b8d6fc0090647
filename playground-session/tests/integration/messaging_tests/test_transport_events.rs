use bytes::Bytes;
use playground_core::{GameMessage, PeerId};
use playground_session::TransportEvent;

use crate::integration::init_tracing;
use crate::utils::{CallbackRecorder, FakeChannel, SessionEvent, local_session, sample_state};

#[tokio::test]
async fn test_frames_reach_callbacks() {
    init_tracing();

    let session = local_session();
    let events = CallbackRecorder::attach(&session);
    let host_id = PeerId::generate();
    let link = FakeChannel::open();
    session.registry().register(host_id.clone(), link.clone());

    let tx = session.event_sender();
    let joined = sample_state(&PeerId::generate());
    tx.send(TransportEvent::Message(link.id(), Bytes::from_static(b"garbage")))
        .unwrap();
    tx.send(TransportEvent::Message(
        link.id(),
        Bytes::from(GameMessage::PlayerJoined(joined.clone()).encode().unwrap()),
    ))
    .unwrap();
    tx.send(TransportEvent::Message(
        link.id(),
        Bytes::from(GameMessage::PlayerLeft(joined.id.clone()).encode().unwrap()),
    ))
    .unwrap();

    assert!(
        events
            .wait_for(2000, |e| matches!(e, SessionEvent::PlayerLeft(id) if *id == joined.id))
            .await
    );
    assert!(
        events
            .events()
            .iter()
            .any(|e| matches!(e, SessionEvent::PlayerJoined(s) if *s == joined))
    );
    assert_eq!(session.peer_count(), 1, "a bad frame must not drop the link");
}

#[tokio::test]
async fn test_host_stopped_drops_link() {
    init_tracing();

    let session = local_session();
    let events = CallbackRecorder::attach(&session);
    let host_id = PeerId::generate();
    let link = FakeChannel::open();
    session.registry().register(host_id.clone(), link.clone());

    session
        .event_sender()
        .send(TransportEvent::Message(
            link.id(),
            Bytes::from_static(br#"{"type":"hostStopped","message":"User stopped hosting"}"#),
        ))
        .unwrap();

    assert!(
        events
            .wait_for(2000, |e| matches!(e, SessionEvent::PeerDisconnected(id) if *id == host_id))
            .await
    );
    assert!(events.events().iter().any(
        |e| matches!(e, SessionEvent::HostStopped(Some(msg)) if msg == "User stopped hosting")
    ));
    assert!(link.is_closed());
    assert_eq!(session.peer_count(), 0);
}

#[tokio::test]
async fn test_closed_link_is_announced_by_host() {
    init_tracing();

    let host = local_session();
    host.host_game();
    let events = CallbackRecorder::attach(&host);

    let leaving_id = PeerId::generate();
    let leaving = FakeChannel::open();
    let staying = FakeChannel::open();
    host.registry().register(leaving_id.clone(), leaving.clone());
    host.registry().register(PeerId::generate(), staying.clone());

    host.event_sender()
        .send(TransportEvent::Closed(leaving.id()))
        .unwrap();

    assert!(
        events
            .wait_for(2000, |e| matches!(e, SessionEvent::PeerDisconnected(id) if *id == leaving_id))
            .await
    );
    assert_eq!(host.peer_count(), 1);

    let frames = staying.sent_json().await;
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0]["type"], "playerLeft");
    assert_eq!(frames[0]["data"], leaving_id.as_str());

    // Events for links that are already gone are ignored.
    host.event_sender()
        .send(TransportEvent::Closed(leaving.id()))
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert_eq!(host.peer_count(), 1);
}
