use playground_core::PeerId;
use playground_session::{PeerChannel, SessionError};
use std::time::Duration;

use crate::integration::init_tracing;
use crate::utils::{FakeChannel, local_session};

#[tokio::test]
async fn test_wait_times_out_while_connecting() {
    init_tracing();

    let session = local_session();
    let peer_id = PeerId::generate();
    session
        .registry()
        .register(peer_id.clone(), FakeChannel::connecting());

    let result = session
        .wait_for_peer(&peer_id, Duration::from_millis(50))
        .await;

    assert!(matches!(result, Err(SessionError::Timeout(id)) if id == peer_id));
}

#[tokio::test]
async fn test_wait_fails_when_link_closes_first() {
    init_tracing();

    let session = local_session();
    let peer_id = PeerId::generate();
    let link = FakeChannel::connecting();
    session.registry().register(peer_id.clone(), link.clone());

    let closer = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        link.close().await.unwrap();
    });

    let result = session.wait_for_peer(&peer_id, Duration::from_secs(2)).await;
    closer.await.unwrap();

    assert!(matches!(result, Err(SessionError::LinkClosed(id)) if id == peer_id));
}

#[tokio::test]
async fn test_wait_resolves_once_open() {
    init_tracing();

    let session = local_session();
    let peer_id = PeerId::generate();
    let link = FakeChannel::connecting();
    session.registry().register(peer_id.clone(), link.clone());

    let opener = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        link.mark_open();
    });

    session
        .wait_for_peer(&peer_id, Duration::from_secs(2))
        .await
        .expect("link opened");
    opener.await.unwrap();
}
