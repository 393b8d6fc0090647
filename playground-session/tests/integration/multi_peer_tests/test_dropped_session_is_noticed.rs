use crate::integration::init_tracing;
use crate::utils::{
    CONNECTION_LOSS_MS, CallbackRecorder, SessionEvent, connect_pair, local_session,
};

#[tokio::test]
async fn test_dropped_session_is_noticed() {
    init_tracing();

    let host = local_session();
    let joiner = local_session();
    let host_events = CallbackRecorder::attach(&host);

    host.host_game();
    let (_, joiner_id) = connect_pair(&host, &joiner)
        .await
        .expect("Handshake failed");
    assert_eq!(host.peer_count(), 1);

    // No disconnect() first: dropping alone must close the link.
    drop(joiner);

    assert!(
        host_events
            .wait_for(CONNECTION_LOSS_MS, |e| matches!(e, SessionEvent::PeerDisconnected(id) if *id == joiner_id))
            .await,
        "host never noticed the joiner going away"
    );
    assert_eq!(host.peer_count(), 0);
    assert!(!host.is_multiplayer());

    host.disconnect().await;
}
