use playground_core::PeerId;
use playground_session::HOST_STOPPED_NOTICE;

use crate::integration::init_tracing;
use crate::utils::{FakeChannel, local_session};

#[tokio::test]
async fn test_stop_hosting_notifies_peers() {
    init_tracing();

    let host = local_session();
    host.host_game();

    let channels = [FakeChannel::open(), FakeChannel::failing(), FakeChannel::open()];
    for channel in &channels {
        host.registry().register(PeerId::generate(), channel.clone());
    }
    assert_eq!(host.peer_count(), 3);

    host.stop_hosting().await;

    assert_eq!(host.peer_count(), 0);
    assert!(!host.is_multiplayer());
    assert!(!host.hosting_status());
    for channel in &channels {
        assert!(channel.is_closed());
    }
    for channel in [&channels[0], &channels[2]] {
        let frames = channel.sent_json().await;
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0]["type"], "hostStopped");
        assert_eq!(frames[0]["message"], HOST_STOPPED_NOTICE);
    }

    host.stop_hosting().await;
    assert_eq!(host.peer_count(), 0);
}

#[tokio::test]
async fn test_disconnect_ignores_hosting_flag() {
    init_tracing();

    let session = local_session();
    let channel = FakeChannel::open();
    session.registry().register(PeerId::generate(), channel.clone());

    session.disconnect().await;

    assert_eq!(session.peer_count(), 0);
    assert!(channel.is_closed());
    assert!(channel.sent().await.is_empty());
}
