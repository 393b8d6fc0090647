use playground_core::{ObjectState, PeerId, Quat, Vec3};

use crate::integration::init_tracing;
use crate::utils::{FakeChannel, local_session, sample_state};

#[tokio::test]
async fn test_non_host_never_sends() {
    init_tracing();

    let session = local_session();
    let channel = FakeChannel::open();
    session.registry().register(PeerId::generate(), channel.clone());

    let state = sample_state(session.player_id());
    let object = ObjectState {
        id: "crate_1".into(),
        position: Vec3::new(5.0, 5.0, 0.0),
        rotation: Quat::IDENTITY,
        velocity: Vec3::new(0.0, -9.8, 0.0),
    };

    assert!(!session.hosting_status());
    assert_eq!(session.send_player_state(&state).await, 0);
    assert_eq!(session.send_object_state(&object).await, 0);
    assert_eq!(session.send_player_joined(&state).await, 0);
    assert_eq!(session.send_player_left(session.player_id()).await, 0);
    assert!(channel.sent().await.is_empty());

    session.host_game();
    assert_eq!(session.send_object_state(&object).await, 1);

    let frames = channel.sent_json().await;
    assert_eq!(frames[0]["type"], "objectState");
    assert_eq!(frames[0]["data"]["id"], "crate_1");
}
