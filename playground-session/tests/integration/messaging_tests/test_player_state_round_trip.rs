use crate::integration::init_tracing;
use crate::utils::{
    CallbackRecorder, DELIVERY_TIMEOUT_MS, SessionEvent, connect_pair, local_session,
    sample_state,
};

#[tokio::test]
async fn test_player_state_round_trip() {
    init_tracing();

    let host = local_session();
    let joiner = local_session();
    let joiner_events = CallbackRecorder::attach(&joiner);

    host.host_game();
    connect_pair(&host, &joiner)
        .await
        .expect("Handshake failed");

    let state = sample_state(host.player_id());
    assert_eq!(host.send_player_state(&state).await, 1);

    assert!(
        joiner_events
            .wait_for(DELIVERY_TIMEOUT_MS, |e| matches!(e, SessionEvent::StateUpdate(_)))
            .await,
        "joiner never received the state update"
    );

    let received = joiner_events.state_updates();
    assert_eq!(received[0].id, state.id);
    assert_eq!(received[0].position, state.position);
    assert_eq!(received[0].rotation, state.rotation);
    assert_eq!(received[0].username, "tester");

    // The joiner is not the host, so nothing flows the other way.
    assert_eq!(joiner.send_player_state(&sample_state(joiner.player_id())).await, 0);

    host.disconnect().await;
    joiner.disconnect().await;
}
