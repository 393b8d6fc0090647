use playground_core::RoomId;
use playground_session::SessionError;

use crate::integration::init_tracing;
use crate::utils::local_session;

#[tokio::test]
async fn test_join_rejects_wrong_room() {
    init_tracing();

    let host = local_session();
    let joiner = local_session();
    let hosted = host.host_game();

    let offer = host
        .create_offer_description()
        .await
        .expect("offer")
        .encode()
        .unwrap();

    let result = joiner.join_game(&RoomId::from("room_other"), &offer).await;
    match result {
        Err(SessionError::RoomMismatch { requested, offered }) => {
            assert_eq!(requested, RoomId::from("room_other"));
            assert_eq!(offered, hosted.room);
        }
        other => panic!("expected RoomMismatch, got {:?}", other.map(|j| j.host)),
    }
    assert_eq!(joiner.peer_count(), 0);

    let result = joiner.join_game(&RoomId::from(""), &offer).await;
    assert!(matches!(result, Err(SessionError::EmptyRoomId)));

    host.disconnect().await;
}
