use playground_core::PeerId;
use std::time::Duration;

use crate::integration::init_tracing;
use crate::utils::{FakeChannel, local_session};

#[tokio::test]
async fn test_drop_closes_links() {
    init_tracing();

    let session = local_session();
    let first = FakeChannel::open();
    let second = FakeChannel::connecting();
    session.registry().register(PeerId::generate(), first.clone());
    session.registry().register(PeerId::generate(), second.clone());

    let registry = session.registry().clone();
    drop(session);

    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !(first.is_closed() && second.is_closed()) {
        assert!(
            tokio::time::Instant::now() < deadline,
            "links left open after the session was dropped"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(registry.size(), 0);
}
