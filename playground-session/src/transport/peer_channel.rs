use async_trait::async_trait;
use std::fmt;
use tokio::sync::watch;
use uuid::Uuid;

/// Identifies one link independently of which peer it ends up belonging to.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub struct LinkId(Uuid);

impl LinkId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LinkId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// `Connecting` -> `Open` -> `Closed`. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Connecting,
    Open,
    Closed,
}

/// What the registry and the broadcaster need from a link.
#[async_trait]
pub trait PeerChannel: Send + Sync + 'static {
    fn link_id(&self) -> LinkId;

    fn state_changes(&self) -> watch::Receiver<LinkState>;

    fn state(&self) -> LinkState {
        *self.state_changes().borrow()
    }

    async fn send_text(&self, frame: &str) -> anyhow::Result<()>;

    async fn close(&self) -> anyhow::Result<()>;
}

/// Applies `next` unless the link is already closed. Returns whether the state changed.
pub(crate) fn advance(state: &watch::Sender<LinkState>, next: LinkState) -> bool {
    state.send_if_modified(|current| {
        if *current == LinkState::Closed || *current == next {
            return false;
        }
        *current = next;
        true
    })
}
