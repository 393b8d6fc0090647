use playground_core::{ObjectState, PeerId, PlayerState};
use std::sync::{Arc, RwLock};

type Handler<T> = Arc<dyn Fn(&T) + Send + Sync>;
type HostStoppedHandler = Arc<dyn Fn(Option<&str>) + Send + Sync>;

/// At most one subscriber per event; registering again replaces the previous one.
struct Slot<H: ?Sized>(RwLock<Option<Arc<H>>>);

impl<H: ?Sized> Default for Slot<H> {
    fn default() -> Self {
        Self(RwLock::new(None))
    }
}

impl<H: ?Sized> Slot<H> {
    fn set(&self, handler: Arc<H>) {
        let mut slot = self.0.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Some(handler);
    }

    /// Cloned out so the handler runs without the lock held.
    fn get(&self) -> Option<Arc<H>> {
        self.0
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

/// Application hooks fired by the session.
#[derive(Default)]
pub struct SessionCallbacks {
    player_joined: Slot<dyn Fn(&PlayerState) + Send + Sync>,
    player_left: Slot<dyn Fn(&PeerId) + Send + Sync>,
    state_update: Slot<dyn Fn(&PlayerState) + Send + Sync>,
    object_state: Slot<dyn Fn(&ObjectState) + Send + Sync>,
    host_stopped: Slot<dyn Fn(Option<&str>) + Send + Sync>,
    peer_connected: Slot<dyn Fn(&PeerId) + Send + Sync>,
    peer_disconnected: Slot<dyn Fn(&PeerId) + Send + Sync>,
}

impl SessionCallbacks {
    pub fn set_on_player_joined(&self, f: impl Fn(&PlayerState) + Send + Sync + 'static) {
        self.player_joined.set(Arc::new(f) as Handler<PlayerState>);
    }

    pub fn set_on_player_left(&self, f: impl Fn(&PeerId) + Send + Sync + 'static) {
        self.player_left.set(Arc::new(f) as Handler<PeerId>);
    }

    /// Receives the whole snapshot: position, rotation and the sender's id.
    pub fn set_on_state_update(&self, f: impl Fn(&PlayerState) + Send + Sync + 'static) {
        self.state_update.set(Arc::new(f) as Handler<PlayerState>);
    }

    pub fn set_on_object_state(&self, f: impl Fn(&ObjectState) + Send + Sync + 'static) {
        self.object_state.set(Arc::new(f) as Handler<ObjectState>);
    }

    pub fn set_on_host_stopped(&self, f: impl Fn(Option<&str>) + Send + Sync + 'static) {
        self.host_stopped.set(Arc::new(f) as HostStoppedHandler);
    }

    pub fn set_on_peer_connected(&self, f: impl Fn(&PeerId) + Send + Sync + 'static) {
        self.peer_connected.set(Arc::new(f) as Handler<PeerId>);
    }

    pub fn set_on_peer_disconnected(&self, f: impl Fn(&PeerId) + Send + Sync + 'static) {
        self.peer_disconnected.set(Arc::new(f) as Handler<PeerId>);
    }

    pub(crate) fn player_joined(&self, state: &PlayerState) {
        if let Some(f) = self.player_joined.get() {
            f(state);
        }
    }

    pub(crate) fn player_left(&self, peer_id: &PeerId) {
        if let Some(f) = self.player_left.get() {
            f(peer_id);
        }
    }

    pub(crate) fn state_update(&self, state: &PlayerState) {
        if let Some(f) = self.state_update.get() {
            f(state);
        }
    }

    pub(crate) fn object_state(&self, state: &ObjectState) {
        if let Some(f) = self.object_state.get() {
            f(state);
        }
    }

    pub(crate) fn host_stopped(&self, message: Option<&str>) {
        if let Some(f) = self.host_stopped.get() {
            f(message);
        }
    }

    pub(crate) fn peer_connected(&self, peer_id: &PeerId) {
        if let Some(f) = self.peer_connected.get() {
            f(peer_id);
        }
    }

    pub(crate) fn peer_disconnected(&self, peer_id: &PeerId) {
        if let Some(f) = self.peer_disconnected.get() {
            f(peer_id);
        }
    }
}
