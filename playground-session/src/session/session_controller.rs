use crate::error::SessionError;
use crate::registry::PeerRegistry;
use crate::session::event_loop::SessionEventLoop;
use crate::session::{MessageDispatcher, SessionCallbacks, SessionConfig};
use crate::signaling::{SignalingExchange, decode};
use crate::transport::{LinkState, PeerChannel, TransportEvent};
use playground_core::{
    ConnectionDescription, GameMessage, ObjectState, PeerId, PlayerState, RoomId, SdpKind,
    ShareLink,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub const HOST_STOPPED_NOTICE: &str = "User stopped hosting";

/// State shared between the controller and its event loop.
pub(crate) struct SessionShared {
    pub(crate) local_id: PeerId,
    pub(crate) hosting: AtomicBool,
    pub(crate) registry: Arc<PeerRegistry>,
    pub(crate) dispatcher: MessageDispatcher,
}

impl SessionShared {
    fn is_hosting(&self) -> bool {
        self.hosting.load(Ordering::SeqCst)
    }

    /// Sends `msg` to every open link except `except`. A failing peer is
    /// logged and skipped. Returns how many peers accepted the frame.
    pub(crate) async fn broadcast(&self, msg: &GameMessage, except: Option<&PeerId>) -> usize {
        let frame = match msg.encode() {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Failed to encode {}: {}", msg.kind(), e);
                return 0;
            }
        };

        let mut delivered = 0;
        for (peer_id, link) in self.registry.snapshot() {
            if except == Some(&peer_id) {
                continue;
            }
            if link.state() != LinkState::Open {
                debug!("Skipping {} for {}: link not open", msg.kind(), peer_id);
                continue;
            }
            match link.send_text(&frame).await {
                Ok(()) => delivered += 1,
                Err(e) => warn!("Failed to send {} to {}: {:#}", msg.kind(), peer_id, e),
            }
        }
        delivered
    }

    /// Removes a peer whose link went away and tells the others when hosting.
    pub(crate) async fn drop_peer(&self, peer_id: &PeerId) {
        let Some(link) = self.registry.unregister(peer_id) else {
            return;
        };
        if let Err(e) = link.close().await {
            debug!("Error while closing link to {}: {:#}", peer_id, e);
        }

        if self.is_hosting() {
            self.broadcast(&GameMessage::PlayerLeft(peer_id.clone()), None)
                .await;
        }
        self.dispatcher.callbacks().peer_disconnected(peer_id);
    }

    pub(crate) async fn close_all(&self) {
        for (peer_id, link) in self.registry.drain() {
            if let Err(e) = link.close().await {
                debug!("Error while closing link to {}: {:#}", peer_id, e);
            }
        }
        for link in self.registry.drain_pending() {
            if let Err(e) = link.close().await {
                debug!("Error while closing pending link {}: {:#}", link.link_id(), e);
            }
        }
    }
}

/// Result of joining: the answer to hand back to the host.
#[derive(Debug, Clone)]
pub struct JoinHandshake {
    pub room: RoomId,
    pub host: PeerId,
    pub answer: ConnectionDescription,
}

/// Hosting, joining and host-authoritative broadcast for one game session.
///
/// Must be created inside a Tokio runtime; the transport event loop is
/// spawned on construction and stopped when the controller is dropped.
pub struct SessionController {
    shared: Arc<SessionShared>,
    signaling: SignalingExchange,
    config: SessionConfig,
    room: Mutex<Option<RoomId>>,
    event_tx: mpsc::UnboundedSender<TransportEvent>,
    event_loop: JoinHandle<()>,
}

impl SessionController {
    pub fn new(config: SessionConfig) -> Self {
        let local_id = PeerId::generate();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let registry = Arc::new(PeerRegistry::new());

        let shared = Arc::new(SessionShared {
            local_id: local_id.clone(),
            hosting: AtomicBool::new(false),
            registry: Arc::clone(&registry),
            dispatcher: MessageDispatcher::new(Arc::new(SessionCallbacks::default())),
        });

        let signaling = SignalingExchange::new(
            local_id,
            config.transport.clone(),
            registry,
            event_tx.clone(),
        );

        let event_loop = tokio::spawn(SessionEventLoop::new(Arc::clone(&shared), event_rx).run());

        Self {
            shared,
            signaling,
            config,
            room: Mutex::new(None),
            event_tx,
            event_loop,
        }
    }

    pub fn player_id(&self) -> &PeerId {
        &self.shared.local_id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn room_id(&self) -> Option<RoomId> {
        self.room.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    fn set_room(&self, room: Option<RoomId>) {
        *self.room.lock().unwrap_or_else(|p| p.into_inner()) = room;
    }

    /// Starts hosting a fresh room. Does not wait for anyone to connect.
    pub fn host_game(&self) -> ShareLink {
        self.shared.hosting.store(true, Ordering::SeqCst);

        let room = RoomId::generate();
        self.set_room(Some(room.clone()));

        let link = ShareLink::new(
            self.config.share_base_url.clone(),
            room.clone(),
            self.shared.local_id.clone(),
        );
        info!("Hosting game with room ID: {}", room);
        info!("Share URL: {}", link);
        link
    }

    /// Joins `room` with the host's pasted offer and returns the answer to
    /// send back. The link is usable once `wait_for_peer(&host, ..)` succeeds.
    pub async fn join_game(&self, room: &RoomId, offer: &str) -> Result<JoinHandshake, SessionError> {
        self.shared.hosting.store(false, Ordering::SeqCst);

        if room.is_empty() {
            warn!("Invalid room ID - empty string");
            return Err(SessionError::EmptyRoomId);
        }

        let offer = decode(offer, SdpKind::Offer)?;
        if let Some(offered) = &offer.room {
            if offered != room {
                return Err(SessionError::RoomMismatch {
                    requested: room.clone(),
                    offered: offered.clone(),
                });
            }
        }

        info!("Joining game room: {}", room);
        let host = offer.peer.clone();
        let answer = self.signaling.accept_offer(offer).await?;
        self.set_room(Some(room.clone()));

        Ok(JoinHandshake {
            room: room.clone(),
            host,
            answer,
        })
    }

    /// One offer per expected joiner. Stamped with the hosted room, if any.
    pub async fn create_offer_description(&self) -> Result<ConnectionDescription, SessionError> {
        self.signaling.create_offer_description(self.room_id()).await
    }

    pub async fn accept_offer_and_create_answer(
        &self,
        offer: &str,
    ) -> Result<ConnectionDescription, SessionError> {
        self.signaling.accept_offer_and_create_answer(offer).await
    }

    /// Returns the id of the peer whose answer completed the handshake.
    pub async fn apply_answer_description(&self, answer: &str) -> Result<PeerId, SessionError> {
        self.signaling.apply_answer_description(answer).await
    }

    /// Resolves once the link to `peer_id` is open.
    pub async fn wait_for_peer(&self, peer_id: &PeerId, timeout: Duration) -> Result<(), SessionError> {
        let Some(link) = self.shared.registry.get(peer_id) else {
            return Err(SessionError::UnknownPeer(peer_id.clone()));
        };

        let mut changes = link.state_changes();
        let waited = tokio::time::timeout(timeout, async {
            changes
                .wait_for(|state| *state != LinkState::Connecting)
                .await
                .map(|state| *state)
        })
        .await;

        match waited {
            Err(_) => Err(SessionError::Timeout(peer_id.clone())),
            Ok(Ok(LinkState::Open)) => Ok(()),
            Ok(_) => Err(SessionError::LinkClosed(peer_id.clone())),
        }
    }

    async fn host_broadcast(&self, msg: GameMessage) -> usize {
        if !self.shared.is_hosting() {
            return 0;
        }
        self.shared.broadcast(&msg, None).await
    }

    /// Host only. Returns how many peers accepted the frame.
    pub async fn send_player_state(&self, state: &PlayerState) -> usize {
        self.host_broadcast(GameMessage::PlayerState(state.clone()))
            .await
    }

    pub async fn send_object_state(&self, state: &ObjectState) -> usize {
        self.host_broadcast(GameMessage::ObjectState(state.clone()))
            .await
    }

    pub async fn send_player_joined(&self, state: &PlayerState) -> usize {
        self.host_broadcast(GameMessage::PlayerJoined(state.clone()))
            .await
    }

    pub async fn send_player_left(&self, peer_id: &PeerId) -> usize {
        self.host_broadcast(GameMessage::PlayerLeft(peer_id.clone()))
            .await
    }

    /// Notifies peers best-effort, then drops every link. Safe to call twice.
    pub async fn stop_hosting(&self) {
        self.shared.hosting.store(false, Ordering::SeqCst);
        info!(
            "Stopping hosting, notifying {} peer(s)",
            self.shared.registry.size()
        );

        let notice = GameMessage::HostStopped {
            message: Some(HOST_STOPPED_NOTICE.to_owned()),
        };
        self.shared.broadcast(&notice, None).await;

        self.disconnect().await;
        self.set_room(None);
        info!("Stopped hosting game");
    }

    /// Closes every link, established or pending, whatever the hosting state.
    pub async fn disconnect(&self) {
        self.shared.close_all().await;
    }

    pub fn is_multiplayer(&self) -> bool {
        self.shared.registry.is_active()
    }

    pub fn peer_count(&self) -> usize {
        self.shared.registry.size()
    }

    pub fn hosting_status(&self) -> bool {
        self.shared.is_hosting()
    }

    pub fn callbacks(&self) -> &SessionCallbacks {
        self.shared.dispatcher.callbacks()
    }

    pub fn dispatcher(&self) -> &MessageDispatcher {
        &self.shared.dispatcher
    }

    pub fn registry(&self) -> &Arc<PeerRegistry> {
        &self.shared.registry
    }

    /// Feeds transport events from a custom transport into this session.
    pub fn event_sender(&self) -> mpsc::UnboundedSender<TransportEvent> {
        self.event_tx.clone()
    }

    pub fn set_on_player_joined(&self, f: impl Fn(&PlayerState) + Send + Sync + 'static) {
        self.callbacks().set_on_player_joined(f);
    }

    pub fn set_on_player_left(&self, f: impl Fn(&PeerId) + Send + Sync + 'static) {
        self.callbacks().set_on_player_left(f);
    }

    pub fn set_on_state_update(&self, f: impl Fn(&PlayerState) + Send + Sync + 'static) {
        self.callbacks().set_on_state_update(f);
    }

    pub fn set_on_object_state(&self, f: impl Fn(&ObjectState) + Send + Sync + 'static) {
        self.callbacks().set_on_object_state(f);
    }

    pub fn set_on_host_stopped(&self, f: impl Fn(Option<&str>) + Send + Sync + 'static) {
        self.callbacks().set_on_host_stopped(f);
    }

    pub fn set_on_peer_connected(&self, f: impl Fn(&PeerId) + Send + Sync + 'static) {
        self.callbacks().set_on_peer_connected(f);
    }

    pub fn set_on_peer_disconnected(&self, f: impl Fn(&PeerId) + Send + Sync + 'static) {
        self.callbacks().set_on_peer_disconnected(f);
    }
}

impl Drop for SessionController {
    /// Stops the event loop and closes every remaining link in the background,
    /// so remote peers see the channel close instead of a silent stall.
    fn drop(&mut self) {
        self.event_loop.abort();

        let registry = &self.shared.registry;
        if registry.size() == 0 && registry.pending_count() == 0 {
            return;
        }

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let shared = Arc::clone(&self.shared);
                handle.spawn(async move {
                    shared.close_all().await;
                    debug!("Closed links of dropped session {}", shared.local_id);
                });
            }
            Err(_) => warn!(
                "Session {} dropped outside a runtime, {} link(s) left open",
                self.shared.local_id,
                registry.size() + registry.pending_count()
            ),
        }
    }
}
