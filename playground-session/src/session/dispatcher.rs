use crate::session::SessionCallbacks;
use playground_core::{GameMessage, PeerId};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What happened to one received frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Delivered(&'static str),
    /// Well-formed but of an unknown type.
    Ignored,
    Malformed,
    HostStopped,
}

/// Routes incoming frames to the application callbacks.
#[derive(Clone)]
pub struct MessageDispatcher {
    callbacks: Arc<SessionCallbacks>,
}

impl MessageDispatcher {
    pub fn new(callbacks: Arc<SessionCallbacks>) -> Self {
        Self { callbacks }
    }

    pub fn callbacks(&self) -> &SessionCallbacks {
        &self.callbacks
    }

    /// A corrupt frame is logged and dropped; it never affects the link.
    pub fn handle_frame(&self, from: &PeerId, frame: &[u8]) -> Dispatch {
        match GameMessage::decode(frame) {
            Ok(Some(msg)) => self.dispatch(from, msg),
            Ok(None) => {
                debug!("Ignoring frame of unknown type from {}", from);
                Dispatch::Ignored
            }
            Err(e) => {
                warn!("Dropping malformed frame from {}: {}", from, e);
                Dispatch::Malformed
            }
        }
    }

    pub fn dispatch(&self, from: &PeerId, msg: GameMessage) -> Dispatch {
        let kind = msg.kind();
        match msg {
            GameMessage::PlayerState(state) => self.callbacks.state_update(&state),
            GameMessage::ObjectState(state) => self.callbacks.object_state(&state),
            GameMessage::PlayerJoined(state) => self.callbacks.player_joined(&state),
            GameMessage::PlayerLeft(peer_id) => self.callbacks.player_left(&peer_id),
            GameMessage::HostStopped { message } => {
                info!("Host {} stopped hosting: {:?}", from, message);
                self.callbacks.host_stopped(message.as_deref());
                return Dispatch::HostStopped;
            }
        }
        Dispatch::Delivered(kind)
    }
}
