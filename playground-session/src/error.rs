use playground_core::{HandshakeId, PeerId, ProtocolError, RoomId, SdpKind};
use thiserror::Error;

/// Everything that can go wrong between a game and its peers.
///
/// None of these are fatal: the worst case is a session with no peers.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("malformed connection description: {0}")]
    MalformedDescription(#[source] ProtocolError),

    #[error("expected an {expected} description, got an {got}")]
    UnexpectedDescription { expected: SdpKind, got: SdpKind },

    #[error("no pending offer for handshake {0}")]
    NoSuchPeer(HandshakeId),

    #[error("room id is empty")]
    EmptyRoomId,

    #[error("offer belongs to room {offered}, not {requested}")]
    RoomMismatch { requested: RoomId, offered: RoomId },

    #[error("peer {0} is not registered")]
    UnknownPeer(PeerId),

    #[error("timed out waiting for peer {0}")]
    Timeout(PeerId),

    #[error("link to peer {0} closed before it opened")]
    LinkClosed(PeerId),

    #[error("transport error: {0:#}")]
    Transport(anyhow::Error),
}
