mod channel;
mod handshake;
mod math;
mod message;
mod peer;
mod room;
mod share_link;
mod signaling;
mod state;

pub use channel::Channel;
pub use handshake::HandshakeId;
pub use math::{Quat, Vec3};
pub use message::GameMessage;
pub use peer::PeerId;
pub use room::RoomId;
pub use share_link::ShareLink;
pub use signaling::{ConnectionDescription, IceServerConfig, SdpKind, SessionDescription};
pub use state::{ObjectState, PlayerState};

use uuid::Uuid;

/// Nine lowercase alphanumeric characters, enough for a casual session.
pub(crate) fn random_suffix() -> String {
    let mut suffix = Uuid::new_v4().simple().to_string();
    suffix.truncate(9);
    suffix
}
