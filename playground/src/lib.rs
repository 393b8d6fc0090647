pub use playground_core::{GameMessage, ObjectState, PeerId, PlayerState, RoomId};

pub mod model {
    pub use playground_core::model::*;
}

pub mod settings {
    pub use playground_core::settings::*;
}

#[cfg(feature = "session")]
pub mod session {
    pub use playground_session::*;
}
