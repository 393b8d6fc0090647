mod peer_channel;
mod peer_link;
mod transport_config;
mod transport_event;

pub use peer_channel::*;
pub use peer_link::*;
pub use transport_config::*;
pub use transport_event::*;
