use bytes::Bytes;

use crate::transport::LinkId;

/// Transport callbacks, flattened into one stream for the session event loop.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// Data channel is open and writable.
    ChannelOpen(LinkId),

    /// Raw frame received on the data channel.
    Message(LinkId, Bytes),

    /// Data channel or peer connection went away. Sent at most once per link.
    Closed(LinkId),
}
