use serde::{Deserialize, Serialize};

/// Delivery guarantees requested for the game data channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    #[default]
    Reliable,
    Unreliable,
    ReliableUnordered,
}

impl Channel {
    pub fn is_ordered(self) -> bool {
        matches!(self, Channel::Reliable)
    }

    /// `None` means the transport retransmits until delivery.
    pub fn max_retransmits(self) -> Option<u16> {
        match self {
            Channel::Unreliable => Some(0),
            Channel::Reliable | Channel::ReliableUnordered => None,
        }
    }
}
