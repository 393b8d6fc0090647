use playground_core::{Channel, IceServerConfig};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_STUN_ADDR: &str = "stun:stun.l.google.com:19302";

/// WebRTC settings shared by every link of a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    pub ice_servers: Vec<IceServerConfig>,
    pub channel_label: String,
    pub channel: Channel,
    /// Upper bound on ICE gathering before a description is handed out anyway.
    pub ice_gathering_timeout_ms: u64,
}

impl TransportConfig {
    /// Host candidates only. Enough for peers on the same machine or LAN.
    pub fn local_only() -> Self {
        Self {
            ice_servers: Vec::new(),
            ..Self::default()
        }
    }

    pub fn ice_gathering_timeout(&self) -> Duration {
        Duration::from_millis(self.ice_gathering_timeout_ms)
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            ice_servers: vec![IceServerConfig::stun(DEFAULT_STUN_ADDR)],
            channel_label: "game".to_owned(),
            channel: Channel::Reliable,
            ice_gathering_timeout_ms: 5_000,
        }
    }
}
