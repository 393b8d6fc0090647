use crate::transport::TransportConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Origin and path the share link is built on.
    pub share_base_url: String,
    pub transport: TransportConfig,
}

impl SessionConfig {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn with_share_base_url(mut self, url: impl Into<String>) -> Self {
        self.share_base_url = url.into();
        self
    }

    pub fn with_transport(mut self, transport: TransportConfig) -> Self {
        self.transport = transport;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            share_base_url: "http://localhost:5173/".to_owned(),
            transport: TransportConfig::default(),
        }
    }
}
