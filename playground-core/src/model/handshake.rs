use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Ties an answer back to the offer it responds to.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Hash, Eq, PartialEq)]
#[serde(transparent)]
pub struct HandshakeId(pub Uuid);

impl HandshakeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for HandshakeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HandshakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
