use serde::{Deserialize, Serialize};

use crate::model::{PeerId, Quat, Vec3};

/// Point-in-time snapshot of a player. Only the latest one per peer matters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub id: PeerId,
    pub position: Vec3,
    pub rotation: Quat,
    pub username: String,
}

impl PlayerState {
    pub fn new(id: PeerId, username: impl Into<String>) -> Self {
        Self {
            id,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            username: username.into(),
        }
    }

    pub fn at(mut self, position: Vec3, rotation: Quat) -> Self {
        self.position = position;
        self.rotation = rotation;
        self
    }
}

/// Snapshot of a physics-driven prop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectState {
    pub id: String,
    pub position: Vec3,
    pub rotation: Quat,
    pub velocity: Vec3,
}
