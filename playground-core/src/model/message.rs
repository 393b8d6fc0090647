use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProtocolError;
use crate::model::{ObjectState, PeerId, PlayerState};

const PLAYER_STATE: &str = "playerState";
const OBJECT_STATE: &str = "objectState";
const PLAYER_JOINED: &str = "playerJoined";
const PLAYER_LEFT: &str = "playerLeft";
const HOST_STOPPED: &str = "hostStopped";

/// Every message that travels over the game data channel.
#[derive(Debug, Clone, PartialEq)]
pub enum GameMessage {
    PlayerState(PlayerState),
    /// Reserved for prop synchronisation; receivers already route it.
    ObjectState(ObjectState),
    PlayerJoined(PlayerState),
    PlayerLeft(PeerId),
    HostStopped { message: Option<String> },
}

/// `{"type": ..., "data": ..., "message"?: ...}` text frame.
#[derive(Debug, Serialize, Deserialize)]
struct Frame {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
    /// Only meaningful for `hostStopped`; any other shape is tolerated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<Value>,
}

impl GameMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            GameMessage::PlayerState(_) => PLAYER_STATE,
            GameMessage::ObjectState(_) => OBJECT_STATE,
            GameMessage::PlayerJoined(_) => PLAYER_JOINED,
            GameMessage::PlayerLeft(_) => PLAYER_LEFT,
            GameMessage::HostStopped { .. } => HOST_STOPPED,
        }
    }

    pub fn encode(&self) -> Result<String, ProtocolError> {
        let (data, message) = match self {
            GameMessage::PlayerState(state) | GameMessage::PlayerJoined(state) => {
                (Some(serde_json::to_value(state)?), None)
            }
            GameMessage::ObjectState(state) => (Some(serde_json::to_value(state)?), None),
            GameMessage::PlayerLeft(peer_id) => (Some(serde_json::to_value(peer_id)?), None),
            GameMessage::HostStopped { message } => (None, message.clone().map(Value::String)),
        };

        let frame = Frame {
            kind: self.kind().to_owned(),
            data,
            message,
        };
        Ok(serde_json::to_string(&frame)?)
    }

    /// `Ok(None)` is a well-formed frame of a type this build does not know.
    pub fn decode(raw: &[u8]) -> Result<Option<Self>, ProtocolError> {
        let text = std::str::from_utf8(raw).map_err(|_| ProtocolError::NotUtf8)?;
        let Frame {
            kind,
            data,
            message,
        } = serde_json::from_str(text)?;

        let msg = match kind.as_str() {
            PLAYER_STATE => GameMessage::PlayerState(payload(data, PLAYER_STATE)?),
            OBJECT_STATE => GameMessage::ObjectState(payload(data, OBJECT_STATE)?),
            PLAYER_JOINED => GameMessage::PlayerJoined(payload(data, PLAYER_JOINED)?),
            PLAYER_LEFT => GameMessage::PlayerLeft(payload(data, PLAYER_LEFT)?),
            HOST_STOPPED => GameMessage::HostStopped {
                message: match message {
                    Some(Value::String(text)) => Some(text),
                    _ => None,
                },
            },
            _ => return Ok(None),
        };
        Ok(Some(msg))
    }
}

fn payload<T: DeserializeOwned>(data: Option<Value>, kind: &'static str) -> Result<T, ProtocolError> {
    let data = data.ok_or(ProtocolError::MissingData { kind })?;
    Ok(serde_json::from_value(data)?)
}
