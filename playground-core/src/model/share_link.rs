use std::fmt;
use std::str::FromStr;

use url::form_urlencoded;

use crate::error::ProtocolError;
use crate::model::{PeerId, RoomId};

/// `<base>?room=<RoomId>&host=<PeerId>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLink {
    pub base: String,
    pub room: RoomId,
    pub host: PeerId,
}

impl ShareLink {
    pub fn new(base: impl Into<String>, room: RoomId, host: PeerId) -> Self {
        Self {
            base: base.into(),
            room,
            host,
        }
    }
}

impl fmt::Display for ShareLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = if self.base.contains('?') { '&' } else { '?' };
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("room", self.room.as_str())
            .append_pair("host", self.host.as_str())
            .finish();
        write!(f, "{}{}{}", self.base, sep, query)
    }
}

impl FromStr for ShareLink {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (base, query) = s.split_once('?').unwrap_or((s, ""));

        let mut room = None;
        let mut host = None;
        let mut rest = form_urlencoded::Serializer::new(String::new());
        let mut kept = 0;
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match (key.as_ref(), value.as_ref()) {
                ("room", v) if !v.is_empty() => room = Some(RoomId::from(v)),
                ("host", v) if !v.is_empty() => host = Some(PeerId::from(v)),
                (k, v) => {
                    rest.append_pair(k, v);
                    kept += 1;
                }
            }
        }

        let base = if kept == 0 {
            base.to_owned()
        } else {
            format!("{}?{}", base, rest.finish())
        };

        Ok(Self {
            base,
            room: room.ok_or(ProtocolError::MissingParam("room"))?,
            host: host.ok_or(ProtocolError::MissingParam("host"))?,
        })
    }
}
