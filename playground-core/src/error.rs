use thiserror::Error;

/// Errors produced while decoding wire frames and signaling payloads.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("frame is not valid utf-8")]
    NotUtf8,

    #[error("`{kind}` frame is missing its `data` payload")]
    MissingData { kind: &'static str },

    #[error("unsupported sdp type `{0}`")]
    UnknownSdpType(String),

    #[error("share link has no `{0}` parameter")]
    MissingParam(&'static str),
}
