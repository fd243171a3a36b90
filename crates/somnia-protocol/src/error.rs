//! Error types for the protocol layer.

/// Errors that can occur while encoding or decoding wire messages.
///
/// A `ProtocolError` always means a serialization problem, never a
/// networking or game-rules one — those layers have their own enums.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed. Common causes: malformed JSON, missing
    /// required fields, wrong data types, truncated messages.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The message passed deserialization but violates protocol rules —
    /// e.g. a handshake with an unsupported version.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
