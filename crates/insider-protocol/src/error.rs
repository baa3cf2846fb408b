//! Error types for the protocol layer.
//!
//! Each crate in the workspace defines its own error enum. When you see a
//! `ProtocolError`, the problem is in identifiers or (de)serialization,
//! not in the link or the client's state machine.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a command into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning a frame body into an event).
    ///
    /// Common causes: malformed JSON, missing required fields, or a
    /// payload published to the wrong topic.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// A room code or player uuid that cannot be used in a destination.
    #[error("invalid {kind}: {value:?}")]
    InvalidIdentifier {
        /// Which identifier was rejected (`"room code"`, `"player uuid"`).
        kind: &'static str,
        /// The rejected input.
        value: String,
    },
}
