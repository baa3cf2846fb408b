//! Codec trait and implementations for command and event bodies.
//!
//! The broker carries opaque frame bodies. A [`Codec`] turns outbound
//! commands into body bytes and inbound bodies back into typed events.
//! The room server speaks JSON, so [`JsonCodec`] is the only
//! implementation today; the client is generic so tests or a future
//! binary encoding can swap it out.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Encodes typed values to frame bodies and decodes bodies back.
///
/// The methods are generic over serde's traits rather than over a fixed
/// message enum, because each inbound topic carries its own payload type:
/// the client knows from the subscription which type to ask for, and the
/// codec only has to know the byte format.
///
/// A decode error is never fatal to the caller. The room client logs it
/// and keeps the previous value of the field the payload was meant for.
///
/// `DeserializeOwned` (vs plain `Deserialize`) means the decoded value
/// owns its data, so the frame buffer can be dropped right after decoding.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into a frame body.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if the value cannot be represented
    /// in this format.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes a frame body.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the body is malformed or does
    /// not match the expected shape.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// Behind the `json` feature flag (enabled by default).
///
/// ## Example
///
/// ```rust
/// use insider_protocol::{Codec, JsonCodec, PlayerUuid, ReadyCommand};
///
/// let codec = JsonCodec;
/// let cmd = ReadyCommand { player_uuid: PlayerUuid::parse("p1").unwrap() };
///
/// let bytes = codec.encode(&cmd).unwrap();
/// assert_eq!(bytes, br#"{"playerUuid":"p1"}"#);
///
/// let decoded: ReadyCommand = codec.decode(&bytes).unwrap();
/// assert_eq!(decoded, cmd);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{GamePrivateInfo, Role};

    #[test]
    fn test_decode_garbage_is_decode_error() {
        let result: Result<GamePrivateInfo, _> = JsonCodec.decode(b"not json at all");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_decode_private_info() {
        let body = br#"{"playerUuid":"p1","role":"INSIDER","word":"penguin"}"#;
        let info: GamePrivateInfo = JsonCodec.decode(body).unwrap();
        assert_eq!(info.player_uuid.as_str(), "p1");
        assert_eq!(info.role, Role::Insider);
        assert_eq!(info.word, "penguin");
    }
}
