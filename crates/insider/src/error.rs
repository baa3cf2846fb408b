//! Unified error type for the Insider client.

use insider_protocol::ProtocolError;
use insider_sync::SyncError;
use insider_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// `?` converts any sub-crate error into this one, so an application can
/// use a single error type across transport, protocol, and sync calls.
#[derive(Debug, thiserror::Error)]
pub enum InsiderError {
    /// A transport-level error (open, subscribe, publish, close).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid identifier).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The room sync client could not be opened.
    #[error(transparent)]
    Sync(#[from] SyncError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::OpenFailed("refused".into());
        let insider_err: InsiderError = err.into();
        assert!(matches!(insider_err, InsiderError::Transport(_)));
        assert!(insider_err.to_string().contains("refused"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = insider_protocol::RoomCode::parse("").unwrap_err();
        let insider_err: InsiderError = err.into();
        assert!(matches!(insider_err, InsiderError::Protocol(_)));
    }

    #[test]
    fn test_from_sync_error() {
        let err = SyncError::Transport(TransportError::Closed);
        let insider_err: InsiderError = err.into();
        assert!(matches!(insider_err, InsiderError::Sync(_)));
    }
}
