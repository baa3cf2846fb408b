//! Error types for the sync layer.

use insider_protocol::ProtocolError;
use insider_transport::TransportError;

/// Errors returned while opening a room sync client.
///
/// Once a client is open nothing it does is fatal: actions without a live
/// link are no-ops, and bad payloads or failed publishes are only logged.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The link could not be acquired or a topic could not be subscribed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// An identifier was rejected.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
