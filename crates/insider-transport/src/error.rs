/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Opening the link failed.
    #[error("open failed: {0}")]
    OpenFailed(String),

    /// Registering a subscription failed.
    #[error("subscribe to {destination} failed: {reason}")]
    SubscribeFailed {
        /// The topic that could not be subscribed.
        destination: String,
        /// Transport-specific reason.
        reason: String,
    },

    /// Publishing a frame failed.
    #[error("publish to {destination} failed: {reason}")]
    PublishFailed {
        /// The destination the frame was addressed to.
        destination: String,
        /// Transport-specific reason.
        reason: String,
    },

    /// The subscription is unknown to this link.
    #[error("unknown subscription {0}")]
    UnknownSubscription(String),

    /// The link was already closed.
    #[error("link closed")]
    Closed,
}
