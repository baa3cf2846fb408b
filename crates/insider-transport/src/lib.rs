//! Transport abstraction layer for the Insider room client.
//!
//! Provides the [`Transport`] and [`Link`] traits that abstract over a
//! publish/subscribe message broker (STOMP over WebSocket in production).
//! Connection establishment, reconnection, and framing all live behind
//! these traits; the room client only sees lifecycle and message events.
//!
//! # Feature Flags
//!
//! - `memory` (default): in-process transport via [`MemoryTransport`]

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "memory")]
mod memory;

pub use error::TransportError;
#[cfg(feature = "memory")]
pub use memory::{MemoryHandle, MemoryLink, MemoryTransport, Published};

use std::fmt;

use tokio::sync::mpsc;

/// Opaque identifier for an acquired link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinkId(u64);

impl LinkId {
    /// Creates a new `LinkId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "link-{}", self.0)
    }
}

/// Identifies one subscription registered on a link.
///
/// Ordered by issue order, so subscriptions can be listed in the order
/// they were made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Creates a new `SubscriptionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// A broker destination: a topic to subscribe to or an address to publish to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Destination(String);

impl Destination {
    /// Wraps a destination path such as `/app/room/ABCD/ready`.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Returns the destination path.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Destination {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

/// Something the transport observed on a link.
///
/// Events for one subscription are delivered in arrival order. No ordering
/// holds across subscriptions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    /// The broker session is established; publishes will be accepted.
    Connected,

    /// The broker session was lost. The transport may reconnect on its own
    /// and emit `Connected` again.
    Disconnected {
        /// Human-readable reason, when the transport has one.
        reason: Option<String>,
    },

    /// A message arrived on a subscription.
    Message {
        /// The subscription the message was delivered to.
        subscription: SubscriptionId,
        /// The raw frame body.
        body: Vec<u8>,
    },
}

/// Receiving half of a link's event stream.
pub type EventStream = mpsc::UnboundedReceiver<LinkEvent>;

/// Acquires links to a message broker.
///
/// A transport is the factory side of the abstraction. It knows how to
/// reach the broker (a STOMP endpoint over WebSocket in production, a
/// shared in-process state in tests) but nothing about rooms or games.
/// The room client calls [`open`](Transport::open) once per room and owns
/// the returned link until it shuts down.
///
/// Opening only yields a handle. Establishing the broker session happens
/// in the background, and its outcome arrives on the [`EventStream`] as
/// [`LinkEvent::Connected`] or [`LinkEvent::Disconnected`]. This keeps
/// `open` short and lets reconnection stay the transport's business.
pub trait Transport: Send + 'static {
    /// The link type produced by this transport.
    type Link: Link;

    /// Acquires a new link and its event stream.
    ///
    /// Returns once the link handle exists; the broker session itself is
    /// reported later as [`LinkEvent::Connected`].
    async fn open(&mut self) -> Result<(Self::Link, EventStream), TransportError>;
}

/// One acquired connection handle.
///
/// The methods are synchronous: subscribing and publishing only enqueue
/// work with the transport, and none of them wait for broker
/// acknowledgement. A successful `publish` means the frame was handed to
/// the transport, not that the server received or accepted it. Frames
/// published on one link leave in call order.
///
/// Subscriptions are identified by the [`SubscriptionId`] returned from
/// [`subscribe`](Link::subscribe); every [`LinkEvent::Message`] carries the
/// id it was delivered to, which is how the caller tells topics apart.
///
/// After [`close`](Link::close), the event stream ends and every further
/// call fails with [`TransportError::Closed`].
pub trait Link: Send + 'static {
    /// Registers interest in a topic.
    fn subscribe(&mut self, topic: &Destination) -> Result<SubscriptionId, TransportError>;

    /// Cancels a subscription. Later messages for it are not delivered.
    fn unsubscribe(&mut self, id: SubscriptionId) -> Result<(), TransportError>;

    /// Hands a frame to the transport for delivery.
    fn publish(&self, destination: &Destination, body: &[u8]) -> Result<(), TransportError>;

    /// Releases the link. Further calls fail with [`TransportError::Closed`].
    fn close(&mut self) -> Result<(), TransportError>;

    /// Returns the unique identifier for this link.
    fn id(&self) -> LinkId;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_id_new_and_into_inner() {
        let id = LinkId::new(42);
        assert_eq!(id.into_inner(), 42);
    }

    #[test]
    fn test_link_id_display() {
        assert_eq!(LinkId::new(7).to_string(), "link-7");
    }

    #[test]
    fn test_subscription_id_display() {
        assert_eq!(SubscriptionId::new(3).to_string(), "sub-3");
    }

    #[test]
    fn test_subscription_id_hash_works_as_map_key() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(SubscriptionId::new(1), "players");
        map.insert(SubscriptionId::new(2), "active_game");
        assert_eq!(map[&SubscriptionId::new(2)], "active_game");
    }

    #[test]
    fn test_subscription_id_orders_by_issue_order() {
        use std::collections::BTreeMap;
        let mut map = BTreeMap::new();
        map.insert(SubscriptionId::new(3), "private_info");
        map.insert(SubscriptionId::new(1), "players");
        map.insert(SubscriptionId::new(2), "active_game");
        let order: Vec<_> = map.values().copied().collect();
        assert_eq!(order, ["players", "active_game", "private_info"]);
        assert!(SubscriptionId::new(1) < SubscriptionId::new(2));
    }

    #[test]
    fn test_destination_display_is_path() {
        let dest = Destination::new("/app/room/ABCD/ready");
        assert_eq!(dest.to_string(), "/app/room/ABCD/ready");
        assert_eq!(dest, Destination::from("/app/room/ABCD/ready"));
    }
}
