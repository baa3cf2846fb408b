//! In-process transport backed by a shared broker state.
//!
//! [`MemoryTransport`] hands out [`MemoryLink`]s; the paired
//! [`MemoryHandle`] plays the broker's side: it drives the connection
//! lifecycle, delivers messages to topics, and records every publish.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;

use crate::{
    Destination, EventStream, Link, LinkEvent, LinkId, SubscriptionId, Transport,
    TransportError,
};

/// Counter for generating unique link IDs.
static NEXT_LINK_ID: AtomicU64 = AtomicU64::new(1);

/// A frame handed to the broker by [`Link::publish`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    /// Where the frame was addressed.
    pub destination: Destination,
    /// The raw body.
    pub body: Vec<u8>,
}

impl Published {
    /// Returns the body as UTF-8, or an empty string if it is not text.
    pub fn body_str(&self) -> &str {
        std::str::from_utf8(&self.body).unwrap_or_default()
    }
}

#[derive(Default)]
struct Broker {
    link: Option<LinkId>,
    events: Option<mpsc::UnboundedSender<LinkEvent>>,
    connected: bool,
    subscriptions: BTreeMap<SubscriptionId, Destination>,
    next_subscription: u64,
    published: Vec<Published>,
    fail_next_subscribe: Option<String>,
    rejected: HashSet<Destination>,
}

impl Broker {
    fn emit(&self, event: LinkEvent) -> bool {
        match &self.events {
            Some(tx) => tx.send(event).is_ok(),
            None => false,
        }
    }

    fn release(&mut self, id: LinkId) {
        if self.link == Some(id) {
            self.link = None;
            // Dropping the sender ends the link's event stream.
            self.events = None;
            self.connected = false;
            self.subscriptions.clear();
        }
    }
}

type SharedBroker = Arc<Mutex<Broker>>;

fn lock(broker: &SharedBroker) -> MutexGuard<'_, Broker> {
    broker.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A [`Transport`] whose broker lives in the same process.
///
/// Only one link may be open at a time, mirroring a client that owns a
/// single broker session.
pub struct MemoryTransport {
    broker: SharedBroker,
}

impl MemoryTransport {
    /// Creates a transport and the handle that controls its broker.
    pub fn new() -> (Self, MemoryHandle) {
        let broker = SharedBroker::default();
        let handle = MemoryHandle {
            broker: Arc::clone(&broker),
        };
        (Self { broker }, handle)
    }
}

impl Transport for MemoryTransport {
    type Link = MemoryLink;

    async fn open(&mut self) -> Result<(Self::Link, EventStream), TransportError> {
        let mut broker = lock(&self.broker);
        if let Some(existing) = broker.link {
            return Err(TransportError::OpenFailed(format!(
                "{existing} is still open"
            )));
        }

        let id = LinkId::new(NEXT_LINK_ID.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::unbounded_channel();
        broker.link = Some(id);
        broker.events = Some(tx);
        broker.connected = false;
        broker.subscriptions.clear();
        tracing::debug!(%id, "memory link opened");

        Ok((
            MemoryLink {
                id,
                broker: Arc::clone(&self.broker),
                closed: false,
            },
            rx,
        ))
    }
}

/// A link to the in-process broker.
pub struct MemoryLink {
    id: LinkId,
    broker: SharedBroker,
    closed: bool,
}

impl Link for MemoryLink {
    fn subscribe(&mut self, topic: &Destination) -> Result<SubscriptionId, TransportError> {
        if self.closed {
            return Err(TransportError::Closed);
        }
        let mut broker = lock(&self.broker);
        if let Some(reason) = broker.fail_next_subscribe.take() {
            return Err(TransportError::SubscribeFailed {
                destination: topic.to_string(),
                reason,
            });
        }
        broker.next_subscription += 1;
        let id = SubscriptionId::new(broker.next_subscription);
        broker.subscriptions.insert(id, topic.clone());
        tracing::debug!(link = %self.id, subscription = %id, %topic, "subscribed");
        Ok(id)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> Result<(), TransportError> {
        if self.closed {
            return Err(TransportError::Closed);
        }
        lock(&self.broker)
            .subscriptions
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| TransportError::UnknownSubscription(id.to_string()))
    }

    fn publish(&self, destination: &Destination, body: &[u8]) -> Result<(), TransportError> {
        if self.closed {
            return Err(TransportError::Closed);
        }
        let mut broker = lock(&self.broker);
        if !broker.connected {
            return Err(TransportError::PublishFailed {
                destination: destination.to_string(),
                reason: "broker session not established".into(),
            });
        }
        if broker.rejected.contains(destination) {
            return Err(TransportError::PublishFailed {
                destination: destination.to_string(),
                reason: "rejected by broker".into(),
            });
        }
        broker.published.push(Published {
            destination: destination.clone(),
            body: body.to_vec(),
        });
        Ok(())
    }

    fn close(&mut self) -> Result<(), TransportError> {
        if self.closed {
            return Err(TransportError::Closed);
        }
        self.closed = true;
        lock(&self.broker).release(self.id);
        tracing::debug!(link = %self.id, "memory link closed");
        Ok(())
    }

    fn id(&self) -> LinkId {
        self.id
    }
}

impl Drop for MemoryLink {
    fn drop(&mut self) {
        if !self.closed {
            lock(&self.broker).release(self.id);
        }
    }
}

/// The broker's side of a [`MemoryTransport`].
#[derive(Clone)]
pub struct MemoryHandle {
    broker: SharedBroker,
}

impl MemoryHandle {
    /// Establishes the broker session for the open link.
    ///
    /// Returns `false` if no link is open.
    pub fn connect(&self) -> bool {
        let mut broker = lock(&self.broker);
        if broker.link.is_none() {
            return false;
        }
        broker.connected = true;
        broker.emit(LinkEvent::Connected)
    }

    /// Drops the broker session without closing the link.
    pub fn disconnect(&self, reason: &str) -> bool {
        let mut broker = lock(&self.broker);
        if broker.link.is_none() {
            return false;
        }
        broker.connected = false;
        broker.emit(LinkEvent::Disconnected {
            reason: Some(reason.to_string()),
        })
    }

    /// Delivers a message to every subscription on `topic`.
    ///
    /// Returns how many subscriptions received it.
    pub fn deliver(&self, topic: &str, body: impl Into<Vec<u8>>) -> usize {
        let broker = lock(&self.broker);
        let body = body.into();
        let targets: Vec<SubscriptionId> = broker
            .subscriptions
            .iter()
            .filter(|(_, dest)| dest.as_str() == topic)
            .map(|(id, _)| *id)
            .collect();

        targets
            .into_iter()
            .filter(|id| {
                broker.emit(LinkEvent::Message {
                    subscription: *id,
                    body: body.clone(),
                })
            })
            .count()
    }

    /// Returns every frame published so far, in order.
    pub fn published(&self) -> Vec<Published> {
        lock(&self.broker).published.clone()
    }

    /// Forgets recorded publishes.
    pub fn clear_published(&self) {
        lock(&self.broker).published.clear();
    }

    /// Returns the live subscriptions, ordered by id.
    pub fn subscriptions(&self) -> Vec<(SubscriptionId, Destination)> {
        lock(&self.broker)
            .subscriptions
            .iter()
            .map(|(id, dest)| (*id, dest.clone()))
            .collect()
    }

    /// Returns `true` while a link is open.
    pub fn is_open(&self) -> bool {
        lock(&self.broker).link.is_some()
    }

    /// Returns `true` while the broker session is established.
    pub fn is_connected(&self) -> bool {
        lock(&self.broker).connected
    }

    /// Makes the next `subscribe` call fail with `reason`.
    pub fn fail_next_subscribe(&self, reason: &str) {
        lock(&self.broker).fail_next_subscribe = Some(reason.to_string());
    }

    /// Makes every publish to `destination` fail.
    pub fn reject_publishes_to(&self, destination: &str) {
        lock(&self.broker).rejected.insert(Destination::new(destination));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_then_connect_emits_connected() {
        let (mut transport, handle) = MemoryTransport::new();
        let (_link, mut events) = transport.open().await.unwrap();

        assert!(handle.is_open());
        assert!(!handle.is_connected());
        assert!(handle.connect());
        assert_eq!(events.recv().await, Some(LinkEvent::Connected));
    }

    #[tokio::test]
    async fn test_second_open_fails_while_link_held() {
        let (mut transport, _handle) = MemoryTransport::new();
        let (_link, _events) = transport.open().await.unwrap();

        let result = transport.open().await;
        assert!(matches!(result, Err(TransportError::OpenFailed(_))));
    }

    #[tokio::test]
    async fn test_deliver_routes_only_to_matching_topic() {
        let (mut transport, handle) = MemoryTransport::new();
        let (mut link, mut events) = transport.open().await.unwrap();
        let players = link.subscribe(&"/topic/room/ABCD".into()).unwrap();
        link.subscribe(&"/user/queue/active_game".into()).unwrap();

        assert_eq!(handle.deliver("/topic/room/ABCD", "hello"), 1);
        assert_eq!(handle.deliver("/topic/room/ZZZZ", "nobody"), 0);

        assert_eq!(
            events.recv().await,
            Some(LinkEvent::Message {
                subscription: players,
                body: b"hello".to_vec(),
            })
        );
    }

    #[tokio::test]
    async fn test_unsubscribed_topic_receives_nothing() {
        let (mut transport, handle) = MemoryTransport::new();
        let (mut link, _events) = transport.open().await.unwrap();
        let id = link.subscribe(&"/topic/room/ABCD".into()).unwrap();

        link.unsubscribe(id).unwrap();
        assert_eq!(handle.deliver("/topic/room/ABCD", "late"), 0);
        assert!(matches!(
            link.unsubscribe(id),
            Err(TransportError::UnknownSubscription(_))
        ));
    }

    #[tokio::test]
    async fn test_publish_requires_session() {
        let (mut transport, handle) = MemoryTransport::new();
        let (link, _events) = transport.open().await.unwrap();
        let dest = Destination::new("/app/room/ABCD/ready");

        assert!(link.publish(&dest, b"{}").is_err());

        handle.connect();
        link.publish(&dest, b"{}").unwrap();
        let published = handle.published();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].destination, dest);
        assert_eq!(published[0].body_str(), "{}");
    }

    #[tokio::test]
    async fn test_rejected_destination_fails_publish() {
        let (mut transport, handle) = MemoryTransport::new();
        let (link, _events) = transport.open().await.unwrap();
        handle.connect();
        handle.reject_publishes_to("/app/room/ABCD/start");

        let result = link.publish(&"/app/room/ABCD/start".into(), b"{}");
        assert!(matches!(result, Err(TransportError::PublishFailed { .. })));
        assert!(handle.published().is_empty());
    }

    #[tokio::test]
    async fn test_close_releases_link_and_ends_stream() {
        let (mut transport, handle) = MemoryTransport::new();
        let (mut link, mut events) = transport.open().await.unwrap();
        link.subscribe(&"/topic/room/ABCD".into()).unwrap();

        link.close().unwrap();

        assert!(!handle.is_open());
        assert!(handle.subscriptions().is_empty());
        assert_eq!(events.recv().await, None);
        assert!(matches!(link.close(), Err(TransportError::Closed)));

        // The transport can hand out a fresh link afterwards.
        assert!(transport.open().await.is_ok());
    }

    #[tokio::test]
    async fn test_dropping_link_releases_it() {
        let (mut transport, handle) = MemoryTransport::new();
        let (link, _events) = transport.open().await.unwrap();
        drop(link);
        assert!(!handle.is_open());
    }

    #[tokio::test]
    async fn test_fail_next_subscribe_is_one_shot() {
        let (mut transport, handle) = MemoryTransport::new();
        let (mut link, _events) = transport.open().await.unwrap();
        handle.fail_next_subscribe("broker refused");

        let topic = Destination::new("/topic/room/ABCD");
        assert!(matches!(
            link.subscribe(&topic),
            Err(TransportError::SubscribeFailed { .. })
        ));
        assert!(link.subscribe(&topic).is_ok());
    }
}
