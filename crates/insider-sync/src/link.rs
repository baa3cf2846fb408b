//! Ownership and lifecycle of the client's link.

use std::fmt;

use insider_transport::{Destination, Link, SubscriptionId, TransportError};

/// Connection status as seen by the client.
///
/// ```text
/// Disconnected ──(Connected)──→ Connected
///      ↑                            │
///      └──────(Disconnected)────────┘
///
/// either ──(shutdown)──→ Released
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// A link is held but the broker session is not established.
    Disconnected,
    /// Publishes are accepted.
    Connected,
    /// The link was given back. Terminal.
    Released,
}

impl ConnectionStatus {
    /// Returns `true` only while publishes are accepted.
    pub fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "Disconnected"),
            Self::Connected => write!(f, "Connected"),
            Self::Released => write!(f, "Released"),
        }
    }
}

/// The link together with its connection status.
///
/// Only `Live` hands out a link for publishing, so a publish on a link
/// without a session cannot be expressed.
pub(crate) enum LinkState<L> {
    Pending(L),
    Live(L),
    Released,
}

impl<L: Link> LinkState<L> {
    pub(crate) fn status(&self) -> ConnectionStatus {
        match self {
            Self::Pending(_) => ConnectionStatus::Disconnected,
            Self::Live(_) => ConnectionStatus::Connected,
            Self::Released => ConnectionStatus::Released,
        }
    }

    /// The link, if publishes are currently accepted.
    pub(crate) fn live(&self) -> Option<&L> {
        match self {
            Self::Live(link) => Some(link),
            _ => None,
        }
    }

    /// The link, connected or not.
    pub(crate) fn held(&self) -> Option<&L> {
        match self {
            Self::Pending(link) | Self::Live(link) => Some(link),
            Self::Released => None,
        }
    }

    /// `Pending → Live`. Returns `false` if nothing changed.
    pub(crate) fn connect(&mut self) -> bool {
        match std::mem::replace(self, Self::Released) {
            Self::Pending(link) => {
                *self = Self::Live(link);
                true
            }
            other => {
                *self = other;
                false
            }
        }
    }

    /// `Live → Pending`. Returns `false` if nothing changed.
    pub(crate) fn disconnect(&mut self) -> bool {
        match std::mem::replace(self, Self::Released) {
            Self::Live(link) => {
                *self = Self::Pending(link);
                true
            }
            other => {
                *self = other;
                false
            }
        }
    }

    /// Moves to `Released`, handing back the link if one was held.
    pub(crate) fn release(&mut self) -> Option<L> {
        match std::mem::replace(self, Self::Released) {
            Self::Pending(link) | Self::Live(link) => Some(link),
            Self::Released => None,
        }
    }
}

/// Closes a freshly opened link unless construction completes.
///
/// Covers every early return between `Transport::open` and the client
/// taking ownership, including panics.
pub(crate) struct LinkGuard<L: Link> {
    link: Option<L>,
}

impl<L: Link> LinkGuard<L> {
    pub(crate) fn new(link: L) -> Self {
        Self { link: Some(link) }
    }

    pub(crate) fn subscribe(
        &mut self,
        topic: &Destination,
    ) -> Result<SubscriptionId, TransportError> {
        match self.link.as_mut() {
            Some(link) => link.subscribe(topic),
            None => Err(TransportError::Closed),
        }
    }

    /// Hands the link to the caller; the guard no longer closes it.
    pub(crate) fn disarm(mut self) -> Result<L, TransportError> {
        self.link.take().ok_or(TransportError::Closed)
    }
}

impl<L: Link> Drop for LinkGuard<L> {
    fn drop(&mut self) {
        if let Some(mut link) = self.link.take() {
            let id = link.id();
            match link.close() {
                Ok(()) => tracing::debug!(link = %id, "released link after failed open"),
                Err(e) => tracing::debug!(link = %id, error = %e, "close after failed open"),
            }
        }
    }
}
