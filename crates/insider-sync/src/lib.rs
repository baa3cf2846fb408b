//! Client-side room state synchronization for Insider.
//!
//! A [`RoomSyncClient`] subscribes to a room's inbound topics over a
//! [`Transport`](insider_transport::Transport) link, mirrors what the
//! server pushes into a [`RoomView`], and publishes the local player's
//! commands. It never blocks on the network: lifecycle and messages are
//! observed as [`LinkEvent`](insider_transport::LinkEvent)s and commands are
//! fire-and-forget.
//!
//! # Key types
//!
//! - [`RoomSyncClient`]: owns the link, the subscriptions, and the view
//! - [`RoomView`]: roster, active game, private role/word
//! - [`Publisher`]: the outbound commands, available only while connected
//! - [`SyncConfig`]: refresh policy and topic templates
//!
//! # Example
//!
//! ```rust
//! use insider_sync::{RoomSyncClient, StateChange, SyncConfig};
//! use insider_transport::MemoryTransport;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), insider_sync::SyncError> {
//! let (mut transport, broker) = MemoryTransport::new();
//! let mut client =
//!     RoomSyncClient::open(&mut transport, "ABCD", "p1", SyncConfig::default()).await?;
//!
//! // Nothing is published before the broker session comes up.
//! client.start_game();
//! assert!(broker.published().is_empty());
//!
//! broker.connect();
//! assert_eq!(client.recv().await, Some(StateChange::Connection(true)));
//! client.start_game();
//!
//! let sent = broker.published();
//! assert_eq!(sent.len(), 1);
//! assert_eq!(sent[0].destination.as_str(), "/app/room/ABCD/start");
//! assert_eq!(sent[0].body_str(), r#"{"triggerByUuid":"p1"}"#);
//!
//! client.shutdown();
//! assert!(!broker.is_open());
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod link;
mod publisher;
mod state;

pub use client::RoomSyncClient;
pub use config::SyncConfig;
pub use error::SyncError;
pub use link::ConnectionStatus;
pub use publisher::Publisher;
pub use state::{LastUpdate, RoomView, StateChange};
