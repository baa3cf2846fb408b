//! # Insider
//!
//! Room state synchronization client for the Insider party game.
//!
//! A player's client subscribes to its room's topics on a message broker,
//! mirrors the roster, the round in progress, and its own secret role, and
//! publishes commands (ready, start, card opened, ...) only while the broker
//! session is up.
//!
//! This crate re-exports the pieces:
//!
//! - [`transport`]: the [`Transport`](transport::Transport)/[`Link`](transport::Link)
//!   abstraction and the in-process `MemoryTransport`
//! - [`protocol`]: payload types, commands, routes, codec
//! - [`sync`]: [`RoomSyncClient`](sync::RoomSyncClient) and its view
//!
//! ## Quick Start
//!
//! ```rust
//! use insider::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), InsiderError> {
//! insider::init_tracing();
//!
//! let (mut transport, broker) = MemoryTransport::new();
//! let mut client =
//!     RoomSyncClient::open(&mut transport, "ABCD", "p1", SyncConfig::default()).await?;
//!
//! broker.connect();
//! while let Some(change) = client.recv().await {
//!     if change == StateChange::Connection(true) {
//!         client.toggle_ready();
//!         break;
//!     }
//! }
//! assert_eq!(broker.published().len(), 1);
//! # Ok(())
//! # }
//! ```

mod error;
mod telemetry;

pub use error::InsiderError;
pub use telemetry::{DEFAULT_LOG_FILTER, init_tracing, init_tracing_with};

pub use insider_protocol as protocol;
pub use insider_sync as sync;
pub use insider_transport as transport;

/// The types most callers need.
pub mod prelude {
    pub use crate::InsiderError;
    pub use insider_protocol::{
        GamePrivateInfo, GameSnapshot, Player, PlayerUuid, Role, RoomCode, RoomUpdate,
        TopicTemplates,
    };
    pub use insider_sync::{
        ConnectionStatus, LastUpdate, Publisher, RoomSyncClient, RoomView, StateChange,
        SyncConfig,
    };
    pub use insider_transport::{Link, LinkEvent, MemoryHandle, MemoryTransport, Transport};
}
