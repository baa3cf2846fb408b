//! Wire protocol for the Insider room client.
//!
//! This crate defines what travels between the client and the room server:
//!
//! - **Types** ([`RoomUpdate`], [`GameSnapshot`], [`GamePrivateInfo`], ...):
//!   the payloads the server pushes on each inbound topic.
//! - **Commands** ([`ReadyCommand`], [`StartCommand`], ...): the bodies
//!   the client publishes.
//! - **Routes** ([`Routes`]): which destination each command and topic
//!   lives at for a given [`RoomCode`].
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): bytes in, types out.
//! - **Errors** ([`ProtocolError`]).
//!
//! # Architecture
//!
//! ```text
//! Transport (frames) → Protocol (typed events/commands) → Sync client (state)
//! ```

mod codec;
mod command;
mod error;
mod routes;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use command::{
    CardOpenCommand, JoinCommand, LeaveCommand, MasterEndCommand, PresenceCommand,
    ReadyCommand, SnapshotRequest, StartCommand, StatusCommand,
};
pub use error::ProtocolError;
pub use routes::{APP_PREFIX, Action, ROOM_CODE_PLACEHOLDER, Routes, Topic, TopicTemplates};
pub use types::{
    ActiveGameEnvelope, GamePrivateInfo, GameSnapshot, Player, PlayerUuid, Role, RoomCode,
    RoomEventKind, RoomStatus, RoomUpdate,
};
