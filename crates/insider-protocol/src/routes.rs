//! Destination routing for one room.
//!
//! Commands go to `/app/room/{roomCode}/{action}`. Inbound topics are
//! configurable templates in which `{roomCode}` is substituted.

use std::fmt;

use insider_transport::Destination;
use serde::{Deserialize, Serialize};

use crate::RoomCode;

/// Prefix of every server message mapping.
pub const APP_PREFIX: &str = "/app/room";

/// Placeholder replaced by the room code in topic templates.
pub const ROOM_CODE_PLACEHOLDER: &str = "{roomCode}";

/// The inbound topics the client folds into state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Roster broadcasts for the whole room.
    Players,
    /// Per-player snapshot of the round in progress.
    ActiveGame,
    /// Per-player secret role and word.
    PrivateInfo,
}

impl Topic {
    /// Every topic, in subscription order.
    pub const ALL: [Topic; 3] = [Topic::Players, Topic::ActiveGame, Topic::PrivateInfo];
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Players => write!(f, "players"),
            Self::ActiveGame => write!(f, "active_game"),
            Self::PrivateInfo => write!(f, "private_info"),
        }
    }
}

/// Server message mappings the client can publish to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Ready,
    Start,
    OpenCard,
    ActiveGame,
    Join,
    Leave,
    Presence,
    Status,
    MasterEnd,
}

impl Action {
    /// The last path segment of the action's destination.
    pub fn segment(self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Start => "start",
            Self::OpenCard => "open_card",
            Self::ActiveGame => "active_game",
            Self::Join => "join",
            Self::Leave => "leave",
            Self::Presence => "presence",
            Self::Status => "status",
            Self::MasterEnd => "master_end",
        }
    }
}

/// Where each inbound topic lives on the broker.
///
/// The active-game and private-info defaults are user queues: the broker
/// routes them to this client's session, so they carry no room code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicTemplates {
    pub players: String,
    pub active_game: String,
    pub private_info: String,
}

impl Default for TopicTemplates {
    fn default() -> Self {
        Self {
            players: "/topic/room/{roomCode}".to_string(),
            active_game: "/user/queue/active_game".to_string(),
            private_info: "/user/queue/game_private".to_string(),
        }
    }
}

impl TopicTemplates {
    fn template(&self, topic: Topic) -> &str {
        match topic {
            Topic::Players => &self.players,
            Topic::ActiveGame => &self.active_game,
            Topic::PrivateInfo => &self.private_info,
        }
    }
}

/// Resolves every destination for one room.
#[derive(Debug, Clone)]
pub struct Routes {
    room: RoomCode,
    topics: TopicTemplates,
}

impl Routes {
    /// Creates the routing table for `room`.
    pub fn new(room: RoomCode, topics: TopicTemplates) -> Self {
        Self { room, topics }
    }

    /// The room these routes are scoped to.
    pub fn room(&self) -> &RoomCode {
        &self.room
    }

    /// Destination of a command, e.g. `/app/room/ABCD/ready`.
    pub fn action(&self, action: Action) -> Destination {
        Destination::new(format!("{APP_PREFIX}/{}/{}", self.room, action.segment()))
    }

    /// Destination to subscribe to for an inbound topic.
    pub fn topic(&self, topic: Topic) -> Destination {
        Destination::new(
            self.topics
                .template(topic)
                .replace(ROOM_CODE_PLACEHOLDER, self.room.as_str()),
        )
    }
}
