//! Client configuration.

use insider_protocol::TopicTemplates;
use serde::{Deserialize, Serialize};

/// Configuration for a [`RoomSyncClient`](crate::RoomSyncClient).
///
/// Missing fields fall back to their defaults when deserialized, so a host
/// application can keep a partial section in its own config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Follow every card-open command with a snapshot pull.
    ///
    /// The server also pushes a snapshot after a card opens, but that push
    /// can be lost or can race the client's subscription. The pull asks for
    /// the authoritative view directly, so the card state converges even
    /// when the broadcast does not arrive. Default: `true`.
    pub refresh_on_action: bool,

    /// Where the inbound topics live on the broker.
    pub topics: TopicTemplates,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            refresh_on_action: true,
            topics: TopicTemplates::default(),
        }
    }
}

impl SyncConfig {
    /// Enables or disables the snapshot pull after card-open commands.
    pub fn with_refresh_on_action(mut self, enabled: bool) -> Self {
        self.refresh_on_action = enabled;
        self
    }

    /// Overrides the inbound topic templates.
    pub fn with_topics(mut self, topics: TopicTemplates) -> Self {
        self.topics = topics;
        self
    }
}
