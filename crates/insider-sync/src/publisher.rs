//! Outbound commands for a connected client.

use insider_protocol::{
    Action, CardOpenCommand, Codec, JoinCommand, LeaveCommand, MasterEndCommand, PlayerUuid,
    PresenceCommand, ReadyCommand, Routes, SnapshotRequest, StartCommand, StatusCommand,
};
use insider_transport::Link;
use serde::Serialize;

/// Publishes commands on behalf of the local player.
///
/// A `Publisher` borrows a link that has an established broker session, so
/// holding one is proof that publishes can be attempted. Obtain it from
/// [`RoomSyncClient::publisher`](crate::RoomSyncClient::publisher).
///
/// Every command is fire-and-forget: a frame the transport refuses is
/// logged at `warn` and dropped, and nothing reports back to the caller.
pub struct Publisher<'a, L, C> {
    link: &'a L,
    routes: &'a Routes,
    player: &'a PlayerUuid,
    codec: &'a C,
    refresh_on_action: bool,
}

impl<'a, L: Link, C: Codec> Publisher<'a, L, C> {
    pub(crate) fn new(
        link: &'a L,
        routes: &'a Routes,
        player: &'a PlayerUuid,
        codec: &'a C,
        refresh_on_action: bool,
    ) -> Self {
        Self {
            link,
            routes,
            player,
            codec,
            refresh_on_action,
        }
    }

    /// Flips the player's ready flag.
    pub fn toggle_ready(&self) {
        self.send(
            Action::Ready,
            &ReadyCommand {
                player_uuid: self.player.clone(),
            },
        )
    }

    /// Asks the server to start a round with this player as the trigger.
    pub fn start_game(&self) {
        self.send(
            Action::Start,
            &StartCommand {
                trigger_by_uuid: self.player.clone(),
            },
        )
    }

    /// Reports that the player revealed their card.
    ///
    /// With `refresh_on_action` enabled a snapshot pull follows. The two
    /// publishes are independent: a failed card-open does not suppress the
    /// pull, and nothing waits for either to be acknowledged.
    pub fn open_card(&self) {
        self.send(
            Action::OpenCard,
            &CardOpenCommand {
                player_uuid: self.player.clone(),
            },
        );
        if self.refresh_on_action {
            self.request_snapshot();
        }
    }

    /// Asks the server to push a fresh active-game snapshot.
    pub fn request_snapshot(&self) {
        self.send(
            Action::ActiveGame,
            &SnapshotRequest {
                player_uuid: self.player.clone(),
            },
        )
    }

    /// Announces the player to the room, optionally with a display name.
    pub fn join(&self, player_name: Option<&str>) {
        self.send(
            Action::Join,
            &JoinCommand {
                player_uuid: self.player.clone(),
                player_name: player_name.map(str::to_owned),
            },
        )
    }

    pub fn leave_room(&self) {
        self.send(
            Action::Leave,
            &LeaveCommand {
                player_uuid: self.player.clone(),
            },
        )
    }

    /// Keep-alive; marks the player active.
    pub fn ping_presence(&self) {
        self.send(
            Action::Presence,
            &PresenceCommand {
                player_uuid: self.player.clone(),
            },
        )
    }

    /// Reports whether the player's page is in the foreground.
    pub fn set_active(&self, active: bool) {
        self.send(
            Action::Status,
            &StatusCommand {
                player_uuid: self.player.clone(),
                active,
            },
        )
    }

    /// Ends the question phase early. The server ignores it unless the
    /// player is the MASTER.
    pub fn end_round(&self) {
        self.send(
            Action::MasterEnd,
            &MasterEndCommand {
                player_uuid: self.player.clone(),
            },
        )
    }

    fn send<T: Serialize>(&self, action: Action, command: &T) {
        let destination = self.routes.action(action);
        let body = match self.codec.encode(command) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(%destination, error = %e, "failed to encode command");
                return;
            }
        };
        match self.link.publish(&destination, &body) {
            Ok(()) => tracing::debug!(%destination, player = %self.player, "published"),
            Err(e) => tracing::warn!(%destination, error = %e, "publish failed"),
        }
    }
}
