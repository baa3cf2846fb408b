//! The locally mirrored room state and its reducer.
//!
//! Each inbound topic owns exactly one field of [`RoomView`]. A payload is
//! decoded first and only then swapped in, so a malformed frame leaves the
//! previous value untouched, and a frame on one topic can never disturb the
//! field of another.

use std::time::Instant;

use insider_protocol::{
    ActiveGameEnvelope, Codec, GamePrivateInfo, GameSnapshot, Player, ProtocolError,
    RoomUpdate, Topic,
};

/// Marks the most recent field replacement.
///
/// `seq` grows by one per replacement. It tells consumers whether they are
/// looking at stale data; it says nothing about the order the server sent
/// events in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastUpdate {
    pub seq: u64,
    pub at: Instant,
}

/// What a reduced event changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChange {
    /// The broker session came up (`true`) or went down (`false`).
    Connection(bool),
    /// The roster was replaced.
    Players,
    /// The active-game snapshot was replaced (possibly with "no game").
    ActiveGame,
    /// The private role/word was replaced.
    PrivateInfo,
}

/// Everything the client knows about the room.
#[derive(Debug, Clone, Default)]
pub struct RoomView {
    roster: Option<RoomUpdate>,
    active_game: Option<GameSnapshot>,
    private_info: Option<GamePrivateInfo>,
    last_update: Option<LastUpdate>,
}

impl RoomView {
    /// Creates an empty view.
    pub fn new() -> Self {
        Self::default()
    }

    /// The last roster broadcast, including room metadata.
    pub fn roster(&self) -> Option<&RoomUpdate> {
        self.roster.as_ref()
    }

    /// Players in server order. Empty until the first roster arrives.
    pub fn players(&self) -> &[Player] {
        self.roster
            .as_ref()
            .map(|r| r.players.as_slice())
            .unwrap_or_default()
    }

    /// The round in progress, if the server reported one.
    pub fn active_game(&self) -> Option<&GameSnapshot> {
        self.active_game.as_ref()
    }

    /// This player's secret role and word.
    pub fn private_info(&self) -> Option<&GamePrivateInfo> {
        self.private_info.as_ref()
    }

    pub fn last_update(&self) -> Option<LastUpdate> {
        self.last_update
    }

    /// Decodes `body` as the payload of `topic` and replaces that field.
    ///
    /// # Errors
    /// Returns the decode error without touching any field.
    pub fn fold<C: Codec>(
        &mut self,
        codec: &C,
        topic: Topic,
        body: &[u8],
    ) -> Result<StateChange, ProtocolError> {
        match topic {
            Topic::Players => {
                self.roster = Some(codec.decode::<RoomUpdate>(body)?);
                self.touch();
                Ok(StateChange::Players)
            }
            Topic::ActiveGame => {
                let envelope: ActiveGameEnvelope = codec.decode(body)?;
                self.active_game = envelope.game;
                self.touch();
                Ok(StateChange::ActiveGame)
            }
            Topic::PrivateInfo => {
                self.private_info = Some(codec.decode::<GamePrivateInfo>(body)?);
                self.touch();
                Ok(StateChange::PrivateInfo)
            }
        }
    }

    fn touch(&mut self) {
        let seq = self.last_update.map_or(1, |u| u.seq + 1);
        self.last_update = Some(LastUpdate {
            seq,
            at: Instant::now(),
        });
    }
}
