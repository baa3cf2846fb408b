//! Identifiers and the inbound event payloads pushed by the room server.
//!
//! The server is a Spring/STOMP application, so every payload is
//! camelCase JSON. Enums use the server's SCREAMING_SNAKE_CASE names.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Null handling
// ---------------------------------------------------------------------------

// The server serializes with Jackson's defaults, which write unset fields as
// explicit `null`s. `#[serde(default)]` only covers a missing key, so these
// helpers give `null` the same meaning.

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A map whose values may be `null`; those entries are skipped.
fn skip_null_values<'de, D, V>(deserializer: D) -> Result<BTreeMap<PlayerUuid, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    let raw: Option<BTreeMap<PlayerUuid, Option<V>>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(uuid, value)| value.map(|v| (uuid, v)))
        .collect())
}

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// The code that scopes every destination of one room session.
///
/// Room codes are interpolated into destination paths, so only ASCII
/// letters and digits are accepted (the server issues six-character
/// upper-case codes such as `ABC123`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    /// Validates and wraps a room code.
    ///
    /// # Errors
    /// Returns `ProtocolError::InvalidIdentifier` if the code is empty or
    /// contains anything other than ASCII alphanumerics.
    pub fn parse(code: impl Into<String>) -> Result<Self, ProtocolError> {
        let code = code.into();
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ProtocolError::InvalidIdentifier {
                kind: "room code",
                value: code,
            });
        }
        Ok(Self(code))
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The local participant's identity, attached to every outbound command.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerUuid(String);

impl PlayerUuid {
    /// Validates and wraps a player uuid.
    ///
    /// # Errors
    /// Returns `ProtocolError::InvalidIdentifier` if the uuid is empty or
    /// contains whitespace.
    pub fn parse(uuid: impl Into<String>) -> Result<Self, ProtocolError> {
        let uuid = uuid.into();
        if uuid.is_empty() || uuid.chars().any(char::is_whitespace) {
            return Err(ProtocolError::InvalidIdentifier {
                kind: "player uuid",
                value: uuid,
            });
        }
        Ok(Self(uuid))
    }

    /// Returns the uuid as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// A player's secret role in a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Knows the word and answers questions.
    Master,
    /// Knows the word and hides among the citizens.
    Insider,
    /// Has to guess the word.
    Citizen,
}

impl Role {
    /// Returns `true` if the server reveals the word to this role.
    pub fn sees_word(self) -> bool {
        matches!(self, Self::Master | Self::Insider)
    }
}

/// Lifecycle status of a room as reported by the server.
///
/// Unknown statuses decode as [`RoomStatus::Other`] so a newer server does
/// not make every roster update undecodable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomStatus {
    Waiting,
    Playing,
    Finished,
    #[serde(other)]
    Other,
}

/// Why the server broadcast a roster update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomEventKind {
    PlayerJoined,
    PlayerLeft,
    PlayerReady,
    RoomUpdate,
    RoomPlaying,
    GameStarted,
    GameFinished,
    VoteStarted,
    RoomResetAfterGame,
    #[default]
    #[serde(other)]
    Other,
}

// ---------------------------------------------------------------------------
// Players topic
// ---------------------------------------------------------------------------

/// One participant as listed in a roster update.
///
/// The boolean flags accept both the `isReady` spelling and the bare
/// `ready` spelling some server serializers emit for `isX` fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub uuid: PlayerUuid,
    pub player_name: Option<String>,
    #[serde(alias = "host", default, deserialize_with = "null_as_default")]
    pub is_host: bool,
    #[serde(alias = "ready", default, deserialize_with = "null_as_default")]
    pub is_ready: bool,
    #[serde(alias = "playing", default, deserialize_with = "null_as_default")]
    pub is_playing: bool,
    #[serde(alias = "active", default, deserialize_with = "null_as_default")]
    pub is_active: bool,
    pub joined_at: Option<String>,
    pub last_active_at: Option<String>,
}

/// A full roster broadcast on the room's players topic.
///
/// `players` is required: a frame without it is treated as malformed
/// rather than as an empty room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomUpdate {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: RoomEventKind,
    pub room_code: Option<String>,
    pub room_name: Option<String>,
    pub max_players: Option<u32>,
    pub current_players: Option<u32>,
    pub status: Option<RoomStatus>,
    pub host_uuid: Option<PlayerUuid>,
    pub players: Vec<Player>,
    pub message: Option<String>,
}

impl RoomUpdate {
    /// Looks up a player in the roster.
    pub fn player(&self, uuid: &PlayerUuid) -> Option<&Player> {
        self.players.iter().find(|p| &p.uuid == uuid)
    }

    /// Returns `true` if the roster is non-empty and everyone is ready.
    pub fn all_ready(&self) -> bool {
        !self.players.is_empty() && self.players.iter().all(|p| p.is_ready)
    }
}

// ---------------------------------------------------------------------------
// Active-game and private-info queues
// ---------------------------------------------------------------------------

/// Player-private data delivered only to its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GamePrivateInfo {
    pub player_uuid: PlayerUuid,
    pub role: Role,
    /// Empty for citizens.
    #[serde(default, deserialize_with = "null_as_default")]
    pub word: String,
}

/// The server's per-player view of the round in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub id: Option<String>,
    pub room_code: Option<String>,
    /// Empty unless the viewer's role sees the word.
    #[serde(default, deserialize_with = "null_as_default")]
    pub word: String,
    #[serde(default, deserialize_with = "skip_null_values")]
    pub roles: BTreeMap<PlayerUuid, Role>,
    pub started_at: Option<String>,
    pub ends_at: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub duration_seconds: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub finished: bool,
    /// A `null` flag is treated as "not opened yet" and left out.
    #[serde(default, deserialize_with = "skip_null_values")]
    pub card_opened: BTreeMap<PlayerUuid, bool>,
    pub private_message: Option<GamePrivateInfo>,
}

impl GameSnapshot {
    /// Returns the role assigned to `uuid`, if they take part in the round.
    pub fn role_of(&self, uuid: &PlayerUuid) -> Option<Role> {
        self.roles.get(uuid).copied()
    }

    /// Returns `true` if `uuid` has opened their card.
    pub fn has_opened(&self, uuid: &PlayerUuid) -> bool {
        self.card_opened.get(uuid).copied().unwrap_or(false)
    }

    /// Returns `true` once every participant has opened their card.
    pub fn all_cards_opened(&self) -> bool {
        !self.card_opened.is_empty() && self.card_opened.values().all(|opened| *opened)
    }
}

/// Body of the active-game queue: `{"game": {...}}` or `{"game": null}`.
///
/// A `null` game means the room has no round in progress (the server sends
/// it after a room reset).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveGameEnvelope {
    pub game: Option<GameSnapshot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uuid(s: &str) -> PlayerUuid {
        PlayerUuid::parse(s).unwrap()
    }

    // =====================================================================
    // Identifiers
    // =====================================================================

    #[test]
    fn test_room_code_accepts_alphanumeric() {
        assert_eq!(RoomCode::parse("ABC123").unwrap().as_str(), "ABC123");
        assert_eq!(RoomCode::parse("ABCD").unwrap().to_string(), "ABCD");
    }

    #[test]
    fn test_room_code_rejects_path_characters() {
        for bad in ["", "AB/CD", "AB CD", "ABCD*", "../x"] {
            assert!(
                matches!(
                    RoomCode::parse(bad),
                    Err(ProtocolError::InvalidIdentifier { kind: "room code", .. })
                ),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_player_uuid_rejects_blank() {
        assert!(PlayerUuid::parse("").is_err());
        assert!(PlayerUuid::parse("p 1").is_err());
        assert!(PlayerUuid::parse("3f2a-11").is_ok());
    }

    #[test]
    fn test_player_uuid_serializes_as_plain_string() {
        let json = serde_json::to_string(&uuid("p1")).unwrap();
        assert_eq!(json, "\"p1\"");
    }

    // =====================================================================
    // Roster
    // =====================================================================

    #[test]
    fn test_room_update_decodes_server_shape() {
        let json = r#"{
            "type": "PLAYER_READY",
            "roomCode": "ABCD",
            "roomName": "Friday",
            "maxPlayers": 8,
            "currentPlayers": 2,
            "status": "WAITING",
            "players": [
                {"uuid": "p1", "playerName": "Alice", "isHost": true, "isReady": true},
                {"uuid": "p2", "playerName": "Bob", "ready": false, "active": true}
            ],
            "message": "A player updated ready status"
        }"#;
        let update: RoomUpdate = serde_json::from_str(json).unwrap();

        assert_eq!(update.kind, RoomEventKind::PlayerReady);
        assert_eq!(update.status, Some(RoomStatus::Waiting));
        assert_eq!(update.players.len(), 2);
        assert!(update.players[0].is_host);
        assert!(update.players[1].is_active);
        assert!(!update.all_ready());
        assert_eq!(
            update.player(&uuid("p2")).and_then(|p| p.player_name.as_deref()),
            Some("Bob")
        );
    }

    #[test]
    fn test_room_update_unknown_kind_and_status_fall_back() {
        let json = r#"{"type": "SOMETHING_NEW", "status": "ARCHIVED", "players": []}"#;
        let update: RoomUpdate = serde_json::from_str(json).unwrap();
        assert_eq!(update.kind, RoomEventKind::Other);
        assert_eq!(update.status, Some(RoomStatus::Other));
    }

    #[test]
    fn test_room_update_with_jackson_nulls() {
        // Shape of the word-reveal broadcast: no event type, unset fields
        // written out as null.
        let json = r#"{
            "type": null,
            "roomCode": "ABCD",
            "roomName": null,
            "maxPlayers": null,
            "currentPlayers": null,
            "status": "PLAYING",
            "hostUuid": "p1",
            "players": [
                {"uuid": "p1", "playerName": null, "isHost": null, "isReady": true,
                 "joinedAt": null}
            ],
            "message": "WORD_REVEALED"
        }"#;
        let update: RoomUpdate = serde_json::from_str(json).unwrap();

        assert_eq!(update.kind, RoomEventKind::Other);
        assert_eq!(update.status, Some(RoomStatus::Playing));
        assert_eq!(update.players.len(), 1);
        assert!(!update.players[0].is_host);
        assert!(update.players[0].is_ready);
        assert_eq!(update.message.as_deref(), Some("WORD_REVEALED"));
    }

    #[test]
    fn test_room_update_without_players_is_rejected() {
        let result: Result<RoomUpdate, _> = serde_json::from_str(r#"{"type": "ROOM_UPDATE"}"#);
        assert!(result.is_err());
    }

    // =====================================================================
    // Active game
    // =====================================================================

    #[test]
    fn test_active_game_envelope_with_snapshot() {
        let json = r#"{"game": {
            "id": "g-1",
            "roomCode": "ABCD",
            "word": "",
            "roles": {"p1": "MASTER", "p2": "CITIZEN"},
            "durationSeconds": 300,
            "finished": false,
            "cardOpened": {"p1": true, "p2": false},
            "privateMessage": {"playerUuid": "p2", "role": "CITIZEN", "word": ""}
        }}"#;
        let envelope: ActiveGameEnvelope = serde_json::from_str(json).unwrap();
        let game = envelope.game.unwrap();

        assert_eq!(game.role_of(&uuid("p1")), Some(Role::Master));
        assert!(game.has_opened(&uuid("p1")));
        assert!(!game.has_opened(&uuid("p2")));
        assert!(!game.has_opened(&uuid("nobody")));
        assert!(!game.all_cards_opened());
        assert_eq!(game.private_message.map(|pm| pm.role), Some(Role::Citizen));
    }

    #[test]
    fn test_snapshot_with_jackson_nulls() {
        let json = r#"{"game": {
            "id": null,
            "roomCode": "ABCD",
            "word": null,
            "roles": {"p1": "MASTER", "p2": null},
            "startedAt": null,
            "endsAt": null,
            "durationSeconds": null,
            "finished": null,
            "cardOpened": {"p1": true, "p2": null},
            "privateMessage": null
        }}"#;
        let envelope: ActiveGameEnvelope = serde_json::from_str(json).unwrap();
        let game = envelope.game.unwrap();

        assert_eq!(game.word, "");
        assert_eq!(game.duration_seconds, 0);
        assert!(!game.finished);
        assert_eq!(game.role_of(&uuid("p1")), Some(Role::Master));
        assert_eq!(game.role_of(&uuid("p2")), None);
        assert!(game.has_opened(&uuid("p1")));
        assert!(!game.has_opened(&uuid("p2")));
    }

    #[test]
    fn test_snapshot_with_null_maps() {
        let json = r#"{"game": {"word": "owl", "roles": null, "cardOpened": null}}"#;
        let envelope: ActiveGameEnvelope = serde_json::from_str(json).unwrap();
        let game = envelope.game.unwrap();
        assert!(game.roles.is_empty());
        assert!(game.card_opened.is_empty());
    }

    #[test]
    fn test_private_info_null_word_is_empty() {
        let json = r#"{"playerUuid": "p3", "role": "CITIZEN", "word": null}"#;
        let info: GamePrivateInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.word, "");
    }

    #[test]
    fn test_active_game_envelope_null_game() {
        let envelope: ActiveGameEnvelope = serde_json::from_str(r#"{"game": null}"#).unwrap();
        assert!(envelope.game.is_none());
    }

    #[test]
    fn test_role_word_visibility() {
        assert!(Role::Master.sees_word());
        assert!(Role::Insider.sees_word());
        assert!(!Role::Citizen.sees_word());
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let json = r#"{"playerUuid": "p1", "role": "JESTER", "word": ""}"#;
        let result: Result<GamePrivateInfo, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
