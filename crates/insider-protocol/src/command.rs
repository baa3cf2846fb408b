//! Outbound command bodies, one per server message mapping.

use serde::{Deserialize, Serialize};

use crate::PlayerUuid;

/// Body for `/ready`: toggle the sender's ready flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadyCommand {
    pub player_uuid: PlayerUuid,
}

/// Body for `/start`: ask the server to start a round.
///
/// The server decides whether `trigger_by_uuid` may do so.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartCommand {
    pub trigger_by_uuid: PlayerUuid,
}

/// Body for `/open_card`: the sender revealed their role card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardOpenCommand {
    pub player_uuid: PlayerUuid,
}

/// Body for `/active_game`: pull a fresh snapshot for the sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRequest {
    pub player_uuid: PlayerUuid,
}

/// Body for `/join`. The server falls back to the uuid when no name is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinCommand {
    pub player_uuid: PlayerUuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
}

/// Body for `/leave`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveCommand {
    pub player_uuid: PlayerUuid,
}

/// Body for `/presence`: keep-alive that marks the sender active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceCommand {
    pub player_uuid: PlayerUuid,
}

/// Body for `/status`: page visibility changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCommand {
    pub player_uuid: PlayerUuid,
    pub active: bool,
}

/// Body for `/master_end`: the MASTER ends the question phase early.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterEndCommand {
    pub player_uuid: PlayerUuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p1() -> PlayerUuid {
        PlayerUuid::parse("p1").unwrap()
    }

    #[test]
    fn test_ready_command_json_format() {
        let json = serde_json::to_string(&ReadyCommand { player_uuid: p1() }).unwrap();
        assert_eq!(json, r#"{"playerUuid":"p1"}"#);
    }

    #[test]
    fn test_start_command_uses_trigger_field() {
        let json = serde_json::to_string(&StartCommand {
            trigger_by_uuid: p1(),
        })
        .unwrap();
        assert_eq!(json, r#"{"triggerByUuid":"p1"}"#);
    }

    #[test]
    fn test_join_command_omits_missing_name() {
        let anonymous = JoinCommand {
            player_uuid: p1(),
            player_name: None,
        };
        assert_eq!(
            serde_json::to_string(&anonymous).unwrap(),
            r#"{"playerUuid":"p1"}"#
        );

        let named = JoinCommand {
            player_uuid: p1(),
            player_name: Some("Alice".into()),
        };
        let json: serde_json::Value = serde_json::to_value(&named).unwrap();
        assert_eq!(json["playerName"], "Alice");
    }

    #[test]
    fn test_status_command_json_format() {
        let json: serde_json::Value = serde_json::to_value(StatusCommand {
            player_uuid: p1(),
            active: false,
        })
        .unwrap();
        assert_eq!(json["playerUuid"], "p1");
        assert_eq!(json["active"], false);
    }
}
