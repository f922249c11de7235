//! Wire types for the synchronous command endpoint.
//!
//! Commands are posted as a JSON list of `{type, uuid, args}` records and
//! acknowledged per `uuid` in the response's `sync_status` map.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Command type tags understood by the command endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandType {
    ItemMove,
}

/// Arguments of an `item_move` command: the task and exactly one destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemMoveArgs {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandArgs {
    ItemMove(ItemMoveArgs),
}

/// One idempotency-tagged command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncCommand {
    #[serde(rename = "type")]
    pub command_type: CommandType,
    pub uuid: Uuid,
    pub args: CommandArgs,
}

/// Per-command acknowledgment.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandStatus {
    Ok,
    Failed(Value),
    Missing,
}

/// Command endpoint response. Fields other than `sync_status` are kept
/// verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncResponse {
    #[serde(default)]
    pub sync_status: HashMap<String, Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl SyncResponse {
    /// Status for one submitted command. Only the literal string `"ok"`
    /// counts as success.
    pub fn status_of(&self, uuid: &Uuid) -> CommandStatus {
        match self.sync_status.get(&uuid.to_string()) {
            Some(Value::String(s)) if s == "ok" => CommandStatus::Ok,
            Some(other) => CommandStatus::Failed(other.clone()),
            None => CommandStatus::Missing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn move_command(uuid: Uuid) -> SyncCommand {
        SyncCommand {
            command_type: CommandType::ItemMove,
            uuid,
            args: CommandArgs::ItemMove(ItemMoveArgs {
                id: "t1".into(),
                parent_id: None,
                section_id: Some("s9".into()),
                project_id: None,
            }),
        }
    }

    #[test]
    fn test_command_wire_shape() {
        let uuid = Uuid::new_v4();
        let value = serde_json::to_value(move_command(uuid)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "type": "item_move",
                "uuid": uuid.to_string(),
                "args": {"id": "t1", "section_id": "s9"}
            })
        );
    }

    #[test]
    fn test_status_of() {
        let ok = Uuid::new_v4();
        let failed = Uuid::new_v4();
        let response: SyncResponse = serde_json::from_value(serde_json::json!({
            "sync_status": {
                ok.to_string(): "ok",
                failed.to_string(): {"error_code": 20, "error": "Item not found"}
            },
            "full_sync": false
        }))
        .unwrap();

        assert_eq!(response.status_of(&ok), CommandStatus::Ok);
        assert!(matches!(response.status_of(&failed), CommandStatus::Failed(_)));
        assert_eq!(response.status_of(&Uuid::new_v4()), CommandStatus::Missing);
        assert_eq!(response.extra["full_sync"], false);
    }

    #[test]
    fn test_non_ok_string_is_failure() {
        let uuid = Uuid::new_v4();
        let mut response = SyncResponse::default();
        response
            .sync_status
            .insert(uuid.to_string(), Value::String("pending".into()));
        assert_eq!(
            response.status_of(&uuid),
            CommandStatus::Failed(Value::String("pending".into()))
        );
    }
}
