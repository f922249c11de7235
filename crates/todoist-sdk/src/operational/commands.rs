//! Task moves through the sync command endpoint.
//!
//! The REST surface has no move endpoint, so a move is one `item_move`
//! command submitted as a batch of one. Only an explicit `"ok"` for the
//! command's uuid counts as success.

use todoist_client::{
    CommandArgs, CommandStatus, CommandType, ItemMoveArgs, SyncCommand, TodoistApi,
};
use tracing::{info, warn};
use uuid::Uuid;

use super::normalize::MoveDestination;
use super::outcome::{ToolError, ToolResult};

pub fn build_move_command(task_id: &str, destination: &MoveDestination) -> SyncCommand {
    let mut args = ItemMoveArgs {
        id: task_id.to_string(),
        parent_id: None,
        section_id: None,
        project_id: None,
    };
    match destination {
        MoveDestination::Parent(id) => args.parent_id = Some(id.clone()),
        MoveDestination::Section(id) => args.section_id = Some(id.clone()),
        MoveDestination::Project(id) => args.project_id = Some(id.clone()),
    }
    SyncCommand {
        command_type: CommandType::ItemMove,
        uuid: Uuid::new_v4(),
        args: CommandArgs::ItemMove(args),
    }
}

pub async fn submit_move(
    api: &dyn TodoistApi,
    task_id: &str,
    destination: &MoveDestination,
) -> ToolResult<()> {
    let command = build_move_command(task_id, destination);
    let response = api.submit_commands(std::slice::from_ref(&command)).await?;

    match response.status_of(&command.uuid) {
        CommandStatus::Ok => {
            info!(task_id, uuid = %command.uuid, "Move command accepted");
            Ok(())
        }
        CommandStatus::Failed(status) => {
            warn!(task_id, uuid = %command.uuid, %status, "Move command rejected");
            Err(ToolError::CommandRejected {
                status: status.to_string(),
            })
        }
        CommandStatus::Missing => {
            warn!(task_id, uuid = %command.uuid, "Move command missing from sync_status");
            Err(ToolError::CommandRejected {
                status: "missing".to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use todoist_client::testing::{CommandReply, InMemoryTodoist};

    #[test]
    fn test_command_names_one_destination() {
        let command = build_move_command("t1", &MoveDestination::Project("p2".into()));
        let value = serde_json::to_value(&command).unwrap();
        assert_eq!(value["type"], "item_move");
        assert_eq!(value["args"], serde_json::json!({"id": "t1", "project_id": "p2"}));
    }

    #[test]
    fn test_fresh_uuid_per_command() {
        let destination = MoveDestination::Section("s1".into());
        let a = build_move_command("t1", &destination);
        let b = build_move_command("t1", &destination);
        assert_ne!(a.uuid, b.uuid);
    }

    #[tokio::test]
    async fn test_ok_status_moves_task() {
        let api = InMemoryTodoist::new();
        let task = api.seed_task("Buy milk");
        submit_move(&api, &task.id, &MoveDestination::Section("s9".into()))
            .await
            .unwrap();
        assert_eq!(api.task(&task.id).unwrap().section_id.as_deref(), Some("s9"));
    }

    #[tokio::test]
    async fn test_error_status_is_rejection() {
        let api = InMemoryTodoist::new();
        let task = api.seed_task("Buy milk");
        api.set_command_reply(CommandReply::Status(
            serde_json::json!({"error_code": 20, "error": "Project not found"}),
        ));
        let err = submit_move(&api, &task.id, &MoveDestination::Project("nope".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::CommandRejected { .. }));
        assert!(err.message("moving task").contains("Project not found"));
        assert_eq!(api.task(&task.id).unwrap().project_id, None);
    }

    #[tokio::test]
    async fn test_missing_status_is_rejection() {
        let api = InMemoryTodoist::new();
        api.set_command_reply(CommandReply::Omit);
        let err = submit_move(&api, "t1", &MoveDestination::Parent("t0".into()))
            .await
            .unwrap_err();
        assert_eq!(
            err.message("moving task"),
            "Error moving task: command status missing"
        );
    }
}
