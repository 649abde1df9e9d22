//! Housekeeping tasks.
//!
//! Besides the task list and details, each housekeeper has a scoped list
//! at `/api/task/housekeeper/<user id>`. Every write to a task refetches
//! the scoped list of the housekeeper it is assigned to, and an update that
//! reassigns it also refetches the new assignee's list. Callers pass the
//! current assignee explicitly.

use payloads::endpoints::{STATUS_ACTION, TASK};
use payloads::requests::{TaskFields, UpdateTaskStatus};
use payloads::{Task, TaskId, TaskPriority, TaskStatus, UserId};
use serde_json::Value;

use super::Resource;
use crate::{DataContext, MutationError};
use crate::cache::CacheKey;
use crate::hooks::{
    DetailHook, ListHook, MutationDef, MutationHook, Normalize, WriteRequest,
    use_detail, use_list, use_mutation,
};

pub const TASKS: Resource = Resource::new(TASK, "task");

const HOUSEKEEPER_SCOPE: &str = "housekeeper";

pub fn list_key() -> CacheKey {
    TASKS.list_key()
}

pub fn detail_key(id: &TaskId) -> Option<CacheKey> {
    TASKS.detail_key(id.as_str())
}

/// `/api/task/housekeeper/<id>`, or `None` for a blank id.
pub fn by_housekeeper_key(housekeeper_id: &UserId) -> Option<CacheKey> {
    CacheKey::scoped(&TASK, HOUSEKEEPER_SCOPE, housekeeper_id.as_str())
}

impl Normalize for Task {
    fn normalize(self) -> Self {
        Self {
            priority: self.priority.or(Some(TaskPriority::Medium)),
            status: self.status.or(Some(TaskStatus::Pending)),
            ..self
        }
    }
}

/// Input of a task update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskUpdate {
    pub task_id: TaskId,
    pub fields: TaskFields,
    /// The housekeeper the task is assigned to when the update is sent.
    /// A new assignee, if any, goes in `fields`.
    pub housekeeper_id: Option<UserId>,
}

/// Input of a task deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDelete {
    pub task_id: TaskId,
    pub housekeeper_id: Option<UserId>,
}

/// Input of a task status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskStatusChange {
    pub task_id: TaskId,
    pub status: TaskStatus,
    /// The assigned housekeeper, whose scoped list shows the status.
    pub housekeeper_id: Option<UserId>,
}

fn housekeeper_keys<'a>(
    ids: impl IntoIterator<Item = Option<&'a UserId>>,
) -> Vec<CacheKey> {
    let mut keys: Vec<CacheKey> = ids
        .into_iter()
        .flatten()
        .filter_map(by_housekeeper_key)
        .collect();
    keys.dedup();
    keys
}

pub fn use_tasks(ctx: &DataContext) -> ListHook<Task> {
    use_list(ctx, list_key())
}

pub fn use_task(ctx: &DataContext, id: Option<&TaskId>) -> DetailHook<Task> {
    use_detail(ctx, id.and_then(detail_key))
}

/// Tasks assigned to one housekeeper. No request is made until the id is
/// known.
pub fn use_housekeeper_tasks(
    ctx: &DataContext,
    housekeeper_id: Option<&UserId>,
) -> ListHook<Task> {
    use_list(ctx, housekeeper_id.and_then(by_housekeeper_key))
}

pub fn use_create_task(ctx: &DataContext) -> MutationHook<TaskFields, Task> {
    let def = TASKS.create().also_invalidates(|fields: &TaskFields| {
        housekeeper_keys([fields.housekeeper_id.as_ref()])
    });
    use_mutation(ctx, def)
}

pub fn update_task_def() -> MutationDef<TaskUpdate, Task> {
    MutationDef::new("update task", |update: &TaskUpdate| {
        if update.task_id.is_blank() {
            return Err(MutationError::InvalidInput(
                "task id is required".into(),
            ));
        }
        WriteRequest::put(
            TASK.detail_path(update.task_id.as_str()),
            &update.fields,
        )
    })
    .invalidates(|update: &TaskUpdate| {
        let mut keys = TASKS.record_keys(update.task_id.as_str());
        keys.extend(housekeeper_keys([
            update.housekeeper_id.as_ref(),
            update.fields.housekeeper_id.as_ref(),
        ]));
        keys
    })
    .messages("Task updated", "Could not update task")
}

pub fn use_update_task(ctx: &DataContext) -> MutationHook<TaskUpdate, Task> {
    use_mutation(ctx, update_task_def())
}

pub fn delete_task_def() -> MutationDef<TaskDelete, Value> {
    MutationDef::new("delete task", |delete: &TaskDelete| {
        if delete.task_id.is_blank() {
            return Err(MutationError::InvalidInput(
                "task id is required".into(),
            ));
        }
        Ok(WriteRequest::delete(TASK.detail_path(delete.task_id.as_str())))
    })
    .invalidates(|delete: &TaskDelete| {
        let mut keys = TASKS.record_keys(delete.task_id.as_str());
        keys.extend(housekeeper_keys([delete.housekeeper_id.as_ref()]));
        keys
    })
    .messages("Task deleted", "Could not delete task")
}

pub fn use_delete_task(ctx: &DataContext) -> MutationHook<TaskDelete, Value> {
    use_mutation(ctx, delete_task_def())
}

/// `PUT /api/task/status/<id>`
pub fn use_update_task_status(
    ctx: &DataContext,
) -> MutationHook<TaskStatusChange, Task> {
    let def = MutationDef::new("update task status", |change: &TaskStatusChange| {
        if change.task_id.is_blank() {
            return Err(MutationError::InvalidInput(
                "task id is required".into(),
            ));
        }
        WriteRequest::put(
            TASK.action_path(STATUS_ACTION, change.task_id.as_str()),
            &UpdateTaskStatus {
                status: change.status,
            },
        )
    })
    .invalidates(|change: &TaskStatusChange| {
        let mut keys = TASKS.record_keys(change.task_id.as_str());
        keys.extend(housekeeper_keys([change.housekeeper_id.as_ref()]));
        keys
    })
    .messages("Task status updated", "Could not update task status");
    use_mutation(ctx, def)
}
