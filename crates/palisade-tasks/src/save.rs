//! Task progress persistence.

use palisade_common::ids::TaskId;
use palisade_common::slot::SlotKey;
use serde::{Deserialize, Serialize};

/// Slot the task progress record persists under.
pub const TASK_SLOT: SlotKey = SlotKey::new("task_progress", 0);

/// Durable snapshot of task progress, written after every mutation.
///
/// Only the identity and cursor are saved; the objectives themselves are
/// design-time content resolved back through the registry on restore. A
/// `None` task ID means no task was active.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskProgressSave {
    /// Identity of the active task, if any.
    pub task_id: Option<TaskId>,
    /// Index of the objective the cursor is on.
    pub objective_index: u32,
    /// Progress count within that objective.
    pub objective_count: u32,
}
