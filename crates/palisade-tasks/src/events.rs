//! Task notifications.

use palisade_common::ids::TaskId;
use serde::{Deserialize, Serialize};

/// Notifications broadcast by the task coordinator.
///
/// Reward handouts and UI updates live outside this crate; they listen here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskEvent {
    /// A task became active (replacing any previous one).
    Started {
        /// The task that started.
        task_id: TaskId,
    },
    /// The cursor moved to the next objective.
    ObjectiveAdvanced {
        /// The active task.
        task_id: TaskId,
        /// Index of the objective the cursor moved to.
        objective_index: u32,
    },
    /// The final objective completed and the task finished.
    Completed {
        /// The task that finished.
        task_id: TaskId,
    },
}
