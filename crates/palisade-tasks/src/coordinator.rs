//! Task coordinator.
//!
//! Holds the single active task and the cursor over its objectives. Gameplay
//! code reports events; the coordinator counts them against the current
//! objective only, advances the cursor when the objective completes, and
//! persists a progress snapshot after every mutation.

use crate::data::{Objective, ObjectiveKind, TaskDefinition};
use crate::events::TaskEvent;
use crate::registry::TaskRegistry;
use crate::save::{TaskProgressSave, TASK_SLOT};
use palisade_common::events::EventBus;
use palisade_common::ids::{EntityId, ItemId, TaskId};
use palisade_common::slot::{load_from_slot, save_to_slot, SlotStorage};
use std::sync::Arc;
use tracing::{info, warn};

/// Runtime state of the task the cursor is walking.
#[derive(Debug, Clone)]
struct ActiveTask {
    definition: Arc<TaskDefinition>,
    objective_index: usize,
    objective_count: u32,
}

/// Where an event left the active task.
enum Progress {
    Counted,
    Advanced { task_id: TaskId, index: u32 },
    Completed { task_id: TaskId },
}

/// Snapshot of the current objective for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectiveStatus {
    /// Index of the objective the cursor is on.
    pub objective_index: usize,
    /// Progress count so far.
    pub objective_count: u32,
    /// Count required to complete the objective.
    pub target_count: u32,
    /// Objective name for display.
    pub name: String,
}

/// Coordinator for linear task progression.
pub struct TaskCoordinator<S> {
    registry: TaskRegistry,
    active: Option<ActiveTask>,
    storage: S,
    bus: EventBus<TaskEvent>,
}

impl<S: SlotStorage> TaskCoordinator<S> {
    /// Creates a coordinator over a populated registry and slot storage.
    ///
    /// Call [`initialize`](Self::initialize) before use to restore any
    /// persisted progress.
    #[must_use]
    pub fn new(registry: TaskRegistry, storage: S) -> Self {
        Self {
            registry,
            active: None,
            storage,
            bus: EventBus::default(),
        }
    }

    /// Restores persisted progress, if any.
    ///
    /// The saved task identity is resolved through the registry. An identity
    /// the registry no longer knows, or a cursor past the definition's end,
    /// logs a warning and leaves the coordinator idle.
    pub fn initialize(&mut self) {
        let save = match load_from_slot::<TaskProgressSave>(&self.storage, TASK_SLOT) {
            Ok(Some(save)) => save,
            Ok(None) => return,
            Err(e) => {
                warn!(error = %e, "failed to load task progress");
                return;
            }
        };
        let Some(task_id) = save.task_id else {
            return;
        };
        let Some(definition) = self.registry.get(&task_id) else {
            warn!(task = %task_id, "saved task not in registry, progress discarded");
            return;
        };
        let index = save.objective_index as usize;
        if index >= definition.objectives.len() {
            warn!(task = %task_id, index, "saved objective index out of range, progress discarded");
            return;
        }

        info!(task = %task_id, objective = index, "task progress restored");
        self.active = Some(ActiveTask {
            definition,
            objective_index: index,
            objective_count: save.objective_count,
        });
    }

    /// Starts a task, unconditionally replacing any active one.
    ///
    /// The cursor moves to the first objective with zero progress, the
    /// snapshot is persisted, and [`TaskEvent::Started`] is broadcast.
    pub fn start_task(&mut self, definition: Arc<TaskDefinition>) {
        let task_id = definition.id.clone();
        self.active = Some(ActiveTask {
            definition,
            objective_index: 0,
            objective_count: 0,
        });
        self.persist();
        info!(task = %task_id, "task started");
        self.bus.publish(TaskEvent::Started { task_id });
    }

    /// Starts a registered task by ID.
    ///
    /// Returns false (and changes nothing) when the ID is not registered.
    pub fn start_task_by_id(&mut self, id: &TaskId) -> bool {
        match self.registry.get(id) {
            Some(definition) => {
                self.start_task(definition);
                true
            }
            None => {
                warn!(task = %id, "cannot start unregistered task");
                false
            }
        }
    }

    /// Reports a defeated enemy. Counts one toward the current objective
    /// when it is a kill objective; ignored otherwise.
    pub fn notify_enemy_killed(&mut self, _enemy: EntityId) {
        self.record_event(ObjectiveKind::KillEnemy, false);
    }

    /// Reports a collected item. Counts one toward the current objective
    /// when it is a collect objective; item identity is not checked.
    pub fn notify_item_collected(&mut self, _item: &ItemId) {
        self.record_event(ObjectiveKind::CollectItem, false);
    }

    /// Reports arrival at the designated location. Completes the current
    /// objective outright when it is a reach objective; ignored otherwise.
    pub fn notify_reached_location(&mut self) {
        self.record_event(ObjectiveKind::ReachLocation, true);
    }

    /// Returns true while a task is active.
    #[must_use]
    pub const fn is_task_active(&self) -> bool {
        self.active.is_some()
    }

    /// Returns the active task's identity.
    #[must_use]
    pub fn active_task_id(&self) -> Option<&TaskId> {
        self.active.as_ref().map(|active| &active.definition.id)
    }

    /// Returns the current objective's progress for UI, or `None` when idle.
    #[must_use]
    pub fn objective_status(&self) -> Option<ObjectiveStatus> {
        let active = self.active.as_ref()?;
        let objective = self.current_objective(active)?;
        Some(ObjectiveStatus {
            objective_index: active.objective_index,
            objective_count: active.objective_count,
            target_count: objective.target_count,
            name: objective.name.clone(),
        })
    }

    /// Returns the registry the coordinator resolves identities through.
    #[must_use]
    pub const fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    /// Returns the coordinator's event bus.
    #[must_use]
    pub const fn events(&self) -> &EventBus<TaskEvent> {
        &self.bus
    }

    /// Returns the slot storage.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    fn current_objective<'a>(&self, active: &'a ActiveTask) -> Option<&'a Objective> {
        active.definition.objectives.get(active.objective_index)
    }

    /// Counts one event against the current objective, advancing the cursor
    /// when the objective completes. Events that do not match the current
    /// objective's kind are dropped, never buffered.
    fn record_event(&mut self, kind: ObjectiveKind, completes_outright: bool) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let Some(objective) = active.definition.objectives.get(active.objective_index) else {
            return;
        };
        if objective.kind != kind {
            return;
        }

        let target = objective.target_count;
        active.objective_count = if completes_outright {
            target
        } else {
            active.objective_count + 1
        };

        let progress = if active.objective_count >= target {
            active.objective_index += 1;
            active.objective_count = 0;
            let task_id = active.definition.id.clone();
            if active.objective_index >= active.definition.objectives.len() {
                Progress::Completed { task_id }
            } else {
                Progress::Advanced {
                    task_id,
                    index: active.objective_index as u32,
                }
            }
        } else {
            Progress::Counted
        };

        match progress {
            Progress::Counted => self.persist(),
            Progress::Advanced { task_id, index } => {
                self.persist();
                info!(task = %task_id, objective = index, "objective advanced");
                self.bus.publish(TaskEvent::ObjectiveAdvanced {
                    task_id,
                    objective_index: index,
                });
            }
            Progress::Completed { task_id } => {
                self.active = None;
                self.persist();
                info!(task = %task_id, "task complete");
                self.bus.publish(TaskEvent::Completed { task_id });
            }
        }
    }

    fn snapshot(&self) -> TaskProgressSave {
        match &self.active {
            Some(active) => TaskProgressSave {
                task_id: Some(active.definition.id.clone()),
                objective_index: active.objective_index as u32,
                objective_count: active.objective_count,
            },
            None => TaskProgressSave::default(),
        }
    }

    /// Persists the progress snapshot. Storage failures are logged and
    /// otherwise ignored; live progress stays ahead of the save.
    fn persist(&mut self) {
        let save = self.snapshot();
        if let Err(e) = save_to_slot(&mut self.storage, TASK_SLOT, &save) {
            warn!(error = %e, "failed to persist task progress");
        }
    }
}
