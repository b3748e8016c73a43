//! Task definition content.
//!
//! Definitions are design-time data: authored in JSON or built in code,
//! registered once, and never mutated at runtime. All runtime progress lives
//! in the coordinator.

use palisade_common::ids::TaskId;
use serde::{Deserialize, Serialize};

/// What kind of gameplay event completes an objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveKind {
    /// Arrive at a designated location.
    ReachLocation,
    /// Defeat enemies.
    KillEnemy,
    /// Pick up items.
    CollectItem,
}

fn default_target_count() -> u32 {
    1
}

/// One step of a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    /// Short objective name for UI.
    pub name: String,
    /// Event kind that progresses this objective.
    pub kind: ObjectiveKind,
    /// Occurrences required before the objective completes. At least 1;
    /// reach-location objectives complete in one event regardless.
    #[serde(default = "default_target_count")]
    pub target_count: u32,
    /// World position for reach-location objectives.
    #[serde(default)]
    pub location: Option<(f32, f32, f32)>,
    /// Longer description for UI.
    #[serde(default)]
    pub description: String,
}

impl Objective {
    /// Creates a kill objective requiring `target_count` defeats.
    #[must_use]
    pub fn kill(name: impl Into<String>, target_count: u32) -> Self {
        Self {
            name: name.into(),
            kind: ObjectiveKind::KillEnemy,
            target_count,
            location: None,
            description: String::new(),
        }
    }

    /// Creates a collect objective requiring `target_count` pickups.
    #[must_use]
    pub fn collect(name: impl Into<String>, target_count: u32) -> Self {
        Self {
            name: name.into(),
            kind: ObjectiveKind::CollectItem,
            target_count,
            location: None,
            description: String::new(),
        }
    }

    /// Creates a reach-location objective.
    #[must_use]
    pub fn reach(name: impl Into<String>, location: (f32, f32, f32)) -> Self {
        Self {
            name: name.into(),
            kind: ObjectiveKind::ReachLocation,
            target_count: 1,
            location: Some(location),
            description: String::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// An ordered list of objectives under a stable identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDefinition {
    /// Stable identity, persisted into save data.
    pub id: TaskId,
    /// Display name for UI.
    pub display_name: String,
    /// Objectives in completion order.
    #[serde(default)]
    pub objectives: Vec<Objective>,
}

impl TaskDefinition {
    /// Creates a definition with no objectives.
    #[must_use]
    pub fn new(id: impl Into<TaskId>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            objectives: Vec::new(),
        }
    }

    /// Appends an objective.
    #[must_use]
    pub fn with_objective(mut self, objective: Objective) -> Self {
        self.objectives.push(objective);
        self
    }

    /// Returns the number of objectives.
    #[must_use]
    pub fn objective_count(&self) -> usize {
        self.objectives.len()
    }
}
