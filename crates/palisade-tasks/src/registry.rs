//! Task definition registry.
//!
//! One lookup table from [`TaskId`] to its immutable definition. Whoever owns
//! content loading populates it at startup; the coordinator resolves saved
//! task identities through it on restore.

use crate::data::TaskDefinition;
use palisade_common::ids::TaskId;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors that can occur loading or registering task content.
#[derive(Debug, Error)]
pub enum ContentError {
    /// Failed to read a definition file.
    #[error("Failed to read task file: {0}")]
    Read(#[from] std::io::Error),

    /// Failed to parse definition JSON.
    #[error("Failed to parse task JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A definition with this ID is already registered.
    #[error("Duplicate task ID: {0}")]
    DuplicateId(TaskId),

    /// The definition fails a structural check.
    #[error("Invalid task definition {id}: {reason}")]
    Invalid {
        /// The offending definition.
        id: TaskId,
        /// What the check rejected.
        reason: String,
    },

    /// A definition file does not exist.
    #[error("Task file not found: {0}")]
    NotFound(PathBuf),
}

/// Result type for content operations.
pub type ContentResult<T> = Result<T, ContentError>;

/// Lookup table of registered task definitions.
#[derive(Debug, Clone, Default)]
pub struct TaskRegistry {
    tasks: HashMap<TaskId, Arc<TaskDefinition>>,
}

impl TaskRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a definition, validating it first.
    ///
    /// A definition must have at least one objective, and every objective's
    /// target count must be at least 1. Registering an ID twice is an error.
    pub fn register(&mut self, definition: TaskDefinition) -> ContentResult<Arc<TaskDefinition>> {
        if self.tasks.contains_key(&definition.id) {
            return Err(ContentError::DuplicateId(definition.id));
        }
        if definition.objectives.is_empty() {
            return Err(ContentError::Invalid {
                id: definition.id,
                reason: "no objectives".to_string(),
            });
        }
        if let Some(objective) = definition
            .objectives
            .iter()
            .find(|objective| objective.target_count == 0)
        {
            return Err(ContentError::Invalid {
                id: definition.id.clone(),
                reason: format!("objective '{}' has target count 0", objective.name),
            });
        }

        let definition = Arc::new(definition);
        self.tasks.insert(definition.id.clone(), Arc::clone(&definition));
        Ok(definition)
    }

    /// Parses and registers one definition from a JSON string.
    pub fn load_json_str(&mut self, json: &str) -> ContentResult<Arc<TaskDefinition>> {
        let definition: TaskDefinition = serde_json::from_str(json)?;
        self.register(definition)
    }

    /// Loads and registers one definition from a JSON file.
    pub fn load_json_file(&mut self, path: &Path) -> ContentResult<Arc<TaskDefinition>> {
        if !path.exists() {
            return Err(ContentError::NotFound(path.to_path_buf()));
        }
        let json = fs::read_to_string(path)?;
        let definition = self.load_json_str(&json)?;
        info!(task = %definition.id, path = %path.display(), "task definition loaded");
        Ok(definition)
    }

    /// Returns the definition for an ID.
    #[must_use]
    pub fn get(&self, id: &TaskId) -> Option<Arc<TaskDefinition>> {
        self.tasks.get(id).cloned()
    }

    /// Returns true if an ID is registered.
    #[must_use]
    pub fn contains(&self, id: &TaskId) -> bool {
        self.tasks.contains_key(id)
    }

    /// Returns the number of registered definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Iterates over registered definitions in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<TaskDefinition>> {
        self.tasks.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Objective;
    use std::io::Write;

    fn sample() -> TaskDefinition {
        TaskDefinition::new(TaskId::new("intro"), "Intro")
            .with_objective(Objective::kill("First blood", 1))
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = TaskRegistry::new();
        registry.register(sample()).expect("Register failed");

        assert_eq!(registry.len(), 1);
        assert!(registry.contains(&TaskId::new("intro")));
        let definition = registry.get(&TaskId::new("intro")).expect("Missing task");
        assert_eq!(definition.display_name, "Intro");
        assert!(registry.get(&TaskId::new("outro")).is_none());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut registry = TaskRegistry::new();
        registry.register(sample()).expect("Register failed");
        let err = registry.register(sample()).expect_err("Duplicate accepted");
        assert!(matches!(err, ContentError::DuplicateId(_)));
    }

    #[test]
    fn test_empty_definition_rejected() {
        let mut registry = TaskRegistry::new();
        let err = registry
            .register(TaskDefinition::new(TaskId::new("empty"), "Empty"))
            .expect_err("Empty accepted");
        assert!(matches!(err, ContentError::Invalid { .. }));
    }

    #[test]
    fn test_zero_target_count_rejected() {
        let mut registry = TaskRegistry::new();
        let definition = TaskDefinition::new(TaskId::new("bad"), "Bad")
            .with_objective(Objective::kill("Nothing", 0));
        let err = registry.register(definition).expect_err("Zero accepted");
        assert!(matches!(err, ContentError::Invalid { .. }));
    }

    #[test]
    fn test_load_json_str() {
        let mut registry = TaskRegistry::new();
        let definition = registry
            .load_json_str(
                r#"{
                    "id": "supply_run",
                    "display_name": "Supply Run",
                    "objectives": [
                        { "name": "Grab rations", "kind": "collect_item", "target_count": 3 },
                        { "name": "Return to camp", "kind": "reach_location",
                          "location": [10.0, 20.0, 0.0] }
                    ]
                }"#,
            )
            .expect("Load failed");

        assert_eq!(definition.id, TaskId::new("supply_run"));
        assert_eq!(definition.objective_count(), 2);
        assert!(registry.contains(&TaskId::new("supply_run")));
    }

    #[test]
    fn test_load_json_file() {
        let dir = tempfile::tempdir().expect("Temp dir failed");
        let path = dir.path().join("intro.json");
        let mut file = std::fs::File::create(&path).expect("Create failed");
        write!(
            file,
            r#"{{"id": "intro", "display_name": "Intro",
                "objectives": [{{ "name": "First blood", "kind": "kill_enemy" }}]}}"#
        )
        .expect("Write failed");

        let mut registry = TaskRegistry::new();
        registry.load_json_file(&path).expect("Load failed");
        assert!(registry.contains(&TaskId::new("intro")));

        let err = registry
            .load_json_file(&dir.path().join("missing.json"))
            .expect_err("Missing file accepted");
        assert!(matches!(err, ContentError::NotFound(_)));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let mut registry = TaskRegistry::new();
        let err = registry
            .load_json_str("{ not json }")
            .expect_err("Malformed accepted");
        assert!(matches!(err, ContentError::Parse(_)));
        assert!(registry.is_empty());
    }
}
