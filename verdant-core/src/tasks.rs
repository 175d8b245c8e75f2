//! Today's care tasks
//!
//! Tasks are seeded once and only their completion flag ever changes.

use crate::collection::CollectionStore;
use crate::error::{Error, Result};
use crate::types::{Plant, PlantId, Task, TaskId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskStats {
    pub pending: usize,
    pub completed: usize,
    pub total: usize,
}

/// A task joined with the plant it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct TaskRow<'a> {
    pub task: &'a Task,
    /// `None` when the owning plant is not in the collection
    pub plant: Option<&'a Plant>,
}

impl TaskRow<'_> {
    pub fn plant_name(&self) -> String {
        match self.plant {
            Some(plant) => plant.name.clone(),
            None => format!("Unknown plant ({})", self.task.plant_id),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Result<&Task> {
        self.tasks
            .iter()
            .find(|t| t.id == id)
            .ok_or(Error::TaskNotFound(id))
    }

    /// Flip the completion flag, returning the new value.
    pub fn toggle_completion(&mut self, id: TaskId) -> Result<bool> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(Error::TaskNotFound(id))?;
        task.completed = !task.completed;
        tracing::debug!(task = %id, completed = task.completed, "Task toggled");
        Ok(task.completed)
    }

    pub fn pending(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| !t.completed).collect()
    }

    pub fn completed(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.completed).collect()
    }

    pub fn stats(&self) -> TaskStats {
        let completed = self.tasks.iter().filter(|t| t.completed).count();
        TaskStats {
            pending: self.tasks.len() - completed,
            completed,
            total: self.tasks.len(),
        }
    }

    /// Tasks for one plant.
    pub fn for_plant(&self, plant: PlantId) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.plant_id == plant).collect()
    }

    /// Resolve each task's plant for display, keeping list order.
    pub fn with_plants<'a>(&'a self, collection: &'a CollectionStore) -> Vec<TaskRow<'a>> {
        self.tasks
            .iter()
            .map(|task| {
                let plant = collection.get(task.plant_id).ok();
                if plant.is_none() {
                    tracing::warn!(task = %task.id, plant = %task.plant_id, "Task references a missing plant");
                }
                TaskRow { task, plant }
            })
            .collect()
    }
}
