use super::task::{Task, TaskId};
use chrono::NaiveDate;

/// Local mirror of the remote task collection.
///
/// Only mutated with data from confirmed API responses. Every mutation bumps
/// `revision`, which mounted views compare against to know when to re-derive.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    revision: u64,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection (result of a `list` call)
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.revision += 1;
    }

    /// Insert a task, or replace the entry with the same id in place
    pub fn upsert(&mut self, task: Task) {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task,
            None => self.tasks.push(task),
        }
        self.revision += 1;
    }

    /// Remove a task by id. Absent ids are a no-op.
    pub fn remove(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        let removed = self.tasks.len() != before;
        if removed {
            self.revision += 1;
        }
        removed
    }

    /// Tasks created on the given calendar day, in store order
    pub fn by_date(&self, date: NaiveDate) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| t.created_on() == Some(date))
            .collect()
    }

    /// Whether any task was created on the given day
    pub fn has_tasks_on(&self, date: NaiveDate) -> bool {
        self.tasks.iter().any(|t| t.created_on() == Some(date))
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    #[cfg(test)]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}
