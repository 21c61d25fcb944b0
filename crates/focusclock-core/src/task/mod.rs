//! Task records and the host-owned task collection.
//!
//! The focus timer never holds a [`Task`]; it remembers a [`TaskId`] and
//! looks it up in a [`TaskList`] whenever it needs to credit worked time.
//! Deleting a task therefore can never leave the timer with a dangling
//! reference.

mod ordering;

pub use ordering::{compare, order};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::error::ValidationError;

/// Identifier assigned to a task on creation. Never reused within a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How close a task is to its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineUrgency {
    /// No deadline, or the task is already completed
    None,
    /// Deadline is in the past
    Overdue,
    /// Due today or tomorrow
    DueSoon,
    /// Due within three days
    DueThisWeek,
    /// Due later
    Normal,
}

/// A to-do item that focus time can be credited to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    pub name: String,
    /// Calendar date only, no time component.
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    completed: bool,
    /// Accumulated focus time in milliseconds. `None` until the first interval
    /// is credited.
    #[serde(default)]
    worked_ms: Option<u64>,
}

impl Task {
    pub fn new(id: TaskId, name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.into(),
            deadline: None,
            created_at,
            completed: false,
            worked_ms: None,
        }
    }

    pub fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
    }

    /// Flip the completion flag and return the new value.
    pub fn toggle_completed(&mut self) -> bool {
        self.completed = !self.completed;
        self.completed
    }

    pub fn worked_ms(&self) -> Option<u64> {
        self.worked_ms
    }

    pub fn worked_time(&self) -> Option<std::time::Duration> {
        self.worked_ms.map(std::time::Duration::from_millis)
    }

    /// Credit `ms` of focus time, starting from zero if nothing was recorded.
    pub fn add_worked_ms(&mut self, ms: u64) {
        self.worked_ms = Some(self.worked_ms.unwrap_or(0).saturating_add(ms));
    }

    /// Classify the deadline relative to `today`.
    pub fn deadline_urgency(&self, today: NaiveDate) -> DeadlineUrgency {
        let Some(deadline) = self.deadline else {
            return DeadlineUrgency::None;
        };
        if self.completed {
            return DeadlineUrgency::None;
        }
        let days_left = (deadline - today).num_days();
        match days_left {
            d if d < 0 => DeadlineUrgency::Overdue,
            0..=1 => DeadlineUrgency::DueSoon,
            2..=3 => DeadlineUrgency::DueThisWeek,
            _ => DeadlineUrgency::Normal,
        }
    }
}

/// The host-owned set of tasks.
///
/// Serialize-only: rebuild a list from stored tasks with
/// [`TaskList::from_tasks`], which keeps identifiers unique.
#[derive(Debug, Clone, Serialize)]
pub struct TaskList {
    next_id: u64,
    tasks: Vec<Task>,
}

impl Default for TaskList {
    fn default() -> Self {
        Self {
            next_id: 1,
            tasks: Vec::new(),
        }
    }
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a list from tasks loaded elsewhere. Names are trimmed and new
    /// identifiers continue after the largest one seen.
    ///
    /// # Errors
    ///
    /// [`ValidationError::EmptyTaskName`] for a blank name,
    /// [`ValidationError::DuplicateTaskId`] when an id repeats.
    pub fn from_tasks(tasks: Vec<Task>) -> Result<Self, ValidationError> {
        let mut list = Self::new();
        for mut task in tasks {
            let name = task.name.trim();
            if name.is_empty() {
                return Err(ValidationError::EmptyTaskName);
            }
            task.name = name.to_string();
            if list.contains(task.id) {
                return Err(ValidationError::DuplicateTaskId(task.id));
            }
            list.next_id = list.next_id.max(task.id.0.saturating_add(1));
            list.tasks.push(task);
        }
        Ok(list)
    }

    /// Create a task and return its freshly assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyTaskName`] if `name` is blank.
    pub fn add(
        &mut self,
        name: &str,
        deadline: Option<NaiveDate>,
        created_at: DateTime<Utc>,
    ) -> Result<TaskId, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyTaskName);
        }
        let id = TaskId(self.next_id);
        self.next_id += 1;
        let mut task = Task::new(id, name, created_at);
        task.deadline = deadline;
        self.tasks.push(task);
        debug!(task_id = %id, name, "task added");
        Ok(id)
    }

    pub fn remove(&mut self, id: TaskId) -> Option<Task> {
        let pos = self.tasks.iter().position(|t| t.id == id)?;
        debug!(task_id = %id, "task removed");
        Some(self.tasks.remove(pos))
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn get_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.get(id).is_some()
    }

    /// Flip completion of a task and return its new completion flag.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::TaskNotFound`] for an unknown id.
    pub fn toggle_complete(&mut self, id: TaskId) -> Result<bool, ValidationError> {
        let task = self.get_mut(id).ok_or(ValidationError::TaskNotFound(id))?;
        let completed = task.toggle_completed();
        debug!(task_id = %id, completed, "task completion toggled");
        Ok(completed)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Tasks in display order. The list itself is left untouched.
    pub fn ordered(&self) -> Vec<Task> {
        order(&self.tasks)
    }
}
