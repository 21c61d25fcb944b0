use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::TaskId;
use crate::timer::{TimerState, TimerUrgency};

/// Why a celebration animation was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CelebrationKind {
    /// A task was marked completed
    TaskCompleted,
    /// A focus interval ran out and the rest reminder is shown
    RestReminder,
}

/// Every state change in the core produces an Event.
/// The host renders them; the CLI prints them as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerConfigured {
        duration_min: u32,
        at: DateTime<Utc>,
    },
    TimerStarted {
        duration_min: u32,
        task_id: Option<TaskId>,
        at: DateTime<Utc>,
    },
    /// Interval stopped by the host before running out.
    TimerStopped {
        elapsed_ms: u64,
        task_id: Option<TaskId>,
        /// Whether `elapsed_ms` was added to a live task.
        credited: bool,
        at: DateTime<Utc>,
    },
    /// Interval ran out. Emitted once per interval.
    TimerCompleted {
        elapsed_ms: u64,
        task_id: Option<TaskId>,
        credited: bool,
        at: DateTime<Utc>,
    },
    TimerReset {
        duration_min: u32,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        duration_min: u32,
        remaining_ms: u64,
        total_ms: u64,
        progress: f64,
        urgency: TimerUrgency,
        task_id: Option<TaskId>,
        at: DateTime<Utc>,
    },
    TaskAdded {
        task_id: TaskId,
        at: DateTime<Utc>,
    },
    TaskDeleted {
        task_id: TaskId,
        at: DateTime<Utc>,
    },
    TaskCompletionToggled {
        task_id: TaskId,
        completed: bool,
        at: DateTime<Utc>,
    },
    /// Time to look away from the screen.
    RestReminder {
        title: String,
        message: String,
        at: DateTime<Utc>,
    },
    CelebrationStarted {
        kind: CelebrationKind,
        duration_ms: u64,
        at: DateTime<Utc>,
    },
    CelebrationEnded {
        kind: CelebrationKind,
        at: DateTime<Utc>,
    },
}
