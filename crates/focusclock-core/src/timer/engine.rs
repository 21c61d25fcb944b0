//! Focus interval engine.
//!
//! The engine is a wall-clock-based state machine. It does not use
//! internal threads - the caller is responsible for calling `tick()` periodically.
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start--> Running --stop/reset/tick(elapsed >= duration)--> Idle
//! ```
//!
//! Completion is decided from `now - started_at`, never from a decremented
//! counter, so coarse, jittery or skipped ticks only delay the completion
//! event until the next tick; they never move the threshold.
//!
//! ## Usage
//!
//! ```ignore
//! let mut tasks = TaskList::new();
//! let mut timer = FocusTimer::new();
//! timer.start(None);
//! // In a loop:
//! timer.tick(&mut tasks); // Returns Some(Event::TimerCompleted) once
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

use super::display::TimerUrgency;
use crate::clock::{elapsed_ms, Clock, SystemClock};
use crate::error::TimerError;
use crate::events::Event;
use crate::task::{Task, TaskId, TaskList};

/// Shortest accepted focus interval.
pub const MIN_DURATION_MIN: u32 = 1;
/// Longest accepted focus interval.
pub const MAX_DURATION_MIN: u32 = 120;
/// Pomodoro default.
pub const DEFAULT_DURATION_MIN: u32 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
}

impl fmt::Display for TimerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerState::Idle => f.write_str("idle"),
            TimerState::Running => f.write_str("running"),
        }
    }
}

/// Core focus timer.
///
/// The bound task is held by id only and resolved against the caller's
/// [`TaskList`] whenever time is credited.
#[derive(Debug, Clone)]
pub struct FocusTimer<C: Clock = SystemClock> {
    duration_min: u32,
    state: TimerState,
    /// Start of the current (or last) interval. Cleared by `reset`.
    started_at: Option<DateTime<Utc>>,
    bound_task: Option<TaskId>,
    clock: C,
}

impl FocusTimer<SystemClock> {
    /// Create an idle timer on the system clock with the default duration.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for FocusTimer<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> FocusTimer<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            duration_min: DEFAULT_DURATION_MIN,
            state: TimerState::Idle,
            started_at: None,
            bound_task: None,
            clock,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn duration_min(&self) -> u32 {
        self.duration_min
    }

    pub fn duration_ms(&self) -> u64 {
        u64::from(self.duration_min) * 60 * 1000
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn bound_task(&self) -> Option<TaskId> {
        self.bound_task
    }

    /// Resolve the bound task. A deleted task resolves to `None`.
    pub fn task<'a>(&self, tasks: &'a TaskList) -> Option<&'a Task> {
        self.bound_task.and_then(|id| tasks.get(id))
    }

    /// Time spent in the current interval; zero while idle.
    pub fn elapsed_ms(&self) -> u64 {
        match (self.state, self.started_at) {
            (TimerState::Running, Some(start)) => elapsed_ms(start, self.clock.now()),
            _ => 0,
        }
    }

    /// Time left for display. The full duration while idle.
    pub fn remaining_ms(&self) -> u64 {
        self.duration_ms().saturating_sub(self.elapsed_ms())
    }

    pub fn remaining(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.remaining_ms())
    }

    /// 0.0 .. 1.0 progress within the current interval.
    pub fn progress(&self) -> f64 {
        let total = self.duration_ms();
        if total == 0 {
            return 0.0;
        }
        (self.elapsed_ms() as f64 / total as f64).min(1.0)
    }

    pub fn urgency(&self) -> TimerUrgency {
        if self.is_running() {
            TimerUrgency::from_remaining_ms(self.remaining_ms())
        } else {
            TimerUrgency::Normal
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            duration_min: self.duration_min,
            remaining_ms: self.remaining_ms(),
            total_ms: self.duration_ms(),
            progress: self.progress(),
            urgency: self.urgency(),
            task_id: self.bound_task,
            at: self.clock.now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Set the interval length in minutes.
    ///
    /// # Errors
    ///
    /// [`TimerError::IllegalStateTransition`] while running,
    /// [`TimerError::InvalidConfiguration`] outside `1..=120`. The previous
    /// duration is kept in both cases.
    pub fn configure(&mut self, minutes: u32) -> Result<Event, TimerError> {
        if self.is_running() {
            return Err(TimerError::IllegalStateTransition {
                operation: "configure",
                state: self.state,
            });
        }
        if !(MIN_DURATION_MIN..=MAX_DURATION_MIN).contains(&minutes) {
            return Err(TimerError::InvalidConfiguration {
                minutes,
                min: MIN_DURATION_MIN,
                max: MAX_DURATION_MIN,
            });
        }
        self.duration_min = minutes;
        debug!(duration_min = minutes, "focus timer configured");
        Ok(Event::TimerConfigured {
            duration_min: minutes,
            at: self.clock.now(),
        })
    }

    /// Associate a task without starting. `None` unbinds.
    pub fn bind(&mut self, task: Option<TaskId>) {
        self.bound_task = task;
    }

    /// Drop the association if it points at `id`. Returns whether it did.
    pub fn forget_task(&mut self, id: TaskId) -> bool {
        if self.bound_task == Some(id) {
            self.bound_task = None;
            debug!(task_id = %id, "focus timer unbound from deleted task");
            true
        } else {
            false
        }
    }

    /// Start an interval. `Some(task)` replaces the binding, `None` keeps
    /// whatever is bound. No-op while already running.
    pub fn start(&mut self, task: Option<TaskId>) -> Option<Event> {
        if self.is_running() {
            return None;
        }
        if task.is_some() {
            self.bound_task = task;
        }
        let now = self.clock.now();
        self.started_at = Some(now);
        self.state = TimerState::Running;
        debug!(
            duration_min = self.duration_min,
            task_id = ?self.bound_task,
            "focus timer started"
        );
        Some(Event::TimerStarted {
            duration_min: self.duration_min,
            task_id: self.bound_task,
            at: now,
        })
    }

    /// End the interval early and credit the elapsed time. No-op while idle.
    pub fn stop(&mut self, tasks: &mut TaskList) -> Option<Event> {
        if !self.is_running() {
            return None;
        }
        let now = self.clock.now();
        let (elapsed_ms, credited) = self.finish(tasks, now);
        Some(Event::TimerStopped {
            elapsed_ms,
            task_id: self.bound_task,
            credited,
            at: now,
        })
    }

    /// Stop (crediting any running time) and forget the start reference.
    /// The configured duration survives. Returns the stop event, if the
    /// timer was running, followed by `TimerReset`.
    pub fn reset(&mut self, tasks: &mut TaskList) -> Vec<Event> {
        let mut events: Vec<Event> = self.stop(tasks).into_iter().collect();
        self.started_at = None;
        debug!("focus timer reset");
        events.push(Event::TimerReset {
            duration_min: self.duration_min,
            at: self.clock.now(),
        });
        events
    }

    /// Call periodically. Returns `Some(Event::TimerCompleted)` exactly once
    /// per interval, on the first tick at or past the deadline.
    pub fn tick(&mut self, tasks: &mut TaskList) -> Option<Event> {
        if !self.is_running() {
            return None;
        }
        let now = self.clock.now();
        let start = self.started_at?;
        if elapsed_ms(start, now) < self.duration_ms() {
            return None;
        }
        let (elapsed_ms, credited) = self.finish(tasks, now);
        info!(
            elapsed_ms,
            task_id = ?self.bound_task,
            "focus interval completed"
        );
        Some(Event::TimerCompleted {
            elapsed_ms,
            task_id: self.bound_task,
            credited,
            at: now,
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Running -> Idle, crediting the bound task if it still exists.
    fn finish(&mut self, tasks: &mut TaskList, now: DateTime<Utc>) -> (u64, bool) {
        let elapsed = self.started_at.map(|s| elapsed_ms(s, now)).unwrap_or(0);
        self.state = TimerState::Idle;
        let credited = match self.bound_task.and_then(|id| tasks.get_mut(id)) {
            Some(task) => {
                task.add_worked_ms(elapsed);
                true
            }
            None => false,
        };
        debug!(elapsed_ms = elapsed, credited, "focus timer stopped");
        (elapsed, credited)
    }
}
