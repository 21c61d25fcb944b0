//! Host controller tying the task list, the focus timer and the celebration
//! overlay together.
//!
//! A UI drives a [`FocusDesk`] with two periodic calls:
//!
//! - [`FocusDesk::tick_coarse`] about once a second, for completion checks
//! - [`FocusDesk::tick_frame`] at animation rate, for the confetti
//!
//! Everything else is a direct reaction to a user action. Every method
//! returns the [`Event`]s it produced so the UI can render them.

use std::time::Duration;

use chrono::{Days, NaiveDate};
use tracing::info;

use crate::clock::{Clock, SystemClock};
use crate::confetti::{ParticleConfig, ParticleEngine, Viewport};
use crate::error::{Result, TimerError, ValidationError};
use crate::events::{CelebrationKind, Event};
use crate::storage::Config;
use crate::task::{Task, TaskId, TaskList};
use crate::timer::FocusTimer;

pub const REST_REMINDER_TITLE: &str = "Focus Time Complete!";
pub const REST_REMINDER_MESSAGE: &str = "Time to relax your eyes! Look outside or at something \
far away for 20 seconds to rest your eyes.";

/// A running confetti overlay and the reason it was started.
#[derive(Debug, Clone)]
pub struct Celebration<C: Clock = SystemClock> {
    kind: CelebrationKind,
    engine: ParticleEngine<C>,
}

impl<C: Clock> Celebration<C> {
    pub fn kind(&self) -> CelebrationKind {
        self.kind
    }

    pub fn engine(&self) -> &ParticleEngine<C> {
        &self.engine
    }
}

#[derive(Debug, Clone)]
pub struct FocusDesk<C: Clock + Clone = SystemClock> {
    tasks: TaskList,
    timer: FocusTimer<C>,
    celebration: Option<Celebration<C>>,
    confetti: ParticleConfig,
    viewport: Viewport,
    clock: C,
}

impl FocusDesk<SystemClock> {
    /// Desk on the system clock with default settings.
    pub fn new() -> Self {
        Self::build(SystemClock, ParticleConfig::default(), Viewport::default())
    }

    /// Desk on the system clock with settings from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured focus duration is out of range.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_clock(SystemClock, config)
    }
}

impl Default for FocusDesk<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock + Clone> FocusDesk<C> {
    /// # Errors
    ///
    /// Returns an error if the configured focus duration is out of range.
    pub fn with_clock(clock: C, config: &Config) -> Result<Self> {
        let mut desk = Self::build(clock, config.confetti.clone(), config.viewport);
        desk.timer.configure(config.timer.focus_minutes)?;
        Ok(desk)
    }

    fn build(clock: C, confetti: ParticleConfig, viewport: Viewport) -> Self {
        Self {
            tasks: TaskList::new(),
            timer: FocusTimer::with_clock(clock.clone()),
            celebration: None,
            confetti,
            viewport,
            clock,
        }
    }

    /// Seed the list with a few demonstration tasks.
    pub fn with_sample_tasks(mut self) -> Self {
        let now = self.clock.now();
        let today = now.date_naive();
        let samples: [(&str, Option<NaiveDate>); 3] = [
            ("Complete project proposal", today.checked_add_days(Days::new(2))),
            ("Review code changes", today.checked_add_days(Days::new(1))),
            ("Learn new programming concepts", None),
        ];
        for (name, deadline) in samples {
            // Sample names are non-empty, so this cannot fail.
            let _ = self.tasks.add(name, deadline, now);
        }
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    pub fn timer(&self) -> &FocusTimer<C> {
        &self.timer
    }

    pub fn celebration(&self) -> Option<&Celebration<C>> {
        self.celebration.as_ref()
    }

    /// The task focus time is currently credited to, if it still exists.
    pub fn current_task(&self) -> Option<&Task> {
        self.timer.task(&self.tasks)
    }

    pub fn ordered_tasks(&self) -> Vec<Task> {
        self.tasks.ordered()
    }

    pub fn snapshot(&self) -> Event {
        self.timer.snapshot()
    }

    // ── Tasks ────────────────────────────────────────────────────────

    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyTaskName`] for a blank name.
    pub fn add_task(&mut self, name: &str, deadline: Option<NaiveDate>) -> Result<(TaskId, Event)> {
        let at = self.clock.now();
        let task_id = self.tasks.add(name, deadline, at)?;
        Ok((task_id, Event::TaskAdded { task_id, at }))
    }

    /// Delete a task. If the timer was bound to it, the binding is dropped
    /// and a running interval stops without crediting anyone.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::TaskNotFound`] for an unknown id.
    pub fn delete_task(&mut self, id: TaskId) -> Result<Vec<Event>> {
        if !self.tasks.contains(id) {
            return Err(ValidationError::TaskNotFound(id).into());
        }
        let mut events = Vec::new();
        if self.timer.forget_task(id) {
            events.extend(self.timer.stop(&mut self.tasks));
        }
        self.tasks.remove(id);
        info!(task_id = %id, "task deleted");
        events.push(Event::TaskDeleted {
            task_id: id,
            at: self.clock.now(),
        });
        Ok(events)
    }

    /// Flip completion. Completing a task starts a celebration.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::TaskNotFound`] for an unknown id.
    pub fn toggle_complete(&mut self, id: TaskId) -> Result<Vec<Event>> {
        let completed = self.tasks.toggle_complete(id)?;
        let mut events = vec![Event::TaskCompletionToggled {
            task_id: id,
            completed,
            at: self.clock.now(),
        }];
        if completed {
            events.extend(self.celebrate(CelebrationKind::TaskCompleted));
        }
        Ok(events)
    }

    /// Choose the task the next interval is credited to.
    ///
    /// # Errors
    ///
    /// Rejects unknown and completed tasks.
    pub fn work_on(&mut self, id: TaskId) -> Result<()> {
        let task = self.tasks.get(id).ok_or(ValidationError::TaskNotFound(id))?;
        if task.is_completed() {
            return Err(ValidationError::TaskCompleted(id).into());
        }
        self.timer.bind(Some(id));
        Ok(())
    }

    // ── Timer ────────────────────────────────────────────────────────

    /// # Errors
    ///
    /// See [`FocusTimer::configure`].
    pub fn configure(&mut self, minutes: u32) -> Result<Event, TimerError> {
        self.timer.configure(minutes)
    }

    pub fn start(&mut self) -> Option<Event> {
        self.timer.start(None)
    }

    pub fn stop(&mut self) -> Option<Event> {
        self.timer.stop(&mut self.tasks)
    }

    pub fn reset(&mut self) -> Vec<Event> {
        self.timer.reset(&mut self.tasks)
    }

    /// Completion check. When the interval runs out this yields the
    /// completion, the rest reminder, and the start of its celebration.
    pub fn tick_coarse(&mut self) -> Vec<Event> {
        let Some(completed) = self.timer.tick(&mut self.tasks) else {
            return Vec::new();
        };
        let mut events = vec![
            completed,
            Event::RestReminder {
                title: REST_REMINDER_TITLE.to_string(),
                message: REST_REMINDER_MESSAGE.to_string(),
                at: self.clock.now(),
            },
        ];
        events.extend(self.celebrate(CelebrationKind::RestReminder));
        events
    }

    /// Animation step. Once the celebration runs out its particles are
    /// cleared and it is dropped.
    pub fn tick_frame(&mut self, dt: Duration) -> Vec<Event> {
        let Some(celebration) = self.celebration.as_mut() else {
            return Vec::new();
        };
        let report = celebration.engine.tick(dt);
        if report.expired || celebration.engine.is_finished() {
            return self.end_celebration().into_iter().collect();
        }
        Vec::new()
    }

    /// The user closed the overlay early.
    pub fn dismiss_celebration(&mut self) -> Option<Event> {
        self.end_celebration()
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn celebrate(&mut self, kind: CelebrationKind) -> Vec<Event> {
        let mut events: Vec<Event> = self.end_celebration().into_iter().collect();
        let mut engine = ParticleEngine::with_clock(self.confetti.clone(), self.clock.clone());
        let duration_ms = self.confetti.duration_ms;
        engine.start(duration_ms, self.confetti.initial_count, self.viewport);
        self.celebration = Some(Celebration { kind, engine });
        info!(?kind, duration_ms, "celebration started");
        events.push(Event::CelebrationStarted {
            kind,
            duration_ms,
            at: self.clock.now(),
        });
        events
    }

    fn end_celebration(&mut self) -> Option<Event> {
        let mut celebration = self.celebration.take()?;
        celebration.engine.expire();
        celebration.engine.clear();
        Some(Event::CelebrationEnded {
            kind: celebration.kind,
            at: self.clock.now(),
        })
    }
}
