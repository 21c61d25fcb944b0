//! # focusclock Core Library
//!
//! This library provides the logic behind the focusclock desktop timer: a
//! to-do list whose tasks collect focused work time, a rest reminder when an
//! interval ends, and a confetti overlay for celebrations. The GUI and the
//! `focusclock` CLI are thin hosts over the same core.
//!
//! ## Architecture
//!
//! - **Focus Timer**: A wall-clock-based state machine that requires the caller
//!   to periodically invoke `tick()` for completion detection
//! - **Confetti**: A particle simulation stepped by the host at frame rate
//! - **Tasks**: The host-owned task list and its display ordering
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`FocusTimer`]: Focus interval state machine
//! - [`ParticleEngine`]: Confetti simulation
//! - [`FocusDesk`]: Host controller wiring tasks, timer and celebrations
//! - [`Config`]: Application configuration management

pub mod clock;
pub mod confetti;
pub mod desk;
pub mod error;
pub mod events;
pub mod storage;
pub mod task;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use confetti::{GlyphPalette, Particle, ParticleConfig, ParticleEngine, Viewport};
pub use desk::{Celebration, FocusDesk};
pub use error::{ConfigError, CoreError, TimerError, ValidationError};
pub use events::{CelebrationKind, Event};
pub use storage::Config;
pub use task::{DeadlineUrgency, Task, TaskId, TaskList};
pub use timer::{FocusTimer, TimerState, TimerUrgency};
