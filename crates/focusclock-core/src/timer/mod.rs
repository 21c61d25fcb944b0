mod display;
mod engine;

pub use display::{format_mm_ss, TimerUrgency};
pub use engine::{
    FocusTimer, TimerState, DEFAULT_DURATION_MIN, MAX_DURATION_MIN, MIN_DURATION_MIN,
};
