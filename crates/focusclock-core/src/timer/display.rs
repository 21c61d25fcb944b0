//! Countdown presentation helpers that carry no rendering concerns.

use serde::{Deserialize, Serialize};

/// How close a running interval is to its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerUrgency {
    /// More than five minutes left, or idle
    Normal,
    /// Five minutes or less
    Warning,
    /// Two minutes or less
    Urgent,
    /// Nothing left; completion fires on the next coarse tick
    Finished,
}

impl TimerUrgency {
    const WARNING_MS: u64 = 5 * 60 * 1000;
    const URGENT_MS: u64 = 2 * 60 * 1000;

    pub fn from_remaining_ms(remaining_ms: u64) -> Self {
        match remaining_ms {
            0 => Self::Finished,
            ms if ms <= Self::URGENT_MS => Self::Urgent,
            ms if ms <= Self::WARNING_MS => Self::Warning,
            _ => Self::Normal,
        }
    }
}

/// `MM:SS`, rounding partial seconds up so a fresh 25 minute interval reads
/// `25:00` rather than `24:59`.
pub fn format_mm_ss(remaining_ms: u64) -> String {
    let secs = remaining_ms.div_ceil(1000);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
