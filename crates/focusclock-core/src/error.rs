//! Core error types for focusclock-core.
//!
//! Errors are grouped per concern with thiserror and roll up into
//! [`CoreError`]. None of them indicate corrupted engine state: every failing
//! operation leaves the engine exactly as it was before the call.

use std::path::PathBuf;
use thiserror::Error;

use crate::task::TaskId;
use crate::timer::TimerState;

/// Core error type for focusclock-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Focus timer rejected a command
    #[error("Timer error: {0}")]
    Timer(#[from] TimerError),

    /// Host-level input validation failed
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by the focus interval engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// Requested duration lies outside the accepted range
    #[error("Invalid focus duration {minutes} min: must be between {min} and {max} minutes")]
    InvalidConfiguration { minutes: u32, min: u32, max: u32 },

    /// Operation is not valid for the current state
    #[error("Cannot {operation} while the timer is {state}")]
    IllegalStateTransition {
        operation: &'static str,
        state: TimerState,
    },
}

/// Validation errors for host-driven task operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Task name was empty after trimming
    #[error("Task name must not be empty")]
    EmptyTaskName,

    /// No task with this identifier
    #[error("Task {0} not found")]
    TaskNotFound(TaskId),

    /// Completed tasks cannot be worked on
    #[error("Task {0} is already completed")]
    TaskCompleted(TaskId),

    /// Two tasks share an identifier
    #[error("Task {0} appears more than once")]
    DuplicateTaskId(TaskId),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Home/config directory could not be prepared
    #[error("Configuration directory unavailable: {0}")]
    DirUnavailable(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
