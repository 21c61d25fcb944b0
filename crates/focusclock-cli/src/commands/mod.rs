pub mod config;
pub mod confetti;
pub mod task;
pub mod timer;

use serde::Serialize;

/// One compact JSON document per line, for event streams.
pub(crate) fn print_line<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

/// A single pretty-printed JSON document.
pub(crate) fn print_pretty<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
