use serde::{Deserialize, Serialize};

use super::particle::GlyphPalette;

/// Tunable confetti constants.
///
/// The defaults give a light, steady shower in a 600x400 window. They were
/// chosen by eye; nothing depends on their exact values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleConfig {
    /// Tick length the per-tick constants below are expressed in.
    #[serde(default = "default_reference_tick_ms")]
    pub reference_tick_ms: u64,
    /// Added to `vy` every reference tick.
    #[serde(default = "default_gravity")]
    pub gravity: f64,
    /// Chance of one new particle per reference tick.
    #[serde(default = "default_spawn_probability")]
    pub spawn_probability: f64,
    #[serde(default = "default_max_particles")]
    pub max_particles: usize,
    #[serde(default = "default_initial_count")]
    pub initial_count: usize,
    /// Run length before the engine goes dormant.
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,
    /// How far past the left, right and bottom edges a particle may travel.
    #[serde(default = "default_margin")]
    pub margin: f64,
    /// Particles spawn with `x` in `[0, width - glyph_width)`.
    #[serde(default = "default_glyph_width")]
    pub glyph_width: f64,
    #[serde(default = "default_spawn_y")]
    pub spawn_y: f64,
    #[serde(default = "default_vx_min")]
    pub vx_min: f64,
    #[serde(default = "default_vx_max")]
    pub vx_max: f64,
    #[serde(default = "default_vy_min")]
    pub vy_min: f64,
    #[serde(default = "default_vy_max")]
    pub vy_max: f64,
    /// Spin is drawn from `[-max_spin, max_spin)` degrees per reference tick.
    #[serde(default = "default_max_spin")]
    pub max_spin: f64,
    #[serde(default)]
    pub palette: GlyphPalette,
    /// Fixed RNG seed for reproducible runs (None = random)
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_reference_tick_ms() -> u64 {
    50
}
fn default_gravity() -> f64 {
    0.1
}
fn default_spawn_probability() -> f64 {
    0.2
}
fn default_max_particles() -> usize {
    25
}
fn default_initial_count() -> usize {
    20
}
fn default_duration_ms() -> u64 {
    5_000
}
fn default_margin() -> f64 {
    50.0
}
fn default_glyph_width() -> f64 {
    30.0
}
fn default_spawn_y() -> f64 {
    -50.0
}
fn default_vx_min() -> f64 {
    -2.0
}
fn default_vx_max() -> f64 {
    2.0
}
fn default_vy_min() -> f64 {
    2.0
}
fn default_vy_max() -> f64 {
    5.0
}
fn default_max_spin() -> f64 {
    5.0
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            reference_tick_ms: default_reference_tick_ms(),
            gravity: default_gravity(),
            spawn_probability: default_spawn_probability(),
            max_particles: default_max_particles(),
            initial_count: default_initial_count(),
            duration_ms: default_duration_ms(),
            margin: default_margin(),
            glyph_width: default_glyph_width(),
            spawn_y: default_spawn_y(),
            vx_min: default_vx_min(),
            vx_max: default_vx_max(),
            vy_min: default_vy_min(),
            vy_max: default_vy_max(),
            max_spin: default_max_spin(),
            palette: GlyphPalette::default(),
            seed: None,
        }
    }
}
