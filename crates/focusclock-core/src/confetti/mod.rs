//! Celebration confetti: a short-lived shower of falling glyphs shown when a
//! task is completed and when a focus interval ends.

mod config;
mod engine;
mod particle;

pub use config::ParticleConfig;
pub use engine::{AnimationState, ParticleEngine, TickReport};
pub use particle::{GlyphPalette, Particle, Viewport};
