//! Confetti particle engine.
//!
//! Like the focus timer, the engine has no thread of its own: the host calls
//! `tick(dt)` at whatever cadence it renders at. Physics constants are
//! expressed per reference tick (50 ms by default) and every tick is scaled
//! by `dt / reference_tick`, so the fall speed looks the same whether the
//! host ticks at 20 Hz or 60 Hz.
//!
//! The run length is measured against the clock at tick time. Once it has
//! passed the engine goes dormant: it stops moving and spawning, and leaves
//! the remaining particles where they are for the host to clear.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::ParticleConfig;
use super::particle::{Particle, Viewport};
use crate::clock::{elapsed_ms, Clock, SystemClock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationState {
    /// Not started yet, or expired
    Dormant,
    Active,
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Particles removed for leaving the viewport
    pub culled: usize,
    /// Particles spawned after the update
    pub spawned: usize,
    /// The run length ran out on this tick
    pub expired: bool,
}

/// Simulates one confetti run.
#[derive(Debug, Clone)]
pub struct ParticleEngine<C: Clock = SystemClock> {
    config: ParticleConfig,
    viewport: Viewport,
    particles: Vec<Particle>,
    state: AnimationState,
    started_at: Option<DateTime<Utc>>,
    run_ms: u64,
    rng: Mcg128Xsl64,
    clock: C,
}

impl ParticleEngine<SystemClock> {
    pub fn new(config: ParticleConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> ParticleEngine<C> {
    pub fn with_clock(config: ParticleConfig, clock: C) -> Self {
        let rng = match config.seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        };
        Self {
            config,
            viewport: Viewport::default(),
            particles: Vec::new(),
            state: AnimationState::Dormant,
            started_at: None,
            run_ms: 0,
            rng,
            clock,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == AnimationState::Active
    }

    /// Dormant with nothing left on screen.
    pub fn is_finished(&self) -> bool {
        !self.is_active() && self.particles.is_empty()
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Fresh copy of every live particle, in spawn order.
    pub fn live_particles(&self) -> Vec<Particle> {
        self.particles.clone()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a run of `duration_ms`, replacing any particles from an earlier
    /// run. `initial_count` is capped at `max_particles`. Returns how many
    /// particles were spawned.
    pub fn start(&mut self, duration_ms: u64, initial_count: usize, viewport: Viewport) -> usize {
        self.viewport = viewport;
        self.particles.clear();
        self.state = AnimationState::Active;
        self.started_at = Some(self.clock.now());
        self.run_ms = duration_ms;

        let count = initial_count.min(self.config.max_particles);
        let spawned = (0..count).filter(|_| self.spawn()).count();
        debug!(duration_ms, spawned, "confetti started");
        spawned
    }

    /// Advance the simulation by `dt`.
    pub fn tick(&mut self, dt: Duration) -> TickReport {
        let mut report = TickReport::default();
        if !self.is_active() {
            return report;
        }
        if self.run_elapsed() {
            self.expire();
            report.expired = true;
            return report;
        }

        let dt_ms = u64::try_from(dt.as_millis()).unwrap_or(u64::MAX);
        let scale = dt.as_secs_f64() * 1000.0 / self.config.reference_tick_ms.max(1) as f64;
        let gravity = self.config.gravity * scale;
        let viewport = self.viewport;
        let margin = self.config.margin;

        let before = self.particles.len();
        self.particles.retain_mut(|p| {
            p.x += p.vx * scale;
            p.y += p.vy * scale;
            p.vy += gravity;
            p.rotation = (p.rotation + p.spin * scale).rem_euclid(360.0);
            p.age_ms = p.age_ms.saturating_add(dt_ms);
            viewport.contains(p.x, p.y, margin)
        });
        report.culled = before - self.particles.len();

        if self.particles.len() < self.config.max_particles
            && self.rng.gen::<f64>() < self.spawn_chance(scale)
            && self.spawn()
        {
            report.spawned = 1;
        }
        report
    }

    /// Stop moving and spawning. Particles stay put. Safe to call at any time.
    pub fn expire(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.state = AnimationState::Dormant;
        debug!(remaining = self.particles.len(), "confetti expired");
        true
    }

    /// Remove every particle without touching the run state.
    pub fn clear(&mut self) {
        self.particles.clear();
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn run_elapsed(&self) -> bool {
        match self.started_at {
            Some(start) => elapsed_ms(start, self.clock.now()) >= self.run_ms,
            None => true,
        }
    }

    /// Probability of one spawn over `scale` reference ticks, so the spawn
    /// rate per second does not depend on the host's tick rate.
    fn spawn_chance(&self, scale: f64) -> f64 {
        let p = self.config.spawn_probability.clamp(0.0, 1.0);
        if scale <= 0.0 {
            0.0
        } else {
            1.0 - (1.0 - p).powf(scale)
        }
    }

    /// Add one particle above the top edge. Fails on a zero-width or
    /// unbounded viewport.
    fn spawn(&mut self) -> bool {
        let width = self.viewport.width;
        if !width.is_finite() || width <= 0.0 {
            return false;
        }
        let cfg = &self.config;
        let max_x = (self.viewport.width - cfg.glyph_width).max(0.0);
        let x = uniform(&mut self.rng, 0.0, max_x);
        let vx = uniform(&mut self.rng, cfg.vx_min, cfg.vx_max);
        let vy = uniform(&mut self.rng, cfg.vy_min, cfg.vy_max);
        let spin = uniform(&mut self.rng, -cfg.max_spin, cfg.max_spin);
        let palette_len = cfg.palette.len().max(1);
        let glyph = self.rng.gen_range(0..palette_len);
        self.particles.push(Particle {
            x,
            y: cfg.spawn_y,
            vx,
            vy,
            glyph,
            rotation: 0.0,
            spin,
            age_ms: 0,
        });
        true
    }
}

/// Uniform sample in `[lo, hi)`, or `lo` for an empty or unbounded range.
fn uniform(rng: &mut Mcg128Xsl64, lo: f64, hi: f64) -> f64 {
    if hi > lo && (hi - lo).is_finite() {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    const TICK: Duration = Duration::from_millis(50);

    fn engine(spawn_probability: f64) -> (ManualClock, ParticleEngine<ManualClock>) {
        let clock = ManualClock::default();
        let config = ParticleConfig {
            seed: Some(7),
            spawn_probability,
            ..ParticleConfig::default()
        };
        (clock.clone(), ParticleEngine::with_clock(config, clock))
    }

    #[test]
    fn start_spawns_initial_particles_above_viewport() {
        let (_clock, mut engine) = engine(0.2);
        assert_eq!(engine.start(5_000, 20, Viewport::default()), 20);
        assert_eq!(engine.len(), 20);
        for p in engine.particles() {
            assert_eq!(p.y, -50.0);
            assert!((0.0..570.0).contains(&p.x));
            assert!((-2.0..2.0).contains(&p.vx));
            assert!((2.0..5.0).contains(&p.vy));
        }
    }

    #[test]
    fn initial_count_is_capped() {
        let (_clock, mut engine) = engine(0.0);
        assert_eq!(engine.start(5_000, 100, Viewport::default()), 25);
    }

    #[test]
    fn zero_width_viewport_never_spawns() {
        let (_clock, mut engine) = engine(1.0);
        assert_eq!(engine.start(5_000, 20, Viewport::new(0.0, 400.0)), 0);
        for _ in 0..50 {
            engine.tick(TICK);
        }
        assert!(engine.is_empty());
    }

    #[test]
    fn infinite_width_viewport_never_spawns() {
        let (_clock, mut engine) = engine(1.0);
        assert_eq!(engine.start(5_000, 20, Viewport::new(f64::INFINITY, 400.0)), 0);
        engine.tick(TICK);
        assert!(engine.is_empty());
    }

    #[test]
    fn overflowing_ranges_fall_back_to_lower_bound() {
        let config = ParticleConfig {
            seed: Some(7),
            max_spin: 1e308,
            vx_min: f64::MIN,
            vx_max: f64::MAX,
            ..ParticleConfig::default()
        };
        let mut engine = ParticleEngine::with_clock(config, ManualClock::default());
        assert_eq!(engine.start(5_000, 3, Viewport::default()), 3);
        for p in engine.particles() {
            assert_eq!(p.spin, -1e308);
            assert_eq!(p.vx, f64::MIN);
        }
    }

    #[test]
    fn tick_applies_velocity_then_gravity() {
        let (_clock, mut engine) = engine(0.0);
        engine.start(5_000, 1, Viewport::default());
        let before = engine.particles()[0];
        engine.tick(TICK);
        let after = engine.particles()[0];
        assert!((after.x - (before.x + before.vx)).abs() < 1e-9);
        assert!((after.y - (before.y + before.vy)).abs() < 1e-9);
        assert!((after.vy - (before.vy + 0.1)).abs() < 1e-9);
        assert_eq!(after.age_ms, 50);
    }

    #[test]
    fn half_ticks_move_half_as_far() {
        let (_clock, mut engine) = engine(0.0);
        engine.start(5_000, 1, Viewport::default());
        let before = engine.particles()[0];
        engine.tick(Duration::from_millis(25));
        let after = engine.particles()[0];
        assert!((after.y - (before.y + before.vy * 0.5)).abs() < 1e-9);
        assert!((after.vy - (before.vy + 0.05)).abs() < 1e-9);
    }

    #[test]
    fn always_spawns_with_certain_probability_until_cap() {
        let config = ParticleConfig {
            seed: Some(7),
            spawn_probability: 1.0,
            vx_min: 0.0,
            vx_max: 0.0,
            ..ParticleConfig::default()
        };
        let mut engine = ParticleEngine::with_clock(config, ManualClock::default());
        engine.start(60_000, 0, Viewport::new(600.0, 100_000.0));
        for _ in 0..40 {
            engine.tick(TICK);
        }
        assert_eq!(engine.len(), 25);
    }

    #[test]
    fn expires_after_run_length_and_freezes() {
        let (clock, mut engine) = engine(0.0);
        engine.start(5_000, 5, Viewport::default());
        clock.advance_ms(5_000);
        let report = engine.tick(TICK);
        assert!(report.expired);
        assert_eq!(engine.state(), AnimationState::Dormant);

        let frozen = engine.live_particles();
        engine.tick(TICK);
        assert_eq!(engine.live_particles(), frozen);
        assert!(!engine.is_finished());

        engine.clear();
        assert!(engine.is_finished());
    }

    #[test]
    fn expire_is_idempotent() {
        let (_clock, mut engine) = engine(0.0);
        assert!(!engine.expire());
        engine.start(5_000, 3, Viewport::default());
        assert!(engine.expire());
        assert!(!engine.expire());
        assert_eq!(engine.len(), 3);
    }

    #[test]
    fn same_seed_same_run() {
        let (_a, mut first) = engine(0.2);
        let (_b, mut second) = engine(0.2);
        first.start(5_000, 10, Viewport::default());
        second.start(5_000, 10, Viewport::default());
        for _ in 0..30 {
            first.tick(TICK);
            second.tick(TICK);
        }
        assert_eq!(first.live_particles(), second.live_particles());
    }
}
