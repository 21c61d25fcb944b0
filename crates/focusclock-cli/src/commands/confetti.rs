use std::time::Duration;

use clap::Subcommand;
use focusclock_core::{Config, ManualClock, Particle, ParticleEngine, Viewport};
use serde::Serialize;

use super::print_line;

#[derive(Subcommand)]
pub enum ConfettiAction {
    /// Simulate a confetti run in simulated time and print one JSON line per tick
    Run {
        /// Run length before the engine goes dormant
        #[arg(long)]
        duration_ms: Option<u64>,
        /// Particles spawned at start
        #[arg(long)]
        initial: Option<usize>,
        #[arg(long)]
        width: Option<f64>,
        #[arg(long)]
        height: Option<f64>,
        /// Simulated tick length
        #[arg(long)]
        tick_ms: Option<u64>,
        /// Stop after this many ticks even if still active
        #[arg(long, default_value = "200")]
        ticks: usize,
        /// RNG seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
        /// Include every particle in each line, not just counts
        #[arg(long)]
        particles: bool,
    },
}

#[derive(Serialize)]
struct Frame<'a> {
    tick: usize,
    live: usize,
    spawned: usize,
    culled: usize,
    expired: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    particles: Option<Vec<RenderedParticle<'a>>>,
}

#[derive(Serialize)]
struct RenderedParticle<'a> {
    glyph: &'a str,
    #[serde(flatten)]
    particle: Particle,
}

pub fn run(action: ConfettiAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfettiAction::Run {
            duration_ms,
            initial,
            width,
            height,
            tick_ms,
            ticks,
            seed,
            particles,
        } => {
            let config = Config::load_or_default();
            let mut confetti = config.confetti.clone();
            if seed.is_some() {
                confetti.seed = seed;
            }
            let palette = confetti.palette;
            let duration_ms = duration_ms.unwrap_or(confetti.duration_ms);
            let initial = initial.unwrap_or(confetti.initial_count);
            let viewport = Viewport::new(
                width.unwrap_or(config.viewport.width),
                height.unwrap_or(config.viewport.height),
            );
            let dt_ms = tick_ms.unwrap_or(confetti.reference_tick_ms).max(1);

            let clock = ManualClock::default();
            let mut engine = ParticleEngine::with_clock(confetti, clock.clone());
            engine.start(duration_ms, initial, viewport);

            for tick in 1..=ticks {
                clock.advance_ms(i64::try_from(dt_ms)?);
                let report = engine.tick(Duration::from_millis(dt_ms));
                let rendered = particles.then(|| {
                    engine
                        .particles()
                        .iter()
                        .map(|p| RenderedParticle {
                            glyph: palette.glyph(p.glyph),
                            particle: *p,
                        })
                        .collect()
                });
                print_line(&Frame {
                    tick,
                    live: engine.len(),
                    spawned: report.spawned,
                    culled: report.culled,
                    expired: report.expired,
                    particles: rendered,
                })?;
                if !engine.is_active() {
                    break;
                }
            }
        }
    }
    Ok(())
}
