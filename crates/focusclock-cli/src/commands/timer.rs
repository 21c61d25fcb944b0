use std::io::Write;
use std::time::Duration;

use clap::Subcommand;
use focusclock_core::timer::format_mm_ss;
use focusclock_core::{Config, FocusDesk, FocusTimer};
use tracing::info;

use super::{print_line, print_pretty};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run one focus interval in the foreground, printing events as JSON lines
    Run {
        /// Interval length in minutes (1-120); defaults to the configured value
        #[arg(long)]
        minutes: Option<u32>,
        /// Credit the focus time to a task with this name
        #[arg(long)]
        task: Option<String>,
        /// Completion check cadence in milliseconds
        #[arg(long)]
        tick_ms: Option<u64>,
        /// Do not draw the countdown on stderr
        #[arg(long)]
        quiet: bool,
    },
    /// Validate an interval length without starting anything
    Check {
        #[arg(long)]
        minutes: u32,
    },
    /// Print the idle timer state as JSON
    Status,
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TimerAction::Run {
            minutes,
            task,
            tick_ms,
            quiet,
        } => run_interval(minutes, task, tick_ms, quiet)?,
        TimerAction::Check { minutes } => {
            let mut timer = FocusTimer::new();
            print_pretty(&timer.configure(minutes)?)?;
        }
        TimerAction::Status => {
            let config = Config::load_or_default();
            let desk = FocusDesk::from_config(&config)?;
            print_pretty(&desk.snapshot())?;
        }
    }
    Ok(())
}

fn run_interval(
    minutes: Option<u32>,
    task: Option<String>,
    tick_ms: Option<u64>,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut desk = FocusDesk::from_config(&config)?;

    if let Some(minutes) = minutes {
        print_line(&desk.configure(minutes)?)?;
    }
    if let Some(name) = task {
        let (id, event) = desk.add_task(&name, None)?;
        print_line(&event)?;
        desk.work_on(id)?;
    }

    let tick = Duration::from_millis(tick_ms.unwrap_or(config.timer.coarse_tick_ms).max(1));
    if let Some(event) = desk.start() {
        print_line(&event)?;
    }
    info!(minutes = desk.timer().duration_min(), "focus interval running");

    loop {
        std::thread::sleep(tick);
        let events = desk.tick_coarse();
        if events.is_empty() {
            if !quiet {
                let mut stderr = std::io::stderr();
                write!(stderr, "\r{} ", format_mm_ss(desk.timer().remaining_ms()))?;
                stderr.flush()?;
            }
            continue;
        }
        if !quiet {
            eprintln!();
        }
        for event in &events {
            print_line(event)?;
        }
        break;
    }

    // Let the reminder's confetti play out before exiting.
    let frame = Duration::from_millis(config.confetti.reference_tick_ms.max(1));
    while desk.celebration().is_some() {
        std::thread::sleep(frame);
        for event in desk.tick_frame(frame) {
            print_line(&event)?;
        }
    }

    if let Some(task) = desk.current_task() {
        print_line(task)?;
    }
    Ok(())
}
