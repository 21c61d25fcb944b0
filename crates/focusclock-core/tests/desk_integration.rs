//! End-to-end desk flows: a user working through a few tasks.

use std::time::Duration;

use focusclock_core::{
    CelebrationKind, Config, CoreError, Event, FocusDesk, ManualClock, ValidationError,
};

fn desk_with(config: &Config) -> (ManualClock, FocusDesk<ManualClock>) {
    let clock = ManualClock::default();
    let desk = FocusDesk::with_clock(clock.clone(), config).unwrap();
    (clock, desk)
}

#[test]
fn full_interval_credits_task_and_plays_out_celebration() {
    let mut config = Config::default();
    config.timer.focus_minutes = 2;
    config.confetti.seed = Some(3);
    let (clock, mut desk) = desk_with(&config);

    let (id, _) = desk.add_task("Write report", None).unwrap();
    desk.work_on(id).unwrap();
    assert!(matches!(desk.start(), Some(Event::TimerStarted { duration_min: 2, .. })));

    let mut completed = Vec::new();
    for _ in 0..130 {
        clock.advance_ms(1000);
        completed.extend(desk.tick_coarse());
        if !completed.is_empty() {
            break;
        }
    }
    assert_eq!(completed.len(), 3);
    match &completed[0] {
        Event::TimerCompleted {
            elapsed_ms,
            task_id,
            credited,
            ..
        } => {
            assert_eq!(*elapsed_ms, 120_000);
            assert_eq!(*task_id, Some(id));
            assert!(*credited);
        }
        other => panic!("expected completion, got {other:?}"),
    }
    assert_eq!(desk.current_task().unwrap().worked_ms(), Some(120_000));

    let frame = Duration::from_millis(50);
    let mut ended = false;
    for _ in 0..200 {
        clock.advance_ms(50);
        let events = desk.tick_frame(frame);
        if events.iter().any(|e| {
            matches!(e, Event::CelebrationEnded { kind: CelebrationKind::RestReminder, .. })
        }) {
            ended = true;
            break;
        }
        let live = desk.celebration().map_or(0, |c| c.engine().len());
        assert!(live <= 25);
    }
    assert!(ended);
    assert!(desk.celebration().is_none());
}

#[test]
fn stopping_early_accumulates_across_intervals() {
    let (clock, mut desk) = desk_with(&Config::default());
    let (id, _) = desk.add_task("Read paper", None).unwrap();
    desk.work_on(id).unwrap();

    desk.start();
    clock.advance_ms(90_000);
    desk.stop();

    // The binding survives the stop.
    desk.start();
    clock.advance_ms(30_000);
    desk.stop();

    assert_eq!(desk.tasks().get(id).unwrap().worked_ms(), Some(120_000));
}

#[test]
fn completing_a_task_while_a_reminder_celebrates_replaces_it() {
    let mut config = Config::default();
    config.timer.focus_minutes = 1;
    let (clock, mut desk) = desk_with(&config);
    let (id, _) = desk.add_task("Tidy desk", None).unwrap();

    desk.start();
    clock.advance_ms(60_000);
    desk.tick_coarse();
    assert_eq!(desk.celebration().unwrap().kind(), CelebrationKind::RestReminder);

    let events = desk.toggle_complete(id).unwrap();
    assert!(events.iter().any(|e| matches!(
        e,
        Event::CelebrationEnded { kind: CelebrationKind::RestReminder, .. }
    )));
    assert_eq!(desk.celebration().unwrap().kind(), CelebrationKind::TaskCompleted);
}

#[test]
fn blank_task_names_are_rejected() {
    let (_clock, mut desk) = desk_with(&Config::default());
    let err = desk.add_task("   ", None).unwrap_err();
    assert!(matches!(
        err,
        CoreError::Validation(ValidationError::EmptyTaskName)
    ));
    assert!(desk.tasks().is_empty());
}

#[test]
fn out_of_range_config_is_refused() {
    let mut config = Config::default();
    config.timer.focus_minutes = 0;
    assert!(FocusDesk::with_clock(ManualClock::default(), &config).is_err());
}
