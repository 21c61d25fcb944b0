//! Integration tests for focus interval completion and time crediting.

use focusclock_core::{Clock, Event, FocusTimer, ManualClock, TaskList, TimerError, TimerState};

/// Run one interval of `minutes` ticking every `tick_ms`, and return the
/// elapsed time at which completion fired plus how many completions fired.
fn run_interval(minutes: u32, tick_ms: i64) -> (i64, usize) {
    let clock = ManualClock::default();
    let mut timer = FocusTimer::with_clock(clock.clone());
    let mut tasks = TaskList::new();
    timer.configure(minutes).unwrap();
    timer.start(None);

    let limit = i64::from(minutes) * 60_000 + 10 * tick_ms;
    let mut fired_at = None;
    let mut fired = 0;
    let mut now = 0;
    while now <= limit {
        clock.advance_ms(tick_ms);
        now += tick_ms;
        if let Some(Event::TimerCompleted { .. }) = timer.tick(&mut tasks) {
            fired += 1;
            fired_at.get_or_insert(now);
        }
    }
    (fired_at.expect("interval never completed"), fired)
}

#[test]
fn coarse_and_fine_ticks_complete_within_one_tick_of_each_other() {
    for minutes in [1, 7, 25, 120] {
        let (coarse_at, coarse_count) = run_interval(minutes, 1000);
        let (fine_at, fine_count) = run_interval(minutes, 100);
        let threshold = i64::from(minutes) * 60_000;

        assert_eq!(coarse_count, 1);
        assert_eq!(fine_count, 1);
        assert!(coarse_at >= threshold && coarse_at < threshold + 1000);
        assert!(fine_at >= threshold && fine_at < threshold + 100);
        assert!((coarse_at - fine_at).abs() < 1000);
    }
}

#[test]
fn jittery_ticks_still_fire_exactly_once() {
    let clock = ManualClock::default();
    let mut timer = FocusTimer::with_clock(clock.clone());
    let mut tasks = TaskList::new();
    timer.configure(2).unwrap();
    timer.start(None);

    let steps = [700, 1300, 999, 45_000, 3, 70_000, 1, 1, 20_000];
    let fired: usize = steps
        .iter()
        .filter(|&&ms| {
            clock.advance_ms(ms);
            matches!(timer.tick(&mut tasks), Some(Event::TimerCompleted { .. }))
        })
        .count();
    assert_eq!(fired, 1);
}

#[test]
fn missed_ticks_complete_on_the_next_late_tick() {
    let clock = ManualClock::default();
    let mut timer = FocusTimer::with_clock(clock.clone());
    let mut tasks = TaskList::new();
    let id = tasks.add("Deep work", None, clock.now()).unwrap();
    timer.configure(1).unwrap();
    timer.start(Some(id));

    // Host was suspended for five minutes.
    clock.advance_ms(5 * 60_000);
    match timer.tick(&mut tasks) {
        Some(Event::TimerCompleted { elapsed_ms, credited, task_id, .. }) => {
            assert_eq!(elapsed_ms, 5 * 60_000);
            assert!(credited);
            assert_eq!(task_id, Some(id));
        }
        other => panic!("Expected TimerCompleted, got {other:?}"),
    }
    assert_eq!(tasks.get(id).unwrap().worked_ms(), Some(5 * 60_000));
}

#[test]
fn worked_time_accumulates_across_intervals_and_stops_count_once() {
    let clock = ManualClock::default();
    let mut timer = FocusTimer::with_clock(clock.clone());
    let mut tasks = TaskList::new();
    let id = tasks.add("Essay", None, clock.now()).unwrap();

    timer.start(Some(id));
    clock.advance_ms(12_345);
    timer.stop(&mut tasks);
    timer.stop(&mut tasks);

    timer.start(None);
    clock.advance_ms(655);
    timer.reset(&mut tasks);

    assert_eq!(tasks.get(id).unwrap().worked_ms(), Some(13_000));
    assert_eq!(timer.remaining_ms(), timer.duration_ms());
}

#[test]
fn deleted_task_is_not_credited() {
    let clock = ManualClock::default();
    let mut timer = FocusTimer::with_clock(clock.clone());
    let mut tasks = TaskList::new();
    let id = tasks.add("Gone", None, clock.now()).unwrap();

    timer.start(Some(id));
    clock.advance_ms(1_000);
    tasks.remove(id);
    let event = timer.stop(&mut tasks);
    assert!(matches!(event, Some(Event::TimerStopped { credited: false, .. })));
    assert!(timer.task(&tasks).is_none());
}

#[test]
fn reconfigure_only_while_idle() {
    let clock = ManualClock::default();
    let mut timer = FocusTimer::with_clock(clock.clone());
    let mut tasks = TaskList::new();
    timer.configure(45).unwrap();
    timer.start(None);

    let err = timer.configure(5).unwrap_err();
    assert!(matches!(err, TimerError::IllegalStateTransition { .. }));
    assert_eq!(timer.duration_min(), 45);
    assert_eq!(timer.state(), TimerState::Running);

    timer.stop(&mut tasks);
    timer.configure(5).unwrap();
    assert_eq!(timer.remaining_ms(), 5 * 60_000);
}
