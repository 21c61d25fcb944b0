//! Integration tests for task display ordering.

use chrono::{Days, NaiveDate, TimeZone, Utc};
use focusclock_core::task::{compare, order};
use focusclock_core::{Task, TaskId, TaskList};
use proptest::prelude::*;

fn arb_task() -> impl Strategy<Value = Task> {
    (
        1u64..50,
        prop::sample::select(vec!["alpha", "Alpha", "beta", "Gamma", "gamma", "delta"]),
        prop::option::of(0u64..10),
        any::<bool>(),
    )
        .prop_map(|(id, name, offset, completed)| {
            let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
            let created = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
            let mut task = Task::new(TaskId(id), name, created).with_completed(completed);
            task.deadline = offset.and_then(|d| base.checked_add_days(Days::new(d)));
            task
        })
}

#[test]
fn incomplete_with_deadline_then_without_then_completed() {
    let mut tasks = TaskList::new();
    let now = Utc::now();
    let today = now.date_naive();
    let a = tasks.add("A", None, now).unwrap();
    let b = tasks
        .add("B", today.checked_add_days(Days::new(1)), now)
        .unwrap();
    let c = tasks.add("C", Some(today), now).unwrap();
    tasks.toggle_complete(c).unwrap();

    let ids: Vec<TaskId> = tasks.ordered().iter().map(Task::id).collect();
    assert_eq!(ids, vec![b, a, c]);
}

proptest! {
    #[test]
    fn ordering_is_idempotent(tasks in prop::collection::vec(arb_task(), 0..30)) {
        let once = order(&tasks);
        let twice = order(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn ordering_ignores_input_order(tasks in prop::collection::vec(arb_task(), 0..30)) {
        let mut reversed = tasks.clone();
        reversed.reverse();
        prop_assert_eq!(order(&tasks), order(&reversed));
    }

    #[test]
    fn output_is_sorted_and_a_permutation(tasks in prop::collection::vec(arb_task(), 0..30)) {
        let sorted = order(&tasks);
        prop_assert_eq!(sorted.len(), tasks.len());
        for pair in sorted.windows(2) {
            prop_assert!(compare(&pair[0], &pair[1]).is_le());
        }
        let incomplete_after_complete = sorted
            .windows(2)
            .any(|w| w[0].is_completed() && !w[1].is_completed());
        prop_assert!(!incomplete_after_complete);
    }
}
