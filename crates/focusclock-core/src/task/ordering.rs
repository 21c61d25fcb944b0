//! Display order for the task list.
//!
//! Keys, in priority order:
//! 1. incomplete before completed
//! 2. earliest deadline first, tasks without a deadline last
//! 3. name, case-insensitive
//! 4. name, case-sensitive
//! 5. task id
//!
//! The last key makes the order total, so the output never depends on the
//! input order.

use std::cmp::Ordering;

use super::Task;

/// Return the tasks sorted for display, leaving `tasks` untouched.
pub fn order(tasks: &[Task]) -> Vec<Task> {
    let mut sorted = tasks.to_vec();
    sorted.sort_by(compare);
    sorted
}

/// Total comparator behind [`order`].
pub fn compare(a: &Task, b: &Task) -> Ordering {
    a.is_completed()
        .cmp(&b.is_completed())
        .then_with(|| match (a.deadline, b.deadline) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| fold_case(&a.name).cmp(fold_case(&b.name)))
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id().cmp(&b.id()))
}

fn fold_case(name: &str) -> impl Iterator<Item = char> + '_ {
    name.chars().flat_map(char::to_lowercase)
}
