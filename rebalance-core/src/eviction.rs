//! Eviction engine: decides which of a day's tasks must move to the next day.
//!
//! Algorithm (deterministic, single pass):
//! 1) drop completed tasks
//! 2) stable sort by priority DESC (equal priorities keep fetch order)
//! 3) walk the order accumulating durations
//! 4) the first task that pushes the total past capacity, and every task
//!    after it, is evicted
//!
//! The running total never decreases, so the evicted set is always a suffix
//! of the priority order. This is greedy, not a bin-packing optimum: a short
//! low-priority task after the crossing point is evicted even if it would fit.

use crate::error::RebalanceError;
use crate::task::Task;

/// Select the tasks to move off a day with `capacity_hours` of working time.
///
/// The returned tasks keep their relative priority order. An unsupported
/// duration unit anywhere in the day fails the whole computation.
pub fn select_evictions(tasks: &[Task], capacity_hours: f64) -> Result<Vec<Task>, RebalanceError> {
    let mut ordered: Vec<&Task> = tasks.iter().filter(|t| !t.completed).collect();
    ordered.sort_by(|a, b| b.priority.cmp(&a.priority));

    // Minutes keep sums like 3 x 20m exactly equal to a one hour capacity.
    let capacity_minutes = capacity_hours * 60.0;
    let mut total_minutes = 0.0;
    let mut crossed_at = None;

    for (i, task) in ordered.iter().enumerate() {
        total_minutes += task.minutes()?;
        if crossed_at.is_none() && total_minutes > capacity_minutes {
            crossed_at = Some(i);
        }
    }

    Ok(match crossed_at {
        Some(i) => ordered[i..].iter().map(|t| (*t).clone()).collect(),
        None => Vec::new(),
    })
}

/// A day is valid when nothing needs to be evicted from it.
pub fn day_is_valid(tasks: &[Task], capacity_hours: f64) -> Result<bool, RebalanceError> {
    Ok(select_evictions(tasks, capacity_hours)?.is_empty())
}

/// Total load of the incomplete tasks, in hours.
pub fn total_hours(tasks: &[Task]) -> Result<f64, RebalanceError> {
    let mut minutes = 0.0;
    for t in tasks.iter().filter(|t| !t.completed) {
        minutes += t.minutes()?;
    }
    Ok(minutes / 60.0)
}
