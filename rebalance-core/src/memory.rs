//! In-memory `TaskService` for tests and dry runs.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;

use crate::day::{Clock, DayRef};
use crate::error::ServiceError;
use crate::task::{Task, TaskId};
use crate::window::TaskService;

#[derive(Debug, Default)]
struct State {
    tasks: Vec<Task>,
    moves: Vec<(TaskId, DayRef)>,
    fetched: Vec<DayRef>,
    failing_fetch_days: HashSet<NaiveDate>,
    failing_moves: HashSet<TaskId>,
    include_completed: bool,
}

/// Task store held in memory, with failure injection.
///
/// Symbolic days are resolved against the given clock, the same way a
/// remote service resolves them against the user's local date.
#[derive(Debug)]
pub struct MemoryTaskService<C> {
    clock: C,
    state: Mutex<State>,
}

impl<C: Clock> MemoryTaskService<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            state: Mutex::new(State::default()),
        }
    }

    pub fn with_tasks(self, tasks: Vec<Task>) -> Self {
        self.lock().tasks.extend(tasks);
        self
    }

    /// Make every fetch for `date` fail with a transport error.
    pub fn fail_fetch_on(self, date: NaiveDate) -> Self {
        self.lock().failing_fetch_days.insert(date);
        self
    }

    /// Make every move of `task_id` fail with a server error.
    pub fn fail_move_of(self, task_id: impl Into<TaskId>) -> Self {
        self.lock().failing_moves.insert(task_id.into());
        self
    }

    /// Return completed tasks from fetches too, like a sloppy backend would.
    pub fn include_completed(self) -> Self {
        self.lock().include_completed = true;
        self
    }

    pub fn insert(&self, task: Task) {
        self.lock().tasks.push(task);
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.lock().tasks.clone()
    }

    /// Ids of incomplete tasks due on `date`, in store order.
    pub fn due_on(&self, date: NaiveDate) -> Vec<TaskId> {
        self.lock()
            .tasks
            .iter()
            .filter(|t| !t.completed && t.due == Some(date))
            .map(|t| t.id.clone())
            .collect()
    }

    /// Every successful move, in the order it was issued.
    pub fn moves(&self) -> Vec<(TaskId, DayRef)> {
        self.lock().moves.clone()
    }

    /// Every day a fetch was attempted for, in order.
    pub fn fetched_days(&self) -> Vec<DayRef> {
        self.lock().fetched.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<C: Clock + Sync> TaskService for MemoryTaskService<C> {
    async fn fetch_incomplete_tasks_due(&self, day: &DayRef) -> Result<Vec<Task>, ServiceError> {
        let date = day.resolve(self.clock.today());
        let mut state = self.lock();
        state.fetched.push(*day);

        if state.failing_fetch_days.contains(&date) {
            return Err(ServiceError::Transport(format!("connection reset fetching {day}")));
        }

        let include_completed = state.include_completed;
        Ok(state
            .tasks
            .iter()
            .filter(|t| t.due == Some(date))
            .filter(|t| include_completed || !t.completed)
            .cloned()
            .collect())
    }

    async fn set_task_due(&self, task_id: &TaskId, day: &DayRef) -> Result<(), ServiceError> {
        let date = day.resolve(self.clock.today());
        let mut state = self.lock();

        if state.failing_moves.contains(task_id) {
            return Err(ServiceError::Status {
                status: 503,
                body: format!("unable to update {task_id}"),
            });
        }

        let task = state
            .tasks
            .iter_mut()
            .find(|t| &t.id == task_id)
            .ok_or_else(|| ServiceError::Status {
                status: 404,
                body: format!("task {task_id} not found"),
            })?;
        task.due = Some(date);
        state.moves.push((task_id.clone(), *day));
        Ok(())
    }
}
