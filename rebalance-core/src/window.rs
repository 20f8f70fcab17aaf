//! Window scheduler: applies the eviction engine day by day across a rolling
//! window, so that overflow moved into day D+1 is seen when D+1 gets its turn.
//!
//! Days are processed strictly in order and each day is fetched fresh at the
//! moment it is visited. Nothing is pre-fetched for the whole window.

use std::fmt;
use std::future::Future;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::config::{ErrorPolicy, SchedulerConfig};
use crate::day::{Clock, DayRef};
use crate::error::{RebalanceError, ServiceError};
use crate::eviction::{select_evictions, total_hours};
use crate::task::{Task, TaskId};

/// External task store consumed by the scheduler.
///
/// Both calls accept symbolic and absolute days.
pub trait TaskService {
    /// Incomplete tasks whose due date is `day`.
    fn fetch_incomplete_tasks_due(
        &self,
        day: &DayRef,
    ) -> impl Future<Output = Result<Vec<Task>, ServiceError>> + Send;

    /// Reassign a task's due date.
    fn set_task_due(
        &self,
        task_id: &TaskId,
        day: &DayRef,
    ) -> impl Future<Output = Result<(), ServiceError>> + Send;
}

/// One day on which tasks were pushed forward.
#[derive(Debug, Clone, PartialEq)]
pub struct RebalanceAction {
    /// Number of tasks evicted (moves attempted).
    pub count: usize,
    pub from_day: DayRef,
    pub to_day: DayRef,
    /// Tasks whose move the service rejected; they stay on `from_day`.
    pub failed: Vec<TaskId>,
}

impl fmt::Display for RebalanceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.count == 1 { "task" } else { "tasks" };
        write!(
            f,
            "Moved {} {} from {} to {}",
            self.count, noun, self.from_day, self.to_day
        )
    }
}

#[derive(Debug)]
pub struct WindowScheduler<S, C> {
    service: S,
    clock: C,
    config: SchedulerConfig,
}

impl<S: TaskService, C: Clock> WindowScheduler<S, C> {
    /// Build a scheduler; an invalid config is rejected before any day runs.
    pub fn new(service: S, clock: C, config: SchedulerConfig) -> Result<Self, RebalanceError> {
        config.validate()?;
        Ok(Self { service, clock, config })
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Rebalance the configured window starting today.
    pub async fn run(&self) -> Result<Vec<RebalanceAction>, RebalanceError> {
        self.rebalance_window(self.config.window_days, DayRef::Today).await
    }

    /// Rebalance `window_days` consecutive days starting at `start`.
    pub async fn rebalance_window(
        &self,
        window_days: usize,
        start: DayRef,
    ) -> Result<Vec<RebalanceAction>, RebalanceError> {
        let today = self.clock.today();
        let mut actions = Vec::new();
        let mut current = start;

        for i in 0..window_days {
            if i > 0 {
                current = current.next(today);
            }
            if let Some(action) = self.rebalance_day(current, today).await? {
                actions.push(action);
            }
        }

        Ok(actions)
    }

    async fn rebalance_day(
        &self,
        day: DayRef,
        today: NaiveDate,
    ) -> Result<Option<RebalanceAction>, RebalanceError> {
        let tasks = match self.service.fetch_incomplete_tasks_due(&day).await {
            Ok(tasks) => tasks,
            Err(source) => {
                // A day that cannot be read is treated as already valid.
                self.tolerate(RebalanceError::Service { day, source })?;
                return Ok(None);
            }
        };
        let tasks: Vec<Task> = tasks.into_iter().filter(|t| !t.completed).collect();

        let evicted = match select_evictions(&tasks, self.config.capacity_hours) {
            Ok(evicted) => evicted,
            Err(err) => {
                self.tolerate(err)?;
                return Ok(None);
            }
        };

        debug!(
            day = %day,
            tasks = tasks.len(),
            hours = total_hours(&tasks).unwrap_or_default(),
            evicted = evicted.len(),
            "checked day"
        );

        if evicted.is_empty() {
            return Ok(None);
        }

        let to_day = day.next(today);
        let mut failed = Vec::new();
        for task in &evicted {
            if let Err(source) = self.service.set_task_due(&task.id, &to_day).await {
                self.tolerate(RebalanceError::Move {
                    task_id: task.id.clone(),
                    day: to_day,
                    source,
                })?;
                failed.push(task.id.clone());
            }
        }

        info!(
            from = %day,
            to = %to_day,
            count = evicted.len(),
            failed = failed.len(),
            "moved tasks"
        );

        Ok(Some(RebalanceAction {
            count: evicted.len(),
            from_day: day,
            to_day,
            failed,
        }))
    }

    fn tolerate(&self, err: RebalanceError) -> Result<(), RebalanceError> {
        match self.config.error_policy {
            ErrorPolicy::Strict => Err(err),
            ErrorPolicy::Resilient => {
                warn!(error = %err, "continuing after failure");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::day::FixedClock;
    use crate::memory::MemoryTaskService;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    #[test]
    fn action_line_uses_singular_for_one_task() {
        let one = RebalanceAction {
            count: 1,
            from_day: DayRef::Today,
            to_day: DayRef::Date(NaiveDate::from_ymd_opt(2026, 3, 3).unwrap()),
            failed: vec![],
        };
        assert_eq!(one.to_string(), "Moved 1 task from today to 2026-03-03");

        let many = RebalanceAction { count: 3, ..one };
        assert_eq!(many.to_string(), "Moved 3 tasks from today to 2026-03-03");
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let service = MemoryTaskService::new(FixedClock(today()));
        let res = WindowScheduler::new(
            service,
            FixedClock(today()),
            SchedulerConfig::default().with_window_days(0),
        );
        assert!(matches!(res, Err(RebalanceError::Configuration(_))));
    }

    #[tokio::test]
    async fn quiet_window_reports_nothing() {
        let clock = FixedClock(today());
        let service = MemoryTaskService::new(clock)
            .with_tasks(vec![Task::new("a", "").with_minutes(30.0).with_due(today())]);
        let scheduler = WindowScheduler::new(service, clock, SchedulerConfig::default()).unwrap();

        let actions = scheduler.run().await.unwrap();
        assert!(actions.is_empty());
        assert_eq!(scheduler.service().fetched_days().len(), 5);
    }

    #[tokio::test]
    async fn first_day_keeps_its_symbolic_name() {
        let clock = FixedClock(today());
        let service = MemoryTaskService::new(clock).with_tasks(vec![
            Task::new("keep", "").with_priority(4).with_minutes(50.0).with_due(today()),
            Task::new("move", "").with_priority(1).with_minutes(20.0).with_due(today()),
        ]);
        let scheduler = WindowScheduler::new(service, clock, SchedulerConfig::default()).unwrap();

        let actions = scheduler.run().await.unwrap();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].to_string(), "Moved 1 task from today to 2026-03-03");
    }
}
