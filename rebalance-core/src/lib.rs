//! rebalance-core: capacity-constrained rebalancing of a daily task load.
//!
//! The eviction engine picks which of a day's tasks overflow the working-hour
//! budget; the window scheduler applies it day by day so overflow cascades
//! forward through a rolling window.

pub mod config;
pub mod day;
pub mod error;
pub mod eviction;
pub mod memory;
pub mod task;
pub mod window;

pub use config::{ErrorPolicy, SchedulerConfig, DEFAULT_CAPACITY_HOURS, DEFAULT_WINDOW_DAYS};
pub use day::{format_date, Clock, DayRef, FixedClock, LocalClock};
pub use error::{RebalanceError, ServiceError};
pub use eviction::{day_is_valid, select_evictions, total_hours};
pub use memory::MemoryTaskService;
pub use task::{DurationUnit, Priority, Task, TaskDuration, TaskId, DEFAULT_TASK_MINUTES};
pub use window::{RebalanceAction, TaskService, WindowScheduler};
