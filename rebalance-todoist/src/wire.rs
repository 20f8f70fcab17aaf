//! Todoist REST payloads and their mapping onto core tasks.

use chrono::NaiveDate;
use rebalance_core::{Priority, Task, TaskDuration, TaskId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct ApiTask {
    pub id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_priority")]
    pub priority: u8,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub due: Option<ApiDue>,
    #[serde(default)]
    pub duration: Option<TaskDuration>,
}

fn default_priority() -> u8 {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiDue {
    /// `YYYY-MM-DD`; the date part is all the scheduler looks at.
    pub date: String,
    #[serde(default)]
    pub string: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateDue<'a> {
    pub due_string: &'a str,
}

impl From<ApiTask> for Task {
    fn from(t: ApiTask) -> Self {
        // Timed dues come through as "YYYY-MM-DDTHH:MM:SS"; keep the day.
        let due = t
            .due
            .as_ref()
            .and_then(|d| d.date.get(..10))
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok());

        Task {
            id: TaskId(t.id),
            content: t.content,
            priority: Priority(t.priority),
            duration: t.duration,
            completed: t.is_completed,
            due,
        }
    }
}
