//! Task snapshot as seen by the scheduling engine.
//!
//! Tasks are owned by the external task service; the engine only ever reads
//! these values and designates tasks for a due-date move.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::RebalanceError;

/// Minutes assumed for a task that carries no duration.
pub const DEFAULT_TASK_MINUTES: f64 = 45.0;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Task priority on the 1..=4 scale; a higher value is more important.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Priority(pub u8);

impl Priority {
    pub const P1: Priority = Priority(1);
    pub const P2: Priority = Priority(2);
    pub const P3: Priority = Priority(3);
    pub const P4: Priority = Priority(4);
}

impl Default for Priority {
    fn default() -> Self {
        Priority::P1
    }
}

/// Unit of a task duration.
///
/// Unknown units are kept verbatim instead of being rejected while decoding,
/// so the eviction engine can report exactly which task carried them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DurationUnit {
    Minute,
    Day,
    Unsupported(String),
}

impl From<String> for DurationUnit {
    fn from(s: String) -> Self {
        match s.as_str() {
            "minute" => DurationUnit::Minute,
            "day" => DurationUnit::Day,
            _ => DurationUnit::Unsupported(s),
        }
    }
}

impl From<DurationUnit> for String {
    fn from(unit: DurationUnit) -> Self {
        match unit {
            DurationUnit::Minute => "minute".to_string(),
            DurationUnit::Day => "day".to_string(),
            DurationUnit::Unsupported(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDuration {
    pub amount: f64,
    pub unit: DurationUnit,
}

impl TaskDuration {
    pub fn minutes(amount: f64) -> Self {
        Self { amount, unit: DurationUnit::Minute }
    }

    pub fn days(amount: f64) -> Self {
        Self { amount, unit: DurationUnit::Day }
    }

    /// Length in minutes. Fails for units the engine cannot convert.
    pub fn in_minutes(&self, task_id: &TaskId) -> Result<f64, RebalanceError> {
        match &self.unit {
            DurationUnit::Minute => Ok(self.amount),
            DurationUnit::Day => Ok(self.amount * 24.0 * 60.0),
            DurationUnit::Unsupported(unit) => Err(RebalanceError::UnsupportedDurationUnit {
                task_id: task_id.clone(),
                unit: unit.clone(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub duration: Option<TaskDuration>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub due: Option<NaiveDate>,
}

impl Task {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: TaskId(id.into()),
            content: content.into(),
            priority: Priority::default(),
            duration: None,
            completed: false,
            due: None,
        }
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = Priority(priority);
        self
    }

    pub fn with_minutes(mut self, minutes: f64) -> Self {
        self.duration = Some(TaskDuration::minutes(minutes));
        self
    }

    pub fn with_duration(mut self, duration: TaskDuration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_due(mut self, due: NaiveDate) -> Self {
        self.due = Some(due);
        self
    }

    pub fn completed(mut self) -> Self {
        self.completed = true;
        self
    }

    /// Duration in minutes, falling back to [`DEFAULT_TASK_MINUTES`].
    pub fn minutes(&self) -> Result<f64, RebalanceError> {
        match &self.duration {
            Some(d) => d.in_minutes(&self.id),
            None => Ok(DEFAULT_TASK_MINUTES),
        }
    }

    /// Duration in hours, falling back to 45 minutes.
    pub fn hours(&self) -> Result<f64, RebalanceError> {
        Ok(self.minutes()? / 60.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_duration_is_three_quarters_of_an_hour() {
        let t = Task::new("t1", "no duration");
        assert_eq!(t.hours().unwrap(), 0.75);
    }

    #[test]
    fn unit_conversion() {
        assert_eq!(Task::new("a", "").with_minutes(90.0).hours().unwrap(), 1.5);
        assert_eq!(
            Task::new("b", "").with_duration(TaskDuration::days(1.0)).hours().unwrap(),
            24.0
        );
    }

    #[test]
    fn unsupported_unit_names_the_task() {
        let t = Task::new("odd", "").with_duration(TaskDuration {
            amount: 2.0,
            unit: DurationUnit::Unsupported("week".to_string()),
        });
        let err = t.hours().unwrap_err();
        assert_eq!(
            err,
            RebalanceError::UnsupportedDurationUnit {
                task_id: TaskId::from("odd"),
                unit: "week".to_string(),
            }
        );
    }

    #[test]
    fn duration_unit_serde_keeps_unknown_values() {
        let d: TaskDuration = serde_json::from_str(r#"{"amount": 3, "unit": "hour"}"#).unwrap();
        assert_eq!(d.unit, DurationUnit::Unsupported("hour".to_string()));

        let d: TaskDuration = serde_json::from_str(r#"{"amount": 30, "unit": "minute"}"#).unwrap();
        assert_eq!(d.unit, DurationUnit::Minute);
        assert_eq!(serde_json::to_value(&d).unwrap()["unit"], "minute");
    }

    #[test]
    fn priority_orders_higher_as_more_important() {
        assert!(Priority::P4 > Priority::P1);
        let mut ps = vec![Priority::P2, Priority::P4, Priority::P1];
        ps.sort_by(|a, b| b.cmp(a));
        assert_eq!(ps, vec![Priority::P4, Priority::P2, Priority::P1]);
    }
}
