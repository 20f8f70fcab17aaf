//! Scheduler settings threaded into the window scheduler at construction.

use serde::{Deserialize, Serialize};

use crate::error::RebalanceError;

pub const DEFAULT_CAPACITY_HOURS: f64 = 1.0;
pub const DEFAULT_WINDOW_DAYS: usize = 5;

/// What to do when the task service or a task's data fails mid-run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Log the failure and carry on with the rest of the window.
    #[default]
    Resilient,
    /// Abort the run on the first failure.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Working hours available per day.
    pub capacity_hours: f64,
    /// Number of consecutive days processed per run.
    pub window_days: usize,
    pub error_policy: ErrorPolicy,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            capacity_hours: DEFAULT_CAPACITY_HOURS,
            window_days: DEFAULT_WINDOW_DAYS,
            error_policy: ErrorPolicy::Resilient,
        }
    }
}

impl SchedulerConfig {
    pub fn with_capacity_hours(mut self, hours: f64) -> Self {
        self.capacity_hours = hours;
        self
    }

    pub fn with_window_days(mut self, days: usize) -> Self {
        self.window_days = days;
        self
    }

    pub fn strict(mut self) -> Self {
        self.error_policy = ErrorPolicy::Strict;
        self
    }

    pub fn validate(&self) -> Result<(), RebalanceError> {
        if !self.capacity_hours.is_finite() || self.capacity_hours <= 0.0 {
            return Err(RebalanceError::Configuration(format!(
                "capacity_hours must be a positive number, got {}",
                self.capacity_hours
            )));
        }
        if self.window_days == 0 {
            return Err(RebalanceError::Configuration(
                "window_days must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_one_hour_over_five_days() {
        let cfg = SchedulerConfig::default();
        assert_eq!(cfg.capacity_hours, 1.0);
        assert_eq!(cfg.window_days, 5);
        assert_eq!(cfg.error_policy, ErrorPolicy::Resilient);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(SchedulerConfig::default().with_capacity_hours(0.0).validate().is_err());
        assert!(SchedulerConfig::default().with_capacity_hours(f64::NAN).validate().is_err());
        assert!(SchedulerConfig::default().with_window_days(0).validate().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: SchedulerConfig = serde_json::from_str(r#"{"error_policy": "strict"}"#).unwrap();
        assert_eq!(cfg.error_policy, ErrorPolicy::Strict);
        assert_eq!(cfg.window_days, 5);
    }
}
