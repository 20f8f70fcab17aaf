//! Error taxonomy for a rebalance run.

use crate::day::DayRef;
use crate::task::TaskId;

/// Failure reported by a `TaskService` implementation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ServiceError {
    /// Network-level failure (connect, timeout, reset).
    #[error("transport error: {0}")]
    Transport(String),
    /// The service rejected the credentials.
    #[error("auth error: {0}")]
    Auth(String),
    /// Non-success HTTP status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    /// The response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),
}

impl ServiceError {
    /// Whether retrying the same call may succeed (transport, 429, 5xx).
    pub fn is_transient(&self) -> bool {
        match self {
            ServiceError::Transport(_) => true,
            ServiceError::Status { status, .. } => *status == 429 || *status >= 500,
            ServiceError::Auth(_) | ServiceError::Decode(_) => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RebalanceError {
    #[error("task service failed for {day}: {source}")]
    Service {
        day: DayRef,
        #[source]
        source: ServiceError,
    },
    #[error("could not move task {task_id} to {day}: {source}")]
    Move {
        task_id: TaskId,
        day: DayRef,
        #[source]
        source: ServiceError,
    },
    #[error("task {task_id} has unsupported duration unit '{unit}'")]
    UnsupportedDurationUnit { task_id: TaskId, unit: String },
    #[error("configuration error: {0}")]
    Configuration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification() {
        assert!(ServiceError::Transport("reset".into()).is_transient());
        assert!(ServiceError::Status { status: 429, body: String::new() }.is_transient());
        assert!(ServiceError::Status { status: 503, body: String::new() }.is_transient());
        assert!(!ServiceError::Status { status: 404, body: String::new() }.is_transient());
        assert!(!ServiceError::Auth("bad token".into()).is_transient());
    }

    #[test]
    fn move_error_names_task_and_target_day() {
        let err = RebalanceError::Move {
            task_id: TaskId::from("t42"),
            day: DayRef::Tomorrow,
            source: ServiceError::Status { status: 503, body: "busy".into() },
        };
        assert_eq!(err.to_string(), "could not move task t42 to tomorrow: HTTP 503: busy");
    }
}
