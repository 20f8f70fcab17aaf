//! rebalance-todoist: Todoist REST adapter for the rebalance scheduler.

pub mod client;
pub mod retry;
pub mod wire;

pub use client::{TodoistClient, TodoistConfig, DEFAULT_BASE_URL};
pub use retry::RetryConfig;
