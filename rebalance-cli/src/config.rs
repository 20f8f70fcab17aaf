use anyhow::{bail, Context, Result};
use rebalance_core::SchedulerConfig;
use rebalance_todoist::{DEFAULT_BASE_URL, RetryConfig, TodoistConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const TOKEN_ENV: &str = "TODOIST_API_KEY";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub schedule: SchedulerConfig,
    pub todoist: TodoistSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TodoistSection {
    pub base_url: String,
    /// Retries for transient failures (network, 429, 5xx).
    pub max_retries: u32,
    pub timeout_secs: u64,
}

impl Default for TodoistSection {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_retries: 2,
            timeout_secs: 30,
        }
    }
}

impl TodoistSection {
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            bail!("todoist.timeout_secs must be at least 1");
        }
        if self.base_url.trim().is_empty() {
            bail!("todoist.base_url must not be empty");
        }
        Ok(())
    }

    pub fn client_config(&self, api_token: String) -> TodoistConfig {
        let mut cfg = TodoistConfig::new(api_token)
            .with_base_url(&self.base_url)
            .with_retry(RetryConfig::with_retries(self.max_retries));
        cfg.timeout = Duration::from_secs(self.timeout_secs);
        cfg
    }
}

pub fn rebalance_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".rebalance"))
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(rebalance_home()?.join("config.toml"))
}

/// Load the config file; a missing file means defaults.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_config(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn parse_config(s: &str) -> Result<Config> {
    let config: Config = toml::from_str(s)?;
    config.todoist.validate()?;
    Ok(config)
}

/// Todoist token from the environment (after `.env` has been loaded).
pub fn api_token() -> Result<String> {
    std::env::var(TOKEN_ENV)
        .ok()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .with_context(|| format!("{TOKEN_ENV} is not set (export it or put it in .env)"))
}
