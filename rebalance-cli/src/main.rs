use anyhow::{Context, Result};
use clap::Parser;
use rebalance_core::{DayRef, LocalClock, WindowScheduler};
use rebalance_todoist::TodoistClient;
use std::path::PathBuf;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

mod config;

use config::Config;

/// Push lower-priority Todoist tasks forward so no day exceeds its working hours.
#[derive(Parser, Debug)]
#[command(
    name = "rebalance",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("REBALANCE_BUILD_SHA"), ")"),
    about = "Rebalance your Todoist days against a daily working-hour budget"
)]
struct Cli {
    /// Config file (defaults to ~/.rebalance/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Working hours per day
    #[arg(long)]
    capacity_hours: Option<f64>,

    /// Number of days to rebalance
    #[arg(long)]
    window_days: Option<usize>,

    /// Abort on the first service failure instead of skipping it
    #[arg(long)]
    strict: bool,

    /// First day of the window: today, tomorrow or YYYY-MM-DD
    #[arg(long, default_value = "today")]
    start: DayRef,
}

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG overrides; logs go to stderr so stdout stays the report.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,rebalance=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match dotenvy::dotenv() {
        Ok(path) => debug!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => warn!(error = %e, "ignoring unreadable .env"),
    }

    let config_path = match &cli.config {
        Some(p) => p.clone(),
        None => config::default_config_path()?,
    };
    let config = apply_overrides(config::load_config(&config_path)?, &cli);
    config.schedule.validate()?;

    let token = config::api_token()?;
    let client = TodoistClient::new(config.todoist.client_config(token))
        .context("create Todoist client")?;
    let scheduler = WindowScheduler::new(client, LocalClock, config.schedule.clone())?;

    let actions = scheduler
        .rebalance_window(config.schedule.window_days, cli.start)
        .await?;

    for action in &actions {
        println!("{action}");
    }

    Ok(())
}

/// Command-line flags win over the config file.
fn apply_overrides(mut config: Config, cli: &Cli) -> Config {
    if let Some(hours) = cli.capacity_hours {
        config.schedule.capacity_hours = hours;
    }
    if let Some(days) = cli.window_days {
        config.schedule.window_days = days;
    }
    if cli.strict {
        config.schedule = config.schedule.strict();
    }
    config
}
