//! Example stagehand process.
//!
//! # Usage
//!
//! ```bash
//! stagehand-demo [OPTIONS] [run|hooks]
//! ```
//!
//! # Example
//!
//! ```bash
//! # Start everything, exit cleanly after three seconds
//! stagehand-demo --exit-after 3
//!
//! # Watch a failed start roll back
//! stagehand-demo --fail-start cache
//!
//! # Print the start and stop order without running anything
//! stagehand-demo hooks
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use demo::{DemoOptions, register};
use stagehand_core::{TracingConfig, TracingFormat};
use stagehand_lifecycle::lifecycle::DefaultLifecycle;
use stagehand_runtime::{LifecycleConfig, Supervisor};
use tracing::{Level, error, info};

#[derive(Parser)]
#[command(name = "stagehand-demo")]
#[command(about = "Starts a set of sample components in order and stops them in reverse", long_about = None)]
struct Cli {
    /// TOML file with `start_timeout_secs` / `stop_timeout_secs`.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start budget in seconds (overrides the config file).
    #[arg(long)]
    start_timeout: Option<u64>,

    /// Stop budget in seconds (overrides the config file).
    #[arg(long)]
    stop_timeout: Option<u64>,

    /// Log output format: pretty, compact or json.
    #[arg(long, default_value = "pretty")]
    log_format: TracingFormat,

    /// Maximum log level.
    #[arg(long, default_value = "info")]
    log_level: Level,

    /// Make the start procedure of `config` or `cache` fail.
    #[arg(long)]
    fail_start: Option<String>,

    /// Request a clean shutdown this many seconds after start.
    #[arg(long)]
    exit_after: Option<u64>,

    /// Milliseconds the sample database takes to connect.
    #[arg(long, default_value_t = 200)]
    connect_delay_ms: u64,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy, Default)]
enum Commands {
    /// Start, wait for Ctrl-C or the exit timer, then stop (default)
    #[default]
    Run,
    /// Print the start and stop order of every hook
    Hooks,
}

impl Cli {
    fn lifecycle_config(&self) -> Result<LifecycleConfig, stagehand_runtime::ConfigError> {
        let mut config = match &self.config {
            Some(path) => LifecycleConfig::from_file(path)?,
            None => LifecycleConfig::default(),
        };
        if let Some(secs) = self.start_timeout {
            config = config.with_start_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = self.stop_timeout {
            config = config.with_stop_timeout(Duration::from_secs(secs));
        }
        config.validate()?;
        Ok(config)
    }

    fn demo_options(&self) -> DemoOptions {
        DemoOptions {
            fail_start: self.fail_start.clone(),
            exit_after: self.exit_after.map(Duration::from_secs),
            connect_delay: Duration::from_millis(self.connect_delay_ms),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    TracingConfig::new()
        .with_level(cli.log_level)
        .with_format(cli.log_format)
        .init();

    let config = match cli.lifecycle_config() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let lifecycle = Arc::new(DefaultLifecycle::new());
    let supervisor = Supervisor::new(Arc::clone(&lifecycle), config);
    register(lifecycle.as_ref(), &supervisor.shutdowner(), &cli.demo_options());

    match cli.command.unwrap_or_default() {
        Commands::Hooks => {
            lifecycle.print_hooks();
            ExitCode::SUCCESS
        }
        Commands::Run => match supervisor.run().await {
            Ok(()) => {
                info!("Exited cleanly");
                ExitCode::SUCCESS
            }
            Err(err) => {
                error!(error = %err, "Exited with error");
                ExitCode::FAILURE
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_run() {
        let cli = Cli::parse_from(["stagehand-demo"]);
        assert!(matches!(cli.command.unwrap_or_default(), Commands::Run));
        assert_eq!(cli.log_format, TracingFormat::Pretty);
        assert_eq!(cli.log_level, Level::INFO);
    }

    #[test]
    fn flags_override_the_config_defaults() {
        let cli = Cli::parse_from([
            "stagehand-demo",
            "--start-timeout",
            "7",
            "--log-format",
            "json",
            "hooks",
        ]);
        let config = cli.lifecycle_config().unwrap();
        assert_eq!(config.start_timeout(), Duration::from_secs(7));
        assert_eq!(config.stop_timeout(), Duration::from_secs(60));
        assert_eq!(cli.log_format, TracingFormat::Json);
        assert!(matches!(cli.command, Some(Commands::Hooks)));
    }

    #[test]
    fn zero_timeout_flag_is_rejected() {
        let cli = Cli::parse_from(["stagehand-demo", "--stop-timeout", "0"]);
        assert!(cli.lifecycle_config().is_err());
    }

    #[test]
    fn unknown_log_format_is_a_usage_error() {
        assert!(Cli::try_parse_from(["stagehand-demo", "--log-format", "xml"]).is_err());
    }
}
