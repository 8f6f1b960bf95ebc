//! Configuration and CLI argument handling

use std::time::Duration;

use clap::{Args, Parser, Subcommand};

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "workout-timer")]
#[command(about = "Run a workout countdown and sync completion to the workout backend")]
#[command(version)]
pub struct Config {
    /// Base URL of the workout backend
    #[arg(long, env = "WORKOUT_API_URL", default_value = "http://localhost:5000")]
    pub api_url: String,

    /// Bearer token obtained from the backend login
    #[arg(long, env = "WORKOUT_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Time a workout and expose the local control API
    Run(RunArgs),
    /// Print progress statistics over all workouts
    Stats,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Id of the workout to time
    pub workout_id: String,

    /// Port to bind the control server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Start the countdown as soon as the workout is loaded
    #[arg(long)]
    pub autostart: bool,

    /// Tick period in milliseconds
    #[arg(long, default_value = "1000", hide = true)]
    pub tick_ms: u64,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Token required for backend calls
    pub fn require_token(&self) -> anyhow::Result<&str> {
        self.token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("no API token; pass --token or set WORKOUT_API_TOKEN"))
    }
}

impl RunArgs {
    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_run_command() {
        let config = Config::try_parse_from([
            "workout-timer",
            "--api-url",
            "http://api.test/",
            "--token",
            "abc",
            "run",
            "w-7",
            "--port",
            "9000",
            "--autostart",
            "-v",
        ])
        .unwrap();

        assert_eq!(config.api_url, "http://api.test/");
        assert_eq!(config.require_token().unwrap(), "abc");
        assert_eq!(config.log_level(), "debug");
        match config.command {
            Command::Run(args) => {
                assert_eq!(args.workout_id, "w-7");
                assert_eq!(args.address(), "127.0.0.1:9000");
                assert!(args.autostart);
                assert_eq!(args.tick_period(), Duration::from_secs(1));
            }
            Command::Stats => panic!("expected run"),
        }
    }

    #[test]
    fn blank_token_is_missing() {
        let config =
            Config::try_parse_from(["workout-timer", "--token", "  ", "stats"]).unwrap();
        assert!(config.require_token().is_err());
    }
}
