//! Configuration and CLI argument handling

use std::time::Duration;

use clap::Parser;

use crate::{error::TimerError, presentation::DisplayFormat, state::Durations};

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "poca")]
#[command(about = "A headless pomodoro timer with local notifications")]
#[command(version)]
pub struct Config {
    /// Length of a work interval (e.g. "25m", "90s")
    #[arg(short, long, env = "POCA_WORK", default_value = "25m", value_parser = humantime::parse_duration)]
    pub work: Duration,

    /// Length of a rest interval
    #[arg(short, long, env = "POCA_REST", default_value = "5m", value_parser = humantime::parse_duration)]
    pub rest: Duration,

    /// Number of pomodoro phases to run before exiting
    #[arg(short, long, env = "POCA_PHASES", default_value = "4")]
    pub phases: u32,

    /// Post desktop notifications when a countdown ends
    #[arg(long)]
    pub desktop_notifications: bool,

    /// Ring the terminal bell when a countdown ends
    #[arg(long)]
    pub bell: bool,

    /// Print timer events as JSON lines
    #[arg(long)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Interval lengths, rejecting zero durations
    pub fn durations(&self) -> Result<Durations, TimerError> {
        Durations::new(self.work, self.rest)
    }

    pub fn display_format(&self) -> DisplayFormat {
        if self.json {
            DisplayFormat::Json
        } else {
            DisplayFormat::Text
        }
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_classic_pomodoro() {
        let config = Config::try_parse_from(["poca"]).unwrap();
        assert_eq!(config.durations().unwrap(), Durations::default());
        assert_eq!(config.phases, 4);
        assert_eq!(config.display_format(), DisplayFormat::Text);
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn parses_human_durations() {
        let config =
            Config::try_parse_from(["poca", "--work", "50m", "--rest", "10m", "--json", "-v"])
                .unwrap();
        assert_eq!(config.work, Duration::from_secs(3000));
        assert_eq!(config.rest, Duration::from_secs(600));
        assert_eq!(config.display_format(), DisplayFormat::Json);
        assert_eq!(config.log_level(), "debug");
    }

    #[test]
    fn zero_durations_are_rejected() {
        let config = Config::try_parse_from(["poca", "--rest", "0s"]).unwrap();
        assert_eq!(config.durations(), Err(TimerError::InvalidDuration));
    }

    #[test]
    fn malformed_durations_fail_to_parse() {
        assert!(Config::try_parse_from(["poca", "--work", "soon"]).is_err());
    }
}
