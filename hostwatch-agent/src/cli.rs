//! CLI argument definitions for hostwatch-agent.
//!
//! Uses `clap` v4 derive macros to parse command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// Hostwatch host telemetry agent.
///
/// Tails the authentication log, classifies security events, collects
/// host metrics, and ships heartbeats to a remote collector.
#[derive(Parser, Debug)]
#[command(name = "hostwatch-agent")]
#[command(version, about, long_about = None)]
pub struct AgentCli {
    /// Path to hostwatch.toml configuration file.
    #[arg(short, long, default_value = "/etc/hostwatch/hostwatch.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Override log format (json, pretty).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(long)]
    pub log_format: Option<String>,

    /// Validate configuration file and exit without starting the agent.
    #[arg(long)]
    pub validate: bool,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        AgentCli::command().debug_assert();
    }

    #[test]
    fn default_config_path() {
        let cli = AgentCli::parse_from(["hostwatch-agent"]);
        assert_eq!(
            cli.config,
            PathBuf::from("/etc/hostwatch/hostwatch.toml")
        );
        assert!(!cli.validate);
    }

    #[test]
    fn overrides_are_parsed() {
        let cli = AgentCli::parse_from([
            "hostwatch-agent",
            "--config",
            "/tmp/hw.toml",
            "--log-level",
            "debug",
            "--validate",
        ]);
        assert_eq!(cli.config, PathBuf::from("/tmp/hw.toml"));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(cli.validate);
    }
}
