use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::constants::DEFAULT_CONFIG_NAME;

/// Command-line arguments for the log-shipper agent.
///
/// Without a subcommand the agent runs until interrupted, shipping ready log
/// files on the configured interval.
#[derive(Parser, Debug)]
#[clap(name = "log-shipper", about = "Ships completed log files to object storage")]
pub struct Args {
    /// Path to the agent configuration YAML file
    #[clap(short = 'c', long, default_value = DEFAULT_CONFIG_NAME)]
    pub config: PathBuf,

    /// Watch this directory instead of the configured WatchDirectory
    #[clap(short = 'w', long)]
    pub watch_dir: Option<PathBuf>,

    /// Also write logs to this file
    #[clap(long)]
    pub log_file: Option<PathBuf>,

    /// Verbose logging
    #[clap(short, long)]
    pub verbose: bool,

    /// Subcommands
    #[clap(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands for the agent.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a configuration file template
    InitConfig {
        /// Path to output configuration file
        #[clap(default_value = DEFAULT_CONFIG_NAME)]
        path: PathBuf,

        /// Overwrite an existing file
        #[clap(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["log-shipper"]);
        assert_eq!(args.config, PathBuf::from(DEFAULT_CONFIG_NAME));
        assert!(args.watch_dir.is_none());
        assert!(!args.verbose);
        assert!(args.command.is_none());
    }

    #[test]
    fn test_init_config_subcommand() {
        let args = Args::parse_from(["log-shipper", "init-config", "/etc/log-shipper.yaml", "--force"]);
        match args.command {
            Some(Commands::InitConfig { path, force }) => {
                assert_eq!(path, PathBuf::from("/etc/log-shipper.yaml"));
                assert!(force);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_overrides() {
        let args = Args::parse_from(["log-shipper", "-c", "agent.yaml", "-w", "/srv/logs", "-v"]);
        assert_eq!(args.config, PathBuf::from("agent.yaml"));
        assert_eq!(args.watch_dir, Some(PathBuf::from("/srv/logs")));
        assert!(args.verbose);
    }
}
