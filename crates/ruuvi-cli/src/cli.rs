//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Reusable output format arguments
#[derive(Debug, Clone, Args)]
pub struct OutputArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Parser)]
#[command(name = "ruuvi-cache")]
#[command(author, version, about = "Change-detection cache for Ruuvi beacon readings", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Cache file path (overrides the config file)
    #[arg(long, global = true, env = "RUUVI_CACHE")]
    pub cache: Option<PathBuf>,

    /// Config file path
    #[arg(long = "config", global = true, env = "RUUVI_CONFIG")]
    pub config_path: Option<PathBuf>,

    /// Write output to file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ingest scanner output (one JSON object per line) into the cache
    Ingest {
        /// Read lines from this file instead of stdin
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Print each cached record as a JSON line
        #[arg(long)]
        emit: bool,
    },

    /// Summarize the cache contents
    Inspect {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// List records of configured tags that changed since they were last sent
    Pending {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Record that devices were sent downstream just now
    MarkSent {
        /// Device ids (short id or full address)
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Remove every entry from the cache
    Clear,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration subcommands
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ingest() {
        let cli = Cli::try_parse_from(["ruuvi-cache", "ingest", "--input", "scan.jsonl", "--emit"])
            .unwrap();
        match cli.command {
            Commands::Ingest { input, emit } => {
                assert_eq!(input, Some(PathBuf::from("scan.jsonl")));
                assert!(emit);
            }
            _ => panic!("expected ingest"),
        }
    }

    #[test]
    fn test_parse_global_cache_after_subcommand() {
        let cli = Cli::try_parse_from(["ruuvi-cache", "inspect", "--cache", "/tmp/c.json", "-f", "json"])
            .unwrap();
        assert_eq!(cli.cache, Some(PathBuf::from("/tmp/c.json")));
        assert!(matches!(
            cli.command,
            Commands::Inspect {
                output: OutputArgs {
                    format: OutputFormat::Json
                }
            }
        ));
    }

    #[test]
    fn test_mark_sent_requires_ids() {
        assert!(Cli::try_parse_from(["ruuvi-cache", "mark-sent"]).is_err());

        let cli = Cli::try_parse_from(["ruuvi-cache", "mark-sent", "aabbccdd", "c8cfe694"]).unwrap();
        match cli.command {
            Commands::MarkSent { ids } => assert_eq!(ids, ["aabbccdd", "c8cfe694"]),
            _ => panic!("expected mark-sent"),
        }
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["ruuvi-cache", "-v", "-q", "clear"]).is_err());
    }
}
