use std::io::Write as _;
use std::path::Path;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use ruuvi_cli::cli::{Cli, Commands};
use ruuvi_cli::commands::{
    IngestArgs, cmd_clear, cmd_config, cmd_ingest, cmd_inspect, cmd_mark_sent, cmd_pending,
};
use ruuvi_cli::config::{Config, default_config_path};
use ruuvi_store::CacheStore;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for JSON output
    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config_path.clone().unwrap_or_else(default_config_path);
    let config = load_config(&config_path);
    let store = CacheStore::new(config.cache_path(cli.cache.as_deref()));
    debug!("Using cache file {}", store.path().display());

    let output = cli.output.as_ref();
    match cli.command {
        Commands::Ingest { input, emit } => {
            let finished = cmd_ingest(IngestArgs { input, emit }, store, &config).await?;
            if finished.is_none() {
                // Every reading is already saved; don't wait on a blocked stdin read
                let _ = std::io::stdout().flush();
                std::process::exit(130);
            }
        }
        Commands::Inspect { output: args } => {
            cmd_inspect(&store, &config, args.format, output)?;
        }
        Commands::Pending { output: args } => {
            cmd_pending(&store, &config, args.format, output)?;
        }
        Commands::MarkSent { ids } => {
            cmd_mark_sent(&store, &ids, cli.quiet)?;
        }
        Commands::Clear => {
            cmd_clear(&store, cli.quiet)?;
        }
        Commands::Config { action } => {
            cmd_config(action, &config, &config_path)?;
        }
    }

    Ok(())
}

/// Load the config file, falling back to defaults if it is unusable.
fn load_config(path: &Path) -> Config {
    let config = match Config::load_or_default(path) {
        Ok(config) => config,
        Err(e) => {
            warn!("{}; using defaults", e);
            return Config::default();
        }
    };
    if let Err(e) = config.validate() {
        warn!("{}", e);
    }
    config
}
