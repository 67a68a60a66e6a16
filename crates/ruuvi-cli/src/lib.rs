//! Command-line interface for the Ruuvi reading cache.
//!
//! The `ruuvi-cache` binary sits between a beacon scanner and whatever
//! forwards readings downstream. It stores every reading in a JSON cache
//! file and keeps track of which devices changed since they were last sent.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `ingest` | Read scanner output (JSON lines) and cache every reading |
//! | `inspect` | Summarize the cache: totals, configured tags, pending tags |
//! | `pending` | List records of configured tags changed since last sent |
//! | `mark-sent` | Record that devices were forwarded |
//! | `clear` | Empty the cache |
//! | `config` | Show, locate or initialize the configuration file |
//!
//! # Configuration
//!
//! The CLI reads `~/.config/ruuvi/config.toml` (or platform equivalent):
//!
//! ```toml
//! [cache]
//! path = "/var/lib/ruuvi/ruuvi-cache.json"
//!
//! [tags.aliases]
//! "AA:BB:CC:DD:EE:01" = "Sauna"
//! c8cfe694 = "Fridge"
//! ```
//!
//! Aliased tags are the ones `pending` and `inspect` report on, and an alias
//! replaces the advertised name of its device when readings are cached.
//!
//! # Environment Variables
//!
//! - `RUUVI_CACHE`: Cache file path (overridden by `--cache`)
//! - `RUUVI_CONFIG`: Config file path (overridden by `--config`)
//! - `RUST_LOG`: Log filter; logs go to stderr
//!
//! # Examples
//!
//! Cache a scanner's output and echo the shaped records:
//! ```bash
//! ruuvi-scanner | ruuvi-cache ingest --emit
//! ```
//!
//! Forward pending records, then mark them sent:
//! ```bash
//! ruuvi-cache pending --format json
//! ruuvi-cache mark-sent aabbccdd c8cfe694
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod format;
pub mod util;

// Re-export core dependencies for convenience
pub use ruuvi_store;
pub use ruuvi_types;
