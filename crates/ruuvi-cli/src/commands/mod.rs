//! Command implementations for the CLI.

mod clear;
mod config;
mod ingest;
mod inspect;
mod mark_sent;
mod pending;

pub use clear::cmd_clear;
pub use config::{cmd_config, init_config};
pub use ingest::{IngestArgs, IngestSummary, cmd_ingest, ingest_lines};
pub use inspect::{cmd_inspect, inspect_report};
pub use mark_sent::cmd_mark_sent;
pub use pending::cmd_pending;
