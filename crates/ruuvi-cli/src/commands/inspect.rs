//! Inspect command - summarize the cache file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use ruuvi_store::CacheStore;

use crate::cli::OutputFormat;
use crate::config::Config;
use crate::format::{DeviceSummary, InspectReport, as_json, format_inspect_text};
use crate::util::write_output;

/// Execute the inspect command.
///
/// Unlike the other commands this reports an unreadable cache file instead
/// of treating it as empty.
pub fn cmd_inspect(
    store: &CacheStore,
    config: &Config,
    format: OutputFormat,
    output: Option<&PathBuf>,
) -> Result<()> {
    let report = inspect_report(store, config)?;
    let content = match format {
        OutputFormat::Text => format_inspect_text(&report),
        OutputFormat::Json => as_json(&report)?,
    };
    write_output(output, &content)
}

/// Build the inspect report for the cache at `store`.
pub fn inspect_report(store: &CacheStore, config: &Config) -> Result<InspectReport> {
    let doc = store
        .try_load()
        .with_context(|| format!("Failed to inspect {}", store.path().display()))?;
    let allowed = config.allowed_tags();
    let stats = doc.stats(&allowed);

    let pending_tags = doc
        .pending(&allowed)
        .into_iter()
        .map(|record| record.id.clone())
        .collect();

    let devices = doc
        .entries
        .iter()
        .map(|(key, entry)| DeviceSummary {
            key: key.clone(),
            id: entry.data.id.clone(),
            name: entry.data.name.clone(),
            status: entry.data.status.to_string(),
            last_updated: entry.data.last_updated,
            last_sent: entry.sent_at(),
            changed_since_sent: entry.changed_since_sent(),
        })
        .collect();

    Ok(InspectReport {
        path: store.path().display().to_string(),
        version: doc.version.clone(),
        last_updated: doc.last_updated,
        total: stats.total,
        allowed: stats.allowed,
        pending_send: stats.pending_send,
        most_recent_sent: doc.most_recent_sent(),
        allowed_tags: allowed,
        pending_tags,
        devices,
    })
}
