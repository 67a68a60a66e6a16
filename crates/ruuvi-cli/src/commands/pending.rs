//! Pending command - list records waiting to be sent.

use std::path::PathBuf;

use anyhow::Result;
use ruuvi_store::CacheStore;
use tracing::warn;

use crate::cli::OutputFormat;
use crate::config::Config;
use crate::format::{as_json, format_pending_text};
use crate::util::write_output;

/// Execute the pending command.
pub fn cmd_pending(
    store: &CacheStore,
    config: &Config,
    format: OutputFormat,
    output: Option<&PathBuf>,
) -> Result<()> {
    let allowed = config.allowed_tags();
    if allowed.is_empty() {
        warn!("No tags configured; add entries under [tags.aliases] to select devices");
    }

    let doc = store.load();
    let records = doc.pending(&allowed);
    let content = match format {
        OutputFormat::Text => format_pending_text(&records),
        OutputFormat::Json => as_json(&records)?,
    };
    write_output(output, &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ruuvi_store::Ingestor;
    use ruuvi_types::RawReading;
    use time::macros::datetime;

    #[test]
    fn test_pending_json_lists_configured_changed_records() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path().join("ruuvi-cache.json"));
        let ingestor = Ingestor::new(store.clone());
        for address in ["AA:BB:CC:DD:EE:01", "11:22:33:44:55:66"] {
            ingestor
                .try_ingest(
                    &RawReading::new(address).with_humidity(40.0),
                    datetime!(2026-03-01 12:00:00 UTC),
                )
                .unwrap();
        }

        let mut config = Config::default();
        config
            .tags
            .aliases
            .insert("aabbccddee01".to_string(), "Sauna".to_string());
        let out = dir.path().join("pending.json");

        cmd_pending(&store, &config, OutputFormat::Json, Some(&out)).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        let records = json.as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["id"], "aabbccdd");
        assert_eq!(records[0]["humidity"], 40.0);
    }

    #[test]
    fn test_pending_without_tags_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path().join("ruuvi-cache.json"));
        let out = dir.path().join("pending.txt");

        cmd_pending(&store, &Config::default(), OutputFormat::Text, Some(&out)).unwrap();
        assert_eq!(
            std::fs::read_to_string(&out).unwrap(),
            "No pending records.\n"
        );
    }
}
