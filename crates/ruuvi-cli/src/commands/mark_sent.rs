//! Mark-sent command - record a downstream forward.

use anyhow::{Context, Result};
use ruuvi_store::CacheStore;
use time::OffsetDateTime;
use tracing::{info, warn};

/// Execute the mark-sent command.
///
/// Ids may be short ids or full addresses in any separator style. The
/// cache file is only rewritten when at least one device matched.
pub fn cmd_mark_sent(store: &CacheStore, ids: &[String], quiet: bool) -> Result<usize> {
    let mut doc = store.load();
    let marked = doc.mark_sent(ids, OffsetDateTime::now_utc());

    if marked == 0 {
        warn!("No cached device matched {}", ids.join(", "));
    } else {
        store
            .save(&mut doc)
            .with_context(|| format!("Failed to update {}", store.path().display()))?;
        info!(marked, "Marked devices as sent");
    }
    if !quiet {
        println!("Marked {} device(s) as sent", marked);
    }
    Ok(marked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ruuvi_store::Ingestor;
    use ruuvi_types::RawReading;
    use time::macros::datetime;

    #[test]
    fn test_mark_sent_by_short_id_and_address() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path().join("ruuvi-cache.json"));
        let ingestor = Ingestor::new(store.clone());
        for address in ["AA:BB:CC:DD:EE:01", "C8:CF:E6:94:00:01", "11:22:33:44:55:66"] {
            ingestor
                .try_ingest(
                    &RawReading::new(address).with_temperature(1.0),
                    datetime!(2026-03-01 12:00:00 UTC),
                )
                .unwrap();
        }

        let ids = ["aabbccdd".to_string(), "C8-CF-E6-94-00-01".to_string()];
        assert_eq!(cmd_mark_sent(&store, &ids, true).unwrap(), 2);

        let doc = store.load();
        assert!(doc.get("aabbccddee01").unwrap().last_sent.is_some());
        assert!(doc.get("c8cfe6940001").unwrap().last_sent.is_some());
        assert!(doc.get("112233445566").unwrap().last_sent.is_none());
    }

    #[test]
    fn test_mark_sent_unknown_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path().join("ruuvi-cache.json"));

        assert_eq!(cmd_mark_sent(&store, &["deadbeef".to_string()], true).unwrap(), 0);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_mark_sent_without_match_keeps_unreadable_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ruuvi-cache.json");
        let corrupt = "{\"version\": \"1.0.0\", \"cache\": {";
        std::fs::write(&path, corrupt).unwrap();
        let store = CacheStore::new(&path);

        assert_eq!(cmd_mark_sent(&store, &["aabbccdd".to_string()], true).unwrap(), 0);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), corrupt);
    }
}
