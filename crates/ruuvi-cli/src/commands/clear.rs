//! Clear command - empty the cache file.

use anyhow::{Context, Result};
use ruuvi_store::CacheStore;
use tracing::info;

/// Execute the clear command. Returns the number of entries removed.
pub fn cmd_clear(store: &CacheStore, quiet: bool) -> Result<usize> {
    let removed = store
        .update(|doc| {
            let removed = doc.len();
            doc.clear();
            Ok(removed)
        })
        .with_context(|| format!("Failed to clear {}", store.path().display()))?;

    info!(removed, "Cleared cache {}", store.path().display());
    if !quiet {
        println!("Removed {} cached device(s)", removed);
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ruuvi_store::Ingestor;
    use ruuvi_types::RawReading;
    use time::macros::datetime;

    #[test]
    fn test_clear_empties_cache() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path().join("ruuvi-cache.json"));
        Ingestor::new(store.clone())
            .try_ingest(
                &RawReading::new("AA:BB:CC:DD:EE:01").with_temperature(1.0),
                datetime!(2026-03-01 12:00:00 UTC),
            )
            .unwrap();

        assert_eq!(cmd_clear(&store, true).unwrap(), 1);

        let doc = store.try_load().unwrap();
        assert!(doc.is_empty());
        assert_eq!(doc.version, "1.0.0");
    }

    #[test]
    fn test_clear_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path().join("ruuvi-cache.json"));

        assert_eq!(cmd_clear(&store, true).unwrap(), 0);
        assert!(store.path().exists());
    }
}
