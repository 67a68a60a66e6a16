//! Reading ingestion: normalize, shape, fingerprint and persist.

use time::OffsetDateTime;
use tracing::{debug, warn};

use ruuvi_types::{DeviceIdentity, DeviceRecord, RawReading};

use crate::document::CacheEntry;
use crate::error::Result;
use crate::store::CacheStore;

/// Result of ingesting one reading.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestOutcome {
    /// Normalized device key the reading was stored under.
    pub key: String,
    /// The entry as written.
    pub entry: CacheEntry,
    /// `true` if the device was new or its fingerprint changed.
    ///
    /// Informational only; the reading is stored either way.
    pub changed: bool,
}

/// Feeds raw readings into a [`CacheStore`].
///
/// Each reading is a full load-merge-save cycle against the file, so the
/// cache on disk always reflects every reading ingested so far.
#[derive(Debug, Clone)]
pub struct Ingestor {
    store: CacheStore,
}

impl Ingestor {
    pub fn new(store: CacheStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    /// Ingest one reading, reporting any failure to the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be fingerprinted or the cache
    /// file cannot be written. An unreadable existing cache is not an error;
    /// it is replaced.
    pub fn try_ingest(&self, reading: &RawReading, now: OffsetDateTime) -> Result<IngestOutcome> {
        let identity = DeviceIdentity::from_address(&reading.address);
        let record = DeviceRecord::from_reading(&identity, reading, now);

        let outcome = self.store.update(|doc| {
            let previous = doc.get(identity.key()).map(|e| e.fingerprint.clone());
            let entry = doc.merge(identity.key(), record)?.clone();
            let changed = previous.as_deref() != Some(entry.fingerprint.as_str());
            Ok(IngestOutcome {
                key: identity.key().to_string(),
                entry,
                changed,
            })
        })?;

        debug!(
            key = %outcome.key,
            changed = outcome.changed,
            "Cached reading for {}",
            outcome.entry.data.display_name()
        );
        Ok(outcome)
    }

    /// Ingest one reading, logging and swallowing any failure.
    ///
    /// This is the entry point for scanner callbacks: a bad reading or a
    /// failed write must not take the scanner down with it.
    pub fn ingest(&self, reading: &RawReading, now: OffsetDateTime) -> Option<IngestOutcome> {
        match self.try_ingest(reading, now) {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                let identity = DeviceIdentity::from_address(&reading.address);
                warn!(
                    key = %identity,
                    error = %e,
                    "Failed to cache reading"
                );
                None
            }
        }
    }
}
