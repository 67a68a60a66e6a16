//! Change-detection cache for Ruuvi beacon readings.
//!
//! Every reading is stored as the latest record of its device, keyed by the
//! normalized device address, together with a noise-tolerant fingerprint of
//! its significant fields. The cache lives in a single JSON file.
//!
//! # Features
//!
//! - Fingerprints that ignore sub-resolution sensor jitter
//! - Atomic saves (temporary file + rename)
//! - Lenient loading: a missing or corrupt cache file reads as empty
//! - Forwarding bookkeeping (`lastSent`, pending records, stats)
//!
//! # Example
//!
//! ```no_run
//! use ruuvi_store::{CacheStore, Ingestor};
//! use ruuvi_types::RawReading;
//! use time::OffsetDateTime;
//!
//! let ingestor = Ingestor::new(CacheStore::open_default());
//!
//! let reading = RawReading::new("AA:BB:CC:DD:EE:01")
//!     .with_temperature(21.32)
//!     .with_rssi(-58);
//! let outcome = ingestor.try_ingest(&reading, OffsetDateTime::now_utc())?;
//! println!("{} changed: {}", outcome.key, outcome.changed);
//! # Ok::<(), ruuvi_store::Error>(())
//! ```

mod document;
mod error;
pub mod fingerprint;
mod ingest;
mod store;

pub use document::{CACHE_VERSION, CacheDocument, CacheEntry, CacheStats};
pub use error::{Error, Result};
pub use fingerprint::fingerprint;
pub use ingest::{IngestOutcome, Ingestor};
pub use store::CacheStore;

/// File name of the cache when no path is configured.
pub const DEFAULT_CACHE_FILE: &str = "ruuvi-cache.json";

/// Default cache path: [`DEFAULT_CACHE_FILE`] in the current working directory.
pub fn default_cache_path() -> std::path::PathBuf {
    std::path::PathBuf::from(DEFAULT_CACHE_FILE)
}
