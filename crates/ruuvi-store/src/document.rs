//! The persisted cache document and its entries.

use std::collections::{BTreeMap, HashMap};
use std::collections::btree_map::Entry;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use ruuvi_types::{DeviceRecord, normalize_address, short_id};

use crate::error::Result;
use crate::fingerprint::fingerprint;

/// Schema version written into every cache document.
pub const CACHE_VERSION: &str = "1.0.0";

fn default_version() -> String {
    CACHE_VERSION.to_string()
}

/// Cached state of one device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    /// Most recently observed record.
    pub data: DeviceRecord,
    /// Fingerprint of `data` at the time of the last update.
    #[serde(rename = "hash")]
    pub fingerprint: String,
    /// Marker of the last forward downstream, kept exactly as written.
    ///
    /// Only the forwarding side writes this (see [`CacheDocument::mark_sent`]);
    /// merging a new reading carries it forward unchanged. It is interpreted
    /// only when comparing, see [`CacheEntry::sent_at`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sent: Option<Value>,
}

impl CacheEntry {
    /// The `last_sent` marker as a point in time.
    ///
    /// RFC 3339 strings and numbers of milliseconds since the Unix epoch are
    /// understood. Anything else yields `None`.
    pub fn sent_at(&self) -> Option<OffsetDateTime> {
        match self.last_sent.as_ref()? {
            Value::String(s) => OffsetDateTime::parse(s, &Rfc3339).ok(),
            Value::Number(n) => {
                let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
                OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000).ok()
            }
            _ => None,
        }
    }

    /// Whether the record is newer than the last forward (or was never forwarded).
    ///
    /// An empty marker (`""`, `0`, `false`) counts as never forwarded. A
    /// marker that is set but cannot be read as a time never compares as
    /// older than the record.
    pub fn changed_since_sent(&self) -> bool {
        let unset = match &self.last_sent {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.is_empty(),
            Some(Value::Bool(b)) => !b,
            Some(Value::Number(n)) => n.as_f64() == Some(0.0),
            Some(_) => false,
        };
        unset || self.sent_at().is_some_and(|sent| self.data.last_updated > sent)
    }
}

/// Counts over the cache, restricted to a set of allowed short ids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// All entries in the cache.
    pub total: usize,
    /// Entries whose short id is allowed.
    pub allowed: usize,
    /// Allowed entries changed since they were last sent.
    pub pending_send: usize,
}

/// The whole cache as stored on disk.
///
/// ```json
/// {"version": "1.0.0", "lastUpdated": "...", "cache": {"<key>": {"data": {..}, "hash": "..", "lastSent": ".."}}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheDocument {
    #[serde(default = "default_version")]
    pub version: String,
    /// Time of the last successful save.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub last_updated: Option<OffsetDateTime>,
    /// Entries by normalized device key.
    #[serde(rename = "cache", default)]
    pub entries: BTreeMap<String, CacheEntry>,
}

impl Default for CacheDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheDocument {
    /// An empty document at the current schema version.
    pub fn new() -> Self {
        Self {
            version: default_version(),
            last_updated: None,
            entries: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by normalized key.
    pub fn get(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    /// Replace the entry under `key` with `record`.
    ///
    /// The fingerprint is recomputed from `record`. If an entry already
    /// existed, its `last_sent` is carried over; a new key starts without one.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Fingerprint`] if the record cannot be
    /// fingerprinted; the document is left untouched in that case.
    pub fn merge(&mut self, key: &str, record: DeviceRecord) -> Result<&CacheEntry> {
        let fingerprint = fingerprint(&record)?;

        let entry = match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                let last_sent = occupied.get().last_sent.clone();
                occupied.insert(CacheEntry {
                    data: record,
                    fingerprint,
                    last_sent,
                });
                occupied.into_mut()
            }
            Entry::Vacant(vacant) => vacant.insert(CacheEntry {
                data: record,
                fingerprint,
                last_sent: None,
            }),
        };

        Ok(&*entry)
    }

    /// Records of allowed devices that changed since they were last sent.
    ///
    /// Results follow the order of `allowed` with at most one record per
    /// short id.
    pub fn pending<S: AsRef<str>>(&self, allowed: &[S]) -> Vec<&DeviceRecord> {
        self.select(allowed, CacheEntry::changed_since_sent)
    }

    /// Records of allowed devices, in the order of `allowed`.
    pub fn records<S: AsRef<str>>(&self, allowed: &[S]) -> Vec<&DeviceRecord> {
        self.select(allowed, |_| true)
    }

    fn select<S, F>(&self, allowed: &[S], include: F) -> Vec<&DeviceRecord>
    where
        S: AsRef<str>,
        F: Fn(&CacheEntry) -> bool,
    {
        let mut by_short_id: HashMap<&str, &DeviceRecord> = HashMap::new();
        for (key, entry) in &self.entries {
            let short = short_id(key);
            if allowed.iter().any(|id| id.as_ref() == short) && include(entry) {
                by_short_id.insert(short, &entry.data);
            }
        }

        allowed
            .iter()
            .filter_map(|id| by_short_id.remove(id.as_ref()))
            .collect()
    }

    /// Record that the given devices were forwarded at `at`.
    ///
    /// Ids may be full keys, short ids or raw addresses. The marker is
    /// written as an RFC 3339 string. Returns the number of entries marked.
    pub fn mark_sent<S: AsRef<str>>(&mut self, ids: &[S], at: OffsetDateTime) -> usize {
        let wanted: Vec<String> = ids
            .iter()
            .map(|id| normalize_address(id.as_ref()).key().to_string())
            .filter(|id| !id.is_empty())
            .collect();
        // Years outside 0..=9999 have no RFC 3339 form
        let marker = at
            .format(&Rfc3339)
            .map_or_else(|_| Value::from((at.unix_timestamp_nanos() / 1_000_000) as i64), Value::String);

        let mut marked = 0;
        for (key, entry) in &mut self.entries {
            if wanted.iter().any(|id| id == key || id == short_id(key)) {
                entry.last_sent = Some(marker.clone());
                marked += 1;
            }
        }
        marked
    }

    /// Counts of total, allowed and pending entries.
    pub fn stats<S: AsRef<str>>(&self, allowed: &[S]) -> CacheStats {
        let mut stats = CacheStats {
            total: self.entries.len(),
            ..CacheStats::default()
        };

        for (key, entry) in &self.entries {
            let short = short_id(key);
            if allowed.iter().any(|id| id.as_ref() == short) {
                stats.allowed += 1;
                if entry.changed_since_sent() {
                    stats.pending_send += 1;
                }
            }
        }

        stats
    }

    /// The latest readable `last_sent` across all entries.
    pub fn most_recent_sent(&self) -> Option<OffsetDateTime> {
        self.entries.values().filter_map(CacheEntry::sent_at).max()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
