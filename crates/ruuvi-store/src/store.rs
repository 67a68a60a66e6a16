//! File-backed cache store.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::document::CacheDocument;
use crate::error::{Error, Result};

/// Handle to a cache document persisted as JSON at a fixed path.
///
/// Every operation goes to disk; nothing is kept in memory between calls.
/// The store assumes a single writer: two processes updating the same file
/// concurrently can lose each other's updates.
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    /// Create a store for the given file path. Nothing is touched on disk.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Store at [`crate::default_cache_path`], relative to the working directory.
    pub fn open_default() -> Self {
        Self::new(crate::default_cache_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document, falling back to an empty one on any failure.
    ///
    /// A missing file is the normal first-run case. Unreadable or corrupt
    /// content (for example a file truncated by a crash) is logged and
    /// otherwise treated the same way.
    pub fn load(&self) -> CacheDocument {
        match self.try_load() {
            Ok(doc) => doc,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring unreadable cache file");
                CacheDocument::new()
            }
        }
    }

    /// Load the document, reporting read and parse failures.
    ///
    /// A missing file still yields an empty document.
    pub fn try_load(&self) -> Result<CacheDocument> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No cache file at {}, starting empty", self.path.display());
                return Ok(CacheDocument::new());
            }
            Err(e) => {
                return Err(Error::Read {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };

        let doc: CacheDocument = serde_json::from_str(&content).map_err(|e| Error::Parse {
            path: self.path.clone(),
            source: e,
        })?;
        debug!(
            "Loaded {} cached entries from {}",
            doc.len(),
            self.path.display()
        );
        Ok(doc)
    }

    /// Stamp `doc.last_updated` and atomically replace the file with it.
    ///
    /// The document is written to a temporary file next to the target,
    /// synced, and renamed over the target, so readers never observe a
    /// partially written cache.
    pub fn save(&self, doc: &mut CacheDocument) -> Result<()> {
        doc.last_updated = Some(OffsetDateTime::now_utc());
        let content = serde_json::to_string_pretty(doc)?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            info!("Creating cache directory {}", parent.display());
            fs::create_dir_all(parent).map_err(|e| Error::CreateDirectory {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let temp_path = self.temp_path();
        if let Err(e) = write_synced(&temp_path, content.as_bytes()) {
            let _ = fs::remove_file(&temp_path);
            return Err(Error::Write {
                path: temp_path,
                source: e,
            });
        }

        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(Error::Write {
                path: self.path.clone(),
                source: e,
            });
        }

        debug!("Saved {} cached entries to {}", doc.len(), self.path.display());
        Ok(())
    }

    /// Run one load-modify-save cycle.
    ///
    /// The document is loaded leniently (see [`CacheStore::load`]); if `f`
    /// fails nothing is written.
    pub fn update<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut CacheDocument) -> Result<T>,
    {
        let mut doc = self.load();
        let value = f(&mut doc)?;
        self.save(&mut doc)?;
        Ok(value)
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "cache".to_string());
        self.path
            .with_file_name(format!(".{}.{}.tmp", file_name, std::process::id()))
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}
