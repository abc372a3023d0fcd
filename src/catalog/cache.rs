//! Disk cache for catalog listings (databases, schemas).
//!
//! Listing databases and schemas is slow on real catalogs and rarely changes,
//! so callers may keep the rows for a short time. Entries expire after a TTL
//! and `invalidate` drops everything. The metadata importer never uses this.

use super::RawRow;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Default time-to-live for cached listings
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Hex length of a cache key (16 bytes of SHA-256)
const CACHE_KEY_LEN: usize = 32;

/// One cached result set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Catalog source the rows came from
    pub source: String,
    /// Statement that produced the rows
    pub query: String,
    /// When this entry was written (Unix timestamp)
    pub created_at: u64,
    /// Cached rows
    pub rows: Vec<RawRow>,
}

/// TTL-bounded cache of catalog listings
#[derive(Debug, Clone)]
pub struct ListingCache {
    cache_dir: PathBuf,
    ttl: Duration,
}

impl ListingCache {
    /// Create a cache in the default cache directory
    pub fn new(ttl: Duration) -> Result<Self> {
        Self::with_dir(Self::default_cache_dir()?, ttl)
    }

    /// Create a cache with a custom directory
    pub fn with_dir(cache_dir: PathBuf, ttl: Duration) -> Result<Self> {
        fs::create_dir_all(&cache_dir).context("Failed to create cache directory")?;
        Ok(Self { cache_dir, ttl })
    }

    /// Get the default cache directory
    pub fn default_cache_dir() -> Result<PathBuf> {
        let cache_base = dirs::cache_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".cache")))
            .context("Could not determine cache directory")?;

        Ok(cache_base.join("erd-viewer").join("listings"))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Compute the cache key for a source and statement
    pub fn cache_key(source: &str, query: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(source.as_bytes());
        hasher.update(b"\n");
        hasher.update(query.as_bytes());
        let hash = hasher.finalize();

        hex::encode(&hash[..CACHE_KEY_LEN / 2])
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", key))
    }

    /// Whether a file name has the shape of an entry written by this cache
    fn is_entry_file(path: &Path) -> bool {
        let is_json = path.extension().map(|e| e == "json").unwrap_or(false);
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
        is_json
            && stem.len() == CACHE_KEY_LEN
            && stem.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }

    /// Cached rows, if present and younger than the TTL
    pub fn get(&self, source: &str, query: &str) -> Result<Option<Vec<RawRow>>> {
        let path = self.entry_path(&Self::cache_key(source, query));
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache entry: {}", path.display()))?;
        let entry: CacheEntry = match serde_json::from_str(&content) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "discarding unreadable cache entry");
                let _ = fs::remove_file(&path);
                return Ok(None);
            }
        };

        let age = now_secs().saturating_sub(entry.created_at);
        if age >= self.ttl.as_secs() {
            tracing::debug!(query, age, "cache entry expired");
            return Ok(None);
        }

        Ok(Some(entry.rows))
    }

    /// Store rows for a source and statement
    pub fn put(&self, source: &str, query: &str, rows: &[RawRow]) -> Result<()> {
        let entry = CacheEntry {
            source: source.to_string(),
            query: query.to_string(),
            created_at: now_secs(),
            rows: rows.to_vec(),
        };
        let path = self.entry_path(&Self::cache_key(source, query));
        let content = serde_json::to_string(&entry)?;
        fs::write(&path, content).context("Failed to write cache entry")?;
        Ok(())
    }

    /// Drop every cached listing, returning how many entries were removed.
    ///
    /// Only files named like cache entries are removed; anything else sharing
    /// the directory is left alone.
    pub fn invalidate(&self) -> Result<usize> {
        let mut removed = 0;
        if !self.cache_dir.exists() {
            return Ok(0);
        }
        for entry in fs::read_dir(&self.cache_dir)? {
            let path = entry?.path();
            if Self::is_entry_file(&path) {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
