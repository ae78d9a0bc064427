//! Shard storage backends.
//!
//! A [`ShardStore`] hands out raw shard text by key and enumerates the
//! published key set; it never decodes. The key set is fixed at
//! construction time, matching the lifecycle of generated indexes: shards
//! are produced once by the documentation generator and replaced
//! wholesale, never updated in place.

use crate::error::{Result, ShardError};
use ahash::AHashMap;
use std::path::{Path, PathBuf};

/// Read-only access to persisted shards.
pub trait ShardStore: Send + Sync {
    /// The published shard keys, sorted. Fixed for the store's lifetime.
    fn keys(&self) -> &[String];

    /// Reads the raw text of the shard with the given key.
    fn read(&self, key: &str) -> Result<String>;
}

/// Filesystem-backed store: a flat directory of shard files.
///
/// Each shard is one file named `<key>.json` (canonical format) or
/// `<key>.js` (legacy format). The key set is enumerated once when the
/// store is opened; files appearing later are invisible, consistent with
/// the atomic-replacement lifecycle.
pub struct DirStore {
    root: PathBuf,
    /// Sorted key list, paired with a key → file path map.
    keys: Vec<String>,
    paths: AHashMap<String, PathBuf>,
}

impl DirStore {
    /// Opens a shard directory, enumerating the published key set.
    pub fn open(root: impl Into<PathBuf>) -> std::io::Result<Self> {
        let root = root.into();
        let mut paths = AHashMap::new();

        for entry in std::fs::read_dir(&root)? {
            let path = entry?.path();
            let is_shard_file = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext == "json" || ext == "js");
            if !is_shard_file {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                paths.insert(stem.to_string(), path.clone());
            }
        }

        // Sorted order keeps whole-index traversal deterministic.
        let mut keys: Vec<String> = paths.keys().cloned().collect();
        keys.sort();

        tracing::debug!(
            "Opened shard directory {} with {} shards",
            root.display(),
            keys.len()
        );

        Ok(Self { root, keys, paths })
    }

    /// The directory this store reads from.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ShardStore for DirStore {
    fn keys(&self) -> &[String] {
        &self.keys
    }

    fn read(&self, key: &str) -> Result<String> {
        let path = self.paths.get(key).ok_or_else(|| ShardError::ShardNotFound {
            key: key.to_string(),
        })?;

        std::fs::read_to_string(path).map_err(|source| ShardError::Io {
            key: key.to_string(),
            source,
        })
    }
}

/// In-memory store, for embedded indexes and tests.
pub struct MemoryStore {
    keys: Vec<String>,
    shards: AHashMap<String, String>,
}

impl MemoryStore {
    /// Builds a store from `(key, shard text)` pairs.
    pub fn new(shards: impl IntoIterator<Item = (String, String)>) -> Self {
        let shards: AHashMap<String, String> = shards.into_iter().collect();
        let mut keys: Vec<String> = shards.keys().cloned().collect();
        keys.sort();
        Self { keys, shards }
    }
}

impl ShardStore for MemoryStore {
    fn keys(&self) -> &[String] {
        &self.keys
    }

    fn read(&self, key: &str) -> Result<String> {
        self.shards
            .get(key)
            .cloned()
            .ok_or_else(|| ShardError::ShardNotFound {
                key: key.to_string(),
            })
    }
}
