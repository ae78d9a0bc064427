//! The search index read path.
//!
//! [`SearchIndex`] answers "which documentation entries match this typed
//! prefix" by loading the candidate shard(s) for the prefix and filtering
//! their entries. There is no relevance ranking: results come back in
//! shard-then-insertion order, which is the authored display order.
//!
//! The index is a pure read path over immutable data. Decoded shards are
//! kept in a bounded read-through cache; because shards never change for
//! the lifetime of a published index, cache entries never need
//! invalidation and racing fills for the same key produce identical
//! values.

use crate::codec;
use crate::error::{Result, ShardError};
use crate::store::ShardStore;
use crate::types::{CaseMatching, Entry, Shard, shard_key_for_prefix};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};

/// Decoded-shard cache capacity. Shards are keyed by a label's leading
/// character, so even a large documentation set stays well under this.
const CACHE_CAPACITY: usize = 128;

/// Prefix search over a sharded documentation index.
///
/// One instance owns the shard store and is handed by reference to
/// whatever needs to answer queries; all operations take `&self` and are
/// safe to call from multiple threads.
pub struct SearchIndex {
    store: Box<dyn ShardStore>,
    cache: Mutex<LruCache<String, Arc<Shard>>>,
}

impl SearchIndex {
    /// Creates an index over the given shard store.
    pub fn new(store: impl ShardStore + 'static) -> Self {
        let store = Box::new(store);
        tracing::info!("Search index opened with {} shards", store.keys().len());
        Self {
            store,
            cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN),
            )),
        }
    }

    /// The number of shards in the published set.
    pub fn shard_count(&self) -> usize {
        self.store.keys().len()
    }

    /// The total number of entries across all shards.
    ///
    /// Decodes every shard (through the cache), so this is a diagnostic,
    /// not something to call per keystroke.
    pub fn entry_count(&self) -> Result<usize> {
        let mut count = 0;
        for key in self.store.keys() {
            count += self.load_shard(key)?.entries.len();
        }
        Ok(count)
    }

    /// Loads and decodes the shard with the given key.
    ///
    /// Pure read: the first load per key hits the store, later loads are
    /// served from the cache. Fails with [`ShardError::ShardNotFound`] for
    /// a key outside the published set and [`ShardError::MalformedShard`]
    /// when decoding fails.
    pub fn load_shard(&self, key: &str) -> Result<Arc<Shard>> {
        // Known-set check first: an unpublished key never touches the store.
        if self
            .store
            .keys()
            .binary_search_by(|k| k.as_str().cmp(key))
            .is_err()
        {
            return Err(ShardError::ShardNotFound {
                key: key.to_string(),
            });
        }

        if let Some(shard) = self.lock_cache().get(key) {
            tracing::debug!("Shard '{}' served from cache", key);
            return Ok(Arc::clone(shard));
        }

        let text = self.store.read(key)?;
        let shard = codec::decode(key, &text).inspect_err(|e| {
            tracing::warn!("Shard '{}' failed to decode: {}", key, e);
        })?;
        tracing::debug!("Decoded shard '{}' ({} entries)", key, shard.entries.len());

        let shard = Arc::new(shard);
        // Last writer wins on racing fills; both hold the same immutable data.
        self.lock_cache().put(key.to_string(), Arc::clone(&shard));
        Ok(shard)
    }

    /// Case-insensitive prefix query, the expected default for a search
    /// box. See [`SearchIndex::query_with`].
    pub fn query(&self, prefix: &str) -> Result<Vec<Entry>> {
        self.query_with(prefix, CaseMatching::Insensitive)
    }

    /// Returns all entries whose label starts with `prefix`, in
    /// shard-then-insertion order.
    ///
    /// An empty result is not an error; it means no matches, including
    /// when the prefix is longer than any label. The empty prefix is
    /// defined to match everything: it returns every entry of every
    /// published shard, in sorted key order.
    ///
    /// A prefix whose shard is not in the published set yields zero
    /// matches for that shard. A malformed shard fails the queries that
    /// touch it; queries over other shards are unaffected.
    pub fn query_with(&self, prefix: &str, case: CaseMatching) -> Result<Vec<Entry>> {
        let candidates: Vec<String> = if prefix.is_empty() {
            self.store.keys().to_vec()
        } else {
            shard_key_for_prefix(prefix).into_iter().collect()
        };

        let mut matches = Vec::new();
        for key in &candidates {
            let shard = match self.load_shard(key) {
                Ok(shard) => shard,
                Err(ShardError::ShardNotFound { .. }) => {
                    tracing::debug!("No shard '{}' for prefix '{}'", key, prefix);
                    continue;
                }
                Err(err) => return Err(err),
            };

            matches.extend(
                shard
                    .entries
                    .iter()
                    .filter(|entry| entry.matches(prefix, case))
                    .cloned(),
            );
        }

        Ok(matches)
    }

    /// Resolves an entry into display-ready `(qualifier, url)` pairs, in
    /// the entry's target order. Entries returned by
    /// [`SearchIndex::query`] are fully resolved by construction, so this
    /// cannot fail.
    pub fn resolve<'e>(&self, entry: &'e Entry) -> Vec<(&'e str, &'e str)> {
        entry
            .targets
            .iter()
            .map(|target| (target.qualifier.as_str(), target.url.as_str()))
            .collect()
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, LruCache<String, Arc<Shard>>> {
        // The cache holds immutable values only; a panic mid-insert cannot
        // leave it in a state worth rejecting.
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
