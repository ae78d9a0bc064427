//! Prefix search over sharded documentation indexes.
//!
//! A documentation generator emits a search index partitioned into shards
//! keyed by a label's leading character, so a search box only ever loads a
//! small slice of the index per keystroke. This crate is the read side:
//! it decodes shards (canonical JSON or the legacy JavaScript format),
//! answers prefix queries, and resolves matches into display-ready
//! `(qualifier, url)` pairs. The index is immutable once published; there
//! is no write path here.
//!
//! ```no_run
//! use docsearch::{DirStore, SearchIndex};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let index = SearchIndex::new(DirStore::open("docs/html/search")?);
//!
//! for entry in index.query("iso")? {
//!     for (qualifier, url) in index.resolve(&entry) {
//!         println!("{}: {} ({})", entry.label, qualifier, url);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod error;
pub mod index;
pub mod legacy;
pub mod store;
pub mod tracing;
pub mod types;

pub use error::{Result, ShardError};
pub use index::SearchIndex;
pub use store::{DirStore, MemoryStore, ShardStore};
pub use types::{CaseMatching, Entry, Shard, Target, shard_key, shard_key_for_prefix};
