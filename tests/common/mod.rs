//! Shared test fixtures and utilities for integration tests.
//!
//! # Test Isolation Strategy
//!
//! Each test gets its own temporary shard directory, so tests never share
//! cache state or observe one another's files. [`ShardDir`] wraps a
//! `tempfile::TempDir` that is cleaned up on drop.

use rstest::fixture;
use std::path::Path;
use tempfile::TempDir;

/// A temporary shard directory for test isolation.
pub struct ShardDir {
    _temp: TempDir,
}

#[allow(dead_code)] // Helpers used across different integration test crates
impl ShardDir {
    pub fn new() -> Self {
        docsearch::tracing::init();
        let temp = TempDir::new().expect("Failed to create temp directory");
        Self { _temp: temp }
    }

    /// Returns the root path of the shard directory.
    pub fn path(&self) -> &Path {
        self._temp.path()
    }

    /// Writes a shard file with the given name and content.
    ///
    /// # Panics
    /// Panics if the write fails.
    pub fn write_shard(&self, file_name: &str, content: &str) {
        let path = self.path().join(file_name);
        std::fs::write(&path, content)
            .unwrap_or_else(|e| panic!("Failed to write shard '{}': {}", file_name, e));
    }

    /// Opens a `DirStore` over this directory and wraps it in an index.
    pub fn open_index(&self) -> docsearch::SearchIndex {
        let store = docsearch::DirStore::open(self.path()).expect("Failed to open shard directory");
        docsearch::SearchIndex::new(store)
    }
}

/// Fixture: a shard directory mirroring a small generated documentation
/// set. Shard `69` holds the `i` labels (one of them with overloads),
/// `67` the `g` labels, and `74` the `t` labels in the legacy format.
#[fixture]
pub fn doc_shards() -> ShardDir {
    let dir = ShardDir::new();

    dir.write_shard(
        "69.json",
        r#"[
            ["isOpened", [["audiofile.html#x1", "CoreAudioFile"], ["sndfile.html#x2", "LibSndFile"]]],
            ["isValid", ["array.html#x3", "Array"]],
            ["init", ["uielement.html#x4", "faust::UIElement"]]
        ]"#,
    );

    dir.write_shard(
        "67.json",
        r#"[
            ["generateId", ["storage.html#x5", "DataStorage"]],
            ["get", [["property.html#x6", "Property"], ["atomproperty.html#x7", "AtomProperty"]]]
        ]"#,
    );

    dir.write_shard(
        "74.js",
        "var searchData=\n[\n  ['timefsm',['TimeFSM',['../timefsm.html#x8',1,'TimeFSM']]],\n  \
['to_5fstring',['to_string',['../ns.html#x9',1,'to_string(const Atom &amp;a)'],\
['../ns.html#xa',1,'to_string(const AtomList &amp;a)']]]\n];\n",
    );

    dir
}
