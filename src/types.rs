//! Core data model for the sharded search index.
//!
//! The index maps searchable labels to documentation locations. It is
//! partitioned into shards keyed by the label's leading character so a
//! query only ever decodes a small slice of the whole index.

use serde::{Deserialize, Serialize};

/// A single resolvable documentation location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Relative path to an HTML page, plus an optional `#fragment` anchor.
    pub url: String,
    /// Disambiguating context shown to the user, e.g. the enclosing class
    /// or namespace. Not guaranteed unique.
    pub qualifier: String,
}

impl Target {
    pub fn new(url: impl Into<String>, qualifier: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            qualifier: qualifier.into(),
        }
    }
}

/// One searchable label and its documentation targets.
///
/// Overloads and repeated declarations share a label and therefore an
/// entry; each occurrence contributes one [`Target`] in authored order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// The searchable symbol or term, case-sensitive as authored.
    pub label: String,
    /// Locations sharing this label, in authored order. Never empty for
    /// decoded data.
    pub targets: Vec<Target>,
}

impl Entry {
    pub fn new(label: impl Into<String>, targets: Vec<Target>) -> Self {
        Self {
            label: label.into(),
            targets,
        }
    }

    /// Whether this entry's label starts with `prefix` under the given
    /// case sensitivity. The prefix relation is reflexive: an exact match
    /// is a match.
    pub fn matches(&self, prefix: &str, case: CaseMatching) -> bool {
        match case {
            CaseMatching::Sensitive => self.label.starts_with(prefix),
            CaseMatching::Insensitive => self
                .label
                .to_lowercase()
                .starts_with(&prefix.to_lowercase()),
        }
    }
}

/// One immutable partition of the search index.
///
/// Shards are produced wholesale by the documentation generator and never
/// updated in place; entry order is the authored order and carries no
/// meaning beyond display order. Labels within a shard need not be unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shard {
    /// Short identifier grouping the labels of this partition.
    pub key: String,
    pub entries: Vec<Entry>,
}

impl Shard {
    pub fn new(key: impl Into<String>, entries: Vec<Entry>) -> Self {
        Self {
            key: key.into(),
            entries,
        }
    }
}

/// Case sensitivity for prefix matching.
///
/// Queries default to [`CaseMatching::Insensitive`]; labels are authored
/// case-sensitively but users rarely type matching case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseMatching {
    #[default]
    Insensitive,
    Sensitive,
}

/// Derives the shard key for a label.
///
/// The rule: take the label's first character, map it to lowercase, and
/// format its Unicode scalar value as lowercase hexadecimal. So
/// `"isOpened"` and `"init"` both land in shard `"69"`, `"_private"` in
/// `"5f"`. The mapping goes through the lowercased character, so both
/// cases of a letter always share a shard.
///
/// Returns `None` only for an empty label, which authored data never
/// contains.
pub fn shard_key(label: &str) -> Option<String> {
    let first = label.chars().next()?;
    let lowered = first.to_lowercase().next().unwrap_or(first);
    Some(format!("{:x}", lowered as u32))
}

/// Derives the candidate shard key for a query prefix.
///
/// Identical to [`shard_key`]: the shard a label lives in depends only on
/// its first character, so the prefix's first character fully determines
/// which shard can contain matches, regardless of requested case
/// sensitivity.
pub fn shard_key_for_prefix(prefix: &str) -> Option<String> {
    shard_key(prefix)
}
