//! Shard serialization: the canonical JSON format and format sniffing.
//!
//! A persisted shard is a JSON array of `[label, target-spec]` pairs,
//! where `target-spec` is a single `[url, qualifier]` pair for labels with
//! one location, or an array of such pairs for labels with several:
//!
//! ```json
//! [
//!   ["isOpened", [["a.html#x1", "CoreAudioFile"], ["b.html#x2", "LibSndFile"]]],
//!   ["isValid", ["c.html#x3", "Array"]]
//! ]
//! ```
//!
//! Encoding and decoding are exact inverses: label text, target order, and
//! qualifiers survive a round trip unchanged.

use crate::error::{Result, ShardError};
use crate::legacy;
use crate::types::{Entry, Shard, Target};
use serde_json::Value;

/// Decodes shard text into a [`Shard`], sniffing the format.
///
/// Resources written by current generators are JSON; resources carried
/// over from the legacy generator are JavaScript fragments starting with a
/// `var searchData` prelude and are routed to [`legacy::decode`].
pub fn decode(key: &str, text: &str) -> Result<Shard> {
    if legacy::is_legacy(text) {
        legacy::decode(key, text)
    } else {
        decode_json(key, text)
    }
}

/// Decodes the canonical JSON shard format.
pub fn decode_json(key: &str, text: &str) -> Result<Shard> {
    let root: Value = serde_json::from_str(text)
        .map_err(|e| ShardError::malformed(key, format!("invalid JSON: {e}")))?;

    let records = root
        .as_array()
        .ok_or_else(|| ShardError::malformed(key, "top level must be an array of records"))?;

    let mut entries = Vec::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        entries.push(decode_record(key, i, record)?);
    }

    Ok(Shard::new(key, entries))
}

fn decode_record(key: &str, index: usize, record: &Value) -> Result<Entry> {
    let pair = record
        .as_array()
        .ok_or_else(|| ShardError::malformed(key, format!("record {index} is not an array")))?;

    let [label, spec] = pair.as_slice() else {
        return Err(ShardError::malformed(
            key,
            format!("record {index} must be a [label, target-spec] pair"),
        ));
    };

    let label = label.as_str().ok_or_else(|| {
        ShardError::malformed(key, format!("record {index} label is not a string"))
    })?;

    let targets = decode_target_spec(spec).ok_or_else(|| {
        ShardError::malformed(
            key,
            format!("record {index} ('{label}') has an invalid target-spec"),
        )
    })?;

    Ok(Entry::new(label, targets))
}

/// A target-spec is either one `[url, qualifier]` pair or a non-empty
/// array of such pairs.
fn decode_target_spec(spec: &Value) -> Option<Vec<Target>> {
    if let Some(target) = decode_target_pair(spec) {
        return Some(vec![target]);
    }

    let list = spec.as_array()?;
    if list.is_empty() {
        return None;
    }
    list.iter().map(decode_target_pair).collect()
}

fn decode_target_pair(value: &Value) -> Option<Target> {
    let pair = value.as_array()?;
    let [url, qualifier] = pair.as_slice() else {
        return None;
    };
    Some(Target::new(url.as_str()?, qualifier.as_str()?))
}

/// Encodes a shard into the canonical JSON format.
///
/// Single-target entries are written as a flat pair, multi-target entries
/// as a list of pairs, so `decode_json` reproduces the input exactly.
pub fn encode(shard: &Shard) -> String {
    let records: Vec<Value> = shard
        .entries
        .iter()
        .map(|entry| {
            let spec = if let [only] = entry.targets.as_slice() {
                encode_target(only)
            } else {
                Value::Array(entry.targets.iter().map(encode_target).collect())
            };
            Value::Array(vec![Value::String(entry.label.clone()), spec])
        })
        .collect();

    // A Vec<Value> never fails to serialize.
    serde_json::to_string_pretty(&records).unwrap_or_else(|_| "[]".to_string())
}

fn encode_target(target: &Target) -> Value {
    Value::Array(vec![
        Value::String(target.url.clone()),
        Value::String(target.qualifier.clone()),
    ])
}
