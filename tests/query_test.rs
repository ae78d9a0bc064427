mod common;

use assert2::{check, let_assert};
use common::{ShardDir, doc_shards};
use docsearch::{CaseMatching, ShardError};
use rstest::rstest;

// --- Query path over real shard files ---

/// Test: a three-letter prefix narrows to a single entry with both
/// targets in authored order.
#[rstest]
fn query_finds_overloaded_entry(doc_shards: ShardDir) {
    let index = doc_shards.open_index();

    let results = index.query("iso").unwrap();
    check!(results.len() == 1, "Expected one match: {:?}", results);
    check!(results[0].label == "isOpened");

    let pairs = index.resolve(&results[0]);
    check!(
        pairs
            == vec![
                ("CoreAudioFile", "audiofile.html#x1"),
                ("LibSndFile", "sndfile.html#x2"),
            ],
        "Targets must keep authored order"
    );
}

/// Test: sibling labels in the same shard stay separated by prefix.
#[rstest]
fn query_separates_shard_siblings(doc_shards: ShardDir) {
    let index = doc_shards.open_index();

    let results = index.query("isv").unwrap();
    check!(results.len() == 1);
    check!(results[0].label == "isValid");

    let results = index.query("ini").unwrap();
    check!(results.len() == 1);
    check!(results[0].label == "init");
}

/// Test: a prefix with no matching shard is an empty result, not an error.
#[rstest]
fn query_unpublished_shard_is_empty(doc_shards: ShardDir) {
    let index = doc_shards.open_index();
    check!(index.query("z").unwrap().is_empty());
}

/// Test: a shorter prefix returns everything under it, in insertion order.
#[rstest]
fn query_prefix_returns_insertion_order(doc_shards: ShardDir) {
    let index = doc_shards.open_index();

    let labels: Vec<String> = index
        .query("is")
        .unwrap()
        .into_iter()
        .map(|e| e.label)
        .collect();
    check!(labels == ["isOpened", "isValid"]);
}

/// Test: queries hit legacy JavaScript shards transparently.
#[rstest]
fn query_reads_legacy_shards(doc_shards: ShardDir) {
    let index = doc_shards.open_index();

    let results = index.query("time").unwrap();
    check!(results.len() == 1);
    check!(results[0].label == "TimeFSM");

    let results = index.query("to_s").unwrap();
    check!(results.len() == 1);
    check!(results[0].targets.len() == 2);
    check!(
        results[0].targets[0].qualifier == "to_string(const Atom &a)",
        "HTML entities must be decoded"
    );
}

/// Test: the case-sensitivity override changes matching, not sharding.
#[rstest]
fn query_case_sensitive_override(doc_shards: ShardDir) {
    let index = doc_shards.open_index();

    check!(index.query("timefsm").unwrap().len() == 1);
    check!(
        index
            .query_with("timefsm", CaseMatching::Sensitive)
            .unwrap()
            .is_empty()
    );
    check!(
        index
            .query_with("TimeF", CaseMatching::Sensitive)
            .unwrap()
            .len()
            == 1
    );
}

/// Test: the empty prefix walks every shard in sorted key order.
#[rstest]
fn query_empty_prefix_returns_all(doc_shards: ShardDir) {
    let index = doc_shards.open_index();

    let labels: Vec<String> = index
        .query("")
        .unwrap()
        .into_iter()
        .map(|e| e.label)
        .collect();
    check!(
        labels
            == [
                "generateId",
                "get",
                "isOpened",
                "isValid",
                "init",
                "TimeFSM",
                "to_string",
            ]
    );
    check!(index.entry_count().unwrap() == labels.len());
}

/// Test: repeated queries over an unchanged store return identical results.
#[rstest]
fn query_is_idempotent(doc_shards: ShardDir) {
    let index = doc_shards.open_index();

    let first = index.query("ge").unwrap();
    let second = index.query("ge").unwrap();
    check!(first == second);
    check!(!first.is_empty());
}

// --- Degraded shards ---

/// Test: a corrupted shard fails only the queries that touch it.
#[rstest]
fn malformed_shard_degrades_alone(doc_shards: ShardDir) {
    doc_shards.write_shard("62.json", "[[\"broken\"");
    let index = doc_shards.open_index();

    let result = index.query("bpf");
    let_assert!(Err(ShardError::MalformedShard { key, .. }) = result);
    check!(key == "62");

    // Other shards keep answering.
    check!(index.query("iso").unwrap().len() == 1);
    check!(index.query("get").unwrap().len() == 1);
}

/// Test: a structurally invalid record reports the record and label.
#[rstest]
fn malformed_record_reason_is_specific(doc_shards: ShardDir) {
    doc_shards.write_shard("62.json", r#"[["BPF", []]]"#);
    let index = doc_shards.open_index();

    let result = index.load_shard("62");
    let_assert!(Err(ShardError::MalformedShard { reason, .. }) = result);
    check!(reason.contains("BPF"), "Reason should name the record: {}", reason);
}

/// Test: load_shard rejects keys outside the published set without
/// touching the filesystem.
#[rstest]
fn load_shard_unknown_key(doc_shards: ShardDir) {
    let index = doc_shards.open_index();

    let result = index.load_shard("ff");
    let_assert!(Err(ShardError::ShardNotFound { key }) = result);
    check!(key == "ff");
}

// --- Codec round trip over files ---

/// Test: encoding a decoded shard and reloading it reproduces the entry
/// list exactly.
#[rstest]
fn shard_round_trips_through_files(doc_shards: ShardDir) {
    let index = doc_shards.open_index();
    let original = index.load_shard("69").unwrap();

    let reencoded = docsearch::codec::encode(&original);
    let copy = ShardDir::new();
    copy.write_shard("69.json", &reencoded);

    let reloaded = copy.open_index().load_shard("69").unwrap();
    check!(*reloaded == *original);
}

/// Test: a legacy shard re-encodes into the canonical format losslessly.
#[rstest]
fn legacy_shard_converts_to_canonical(doc_shards: ShardDir) {
    let index = doc_shards.open_index();
    let legacy = index.load_shard("74").unwrap();

    let copy = ShardDir::new();
    copy.write_shard("74.json", &docsearch::codec::encode(&legacy));

    let reloaded = copy.open_index().load_shard("74").unwrap();
    check!(*reloaded == *legacy);
}
