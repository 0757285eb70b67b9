//! Drives a small dictionary and stream through the real file-parsing path,
//! without touching performance counters (those need PMU access this
//! environment may not grant, so the lock-step classification logic is
//! exercised directly against the registry instead).

use std::io::Write;

use mps_core::patterns_tree::PatternsTree;
use mps_core::registry::{EngineBuilder, EngineKind};
use tempfile::NamedTempFile;

#[path = "../src/dict.rs"]
mod dict;
#[path = "../src/error.rs"]
mod error;

fn write_dict(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file
}

#[test]
fn dictionary_file_round_trips_through_patterns_tree() {
    let file = write_dict(&["he", "she", "|00 ff|", "garbled|nope"]);
    let patterns = dict::load(&[file.path().to_path_buf()]).unwrap();

    // "garbled|nope" never closes its hex block and is skipped.
    assert_eq!(patterns.len(), 3);

    let (tree, assigned) = PatternsTree::build(&patterns);
    assert_eq!(tree.len(), 3);

    let mut builder = EngineBuilder::create(EngineKind::AhoCorasickDense);
    for (bytes, id) in &assigned {
        builder.add_pattern(bytes, *id);
    }
    let mut engine = builder.compile().unwrap();

    let mut last = None;
    for &b in b"ushe" {
        last = engine.read_char(b).unwrap();
    }
    let she_id = assigned.iter().find(|(b, _)| b == b"she").unwrap().1;
    assert_eq!(last, Some(she_id));
}
