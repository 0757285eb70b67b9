//! End-to-end scenarios driving a dictionary through the Patterns Tree and
//! every registered engine, checking they all agree with each other.

use mps_core::patterns_tree::{Origin, PatternsTree};
use mps_core::registry::{all_engine_kinds, EngineBuilder};

fn build_dictionary(patterns: &[&[u8]]) -> (PatternsTree, Vec<(Vec<u8>, usize)>) {
    let entries: Vec<(Vec<u8>, Origin)> = patterns
        .iter()
        .enumerate()
        .map(|(i, p)| (p.to_vec(), Origin { file_number: 0, line_number: i as u32 + 1 }))
        .collect();
    PatternsTree::build(&entries)
}

#[test]
fn s6_engines_agree_with_each_other() {
    let patterns: Vec<&[u8]> = vec![b"he", b"she", b"his", b"hers"];
    let (_tree, assigned) = build_dictionary(&patterns);
    let stream = b"ushers";

    let mut results = Vec::new();
    for kind in all_engine_kinds() {
        let mut builder = EngineBuilder::create(*kind);
        for (bytes, id) in &assigned {
            builder.add_pattern(bytes, *id);
        }
        let mut engine = builder.compile().unwrap();
        let mut per_position = Vec::new();
        for &b in stream {
            per_position.push(engine.read_char(b).unwrap());
        }
        results.push(per_position);
    }

    for window in results.windows(2) {
        assert_eq!(window[0], window[1], "engines disagree on per-position identities");
    }
}

#[test]
fn s5_patterns_tree_suffix_relationships() {
    let patterns: Vec<&[u8]> = vec![b"abcde", b"cde", b"e", b"bcde"];
    let (tree, assigned) = build_dictionary(&patterns);
    let id_of = |p: &[u8]| assigned.iter().find(|(b, _)| b == p).unwrap().1;

    assert!(tree.is_pattern_suffix(id_of(b"e"), id_of(b"cde")));
    assert!(tree.is_pattern_suffix(id_of(b"cde"), id_of(b"bcde")));
    assert!(tree.is_pattern_suffix(id_of(b"bcde"), id_of(b"abcde")));
    assert!(tree.is_pattern_suffix(id_of(b"e"), id_of(b"abcde")));
}

#[test]
fn engine_reset_is_equivalent_to_fresh_compile() {
    let patterns: Vec<&[u8]> = vec![b"abc", b"bc"];
    let (_tree, assigned) = build_dictionary(&patterns);

    for kind in all_engine_kinds() {
        let mut builder = EngineBuilder::create(*kind);
        for (bytes, id) in &assigned {
            builder.add_pattern(bytes, *id);
        }
        let mut engine = builder.compile().unwrap();

        let mut first_run = Vec::new();
        for &b in b"xabcy" {
            first_run.push(engine.read_char(b).unwrap());
        }
        engine.reset();
        let mut second_run = Vec::new();
        for &b in b"xabcy" {
            second_run.push(engine.read_char(b).unwrap());
        }
        assert_eq!(first_run, second_run);
    }
}

#[test]
fn total_mem_is_nonzero_after_compile() {
    let patterns: Vec<&[u8]> = vec![b"alpha", b"beta", b"gamma"];
    let (_tree, assigned) = build_dictionary(&patterns);
    for kind in all_engine_kinds() {
        let mut builder = EngineBuilder::create(*kind);
        for (bytes, id) in &assigned {
            builder.add_pattern(bytes, *id);
        }
        let engine = builder.compile().unwrap();
        assert!(engine.total_mem() > 0);
    }
}
