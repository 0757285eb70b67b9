//! Core algorithms for streaming multi-pattern exact-match search: field
//! arithmetic, Karp-Rabin fingerprints, a real-time KMP matcher, the
//! Breslauer-Galil stream matcher, the suffix-ordered Patterns Tree, an
//! Aho-Corasick engine, and the engine registry tying them together.
//!
//! This crate has no I/O and no CLI surface — it is driven entirely through
//! in-memory byte slices. Dictionary parsing, stream reading, performance
//! counters, and output formatting live in the `mps-bench` binary.

pub mod aho_corasick;
pub mod bg;
pub mod error;
pub mod field;
pub mod fingerprint;
pub mod kmp;
pub mod mpbg;
pub mod patterns_tree;
pub mod registry;

pub use error::{Error, Result};
