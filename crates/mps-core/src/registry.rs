//! MPS engine registry: a name-addressed set of engines sharing the
//! {create, add_pattern, compile, read_char, reset, total_mem} contract.
//!
//! Engines are dispatched through a tagged enum rather than a trait object —
//! the registry's design note prefers this since the engine set is closed
//! and known at compile time, and it sidesteps an extra `Box`/vtable
//! indirection per byte on the hot `read_char` path.

use crate::aho_corasick::{AhoCorasick, Representation};
use crate::error::{Error, Result};
use crate::mpbg::{MultiPatternBg, MultiPatternBgBuilder};
use crate::patterns_tree::PatternId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    AhoCorasickDense,
    AhoCorasickSparse,
    MultiPatternBg,
}

impl EngineKind {
    pub fn name(self) -> &'static str {
        match self {
            EngineKind::AhoCorasickDense => "ac-dense",
            EngineKind::AhoCorasickSparse => "ac-sparse",
            EngineKind::MultiPatternBg => "bg",
        }
    }
}

/// Look up an engine kind by its registered name. Fatal at startup if the
/// name is unrecognized.
pub fn engine_kind_by_name(name: &str) -> Result<EngineKind> {
    match name {
        "ac-dense" => Ok(EngineKind::AhoCorasickDense),
        "ac-sparse" => Ok(EngineKind::AhoCorasickSparse),
        "bg" => Ok(EngineKind::MultiPatternBg),
        other => Err(Error::UnknownEngineName(other.to_string())),
    }
}

pub fn all_engine_kinds() -> &'static [EngineKind] {
    &[EngineKind::AhoCorasickDense, EngineKind::AhoCorasickSparse, EngineKind::MultiPatternBg]
}

pub enum EngineBuilder {
    AhoCorasick(AhoCorasick),
    Bg(MultiPatternBgBuilder),
}

impl EngineBuilder {
    pub fn create(kind: EngineKind) -> Self {
        match kind {
            EngineKind::AhoCorasickDense => EngineBuilder::AhoCorasick(AhoCorasick::new(Representation::Dense)),
            EngineKind::AhoCorasickSparse => EngineBuilder::AhoCorasick(AhoCorasick::new(Representation::Sparse)),
            EngineKind::MultiPatternBg => EngineBuilder::Bg(MultiPatternBgBuilder::new()),
        }
    }

    pub fn add_pattern(&mut self, bytes: &[u8], id: PatternId) {
        match self {
            EngineBuilder::AhoCorasick(ac) => ac.add_pattern(bytes, id),
            EngineBuilder::Bg(bg) => bg.add_pattern(bytes, id),
        }
    }

    pub fn compile(self) -> Result<Engine> {
        match self {
            EngineBuilder::AhoCorasick(mut ac) => {
                ac.compile();
                Ok(Engine::AhoCorasick(ac))
            }
            EngineBuilder::Bg(bg) => Ok(Engine::Bg(bg.compile()?)),
        }
    }
}

pub enum Engine {
    AhoCorasick(AhoCorasick),
    Bg(MultiPatternBg),
}

impl Engine {
    pub fn read_char(&mut self, c: u8) -> Result<Option<PatternId>> {
        match self {
            Engine::AhoCorasick(ac) => Ok(ac.read_char(c)),
            Engine::Bg(bg) => bg.read_char(c),
        }
    }

    pub fn reset(&mut self) {
        match self {
            Engine::AhoCorasick(ac) => ac.reset(),
            Engine::Bg(bg) => bg.reset(),
        }
    }

    pub fn total_mem(&self) -> usize {
        match self {
            Engine::AhoCorasick(ac) => ac.total_mem(),
            Engine::Bg(bg) => bg.total_mem(),
        }
    }
}
