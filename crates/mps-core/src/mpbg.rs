//! Multi-pattern Breslauer-Galil wrapper: one BG matcher per dictionary
//! pattern, fanned out on every byte and reporting the longest hit.
//!
//! The original system's reference implementation for this component is an
//! empty stub (`mpbg.c` is nothing but TODOs); this module is built from the
//! component's written contract rather than any ported C.

use crate::bg::BgMatcher;
use crate::error::Result;
use crate::patterns_tree::PatternId;

struct Entry {
    matcher: BgMatcher,
    id: PatternId,
    len: usize,
}

/// Pre-compile accumulation list, mirroring the original's
/// pre-compile-linked-list / post-compile-array split.
#[derive(Default)]
pub struct MultiPatternBgBuilder {
    pending: Vec<(Vec<u8>, PatternId)>,
}

impl MultiPatternBgBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_pattern(&mut self, bytes: &[u8], id: PatternId) {
        self.pending.push((bytes.to_vec(), id));
    }

    pub fn compile(self) -> Result<MultiPatternBg> {
        let mut entries = Vec::with_capacity(self.pending.len());
        for (bytes, id) in self.pending {
            entries.push(Entry {
                len: bytes.len(),
                matcher: BgMatcher::new(&bytes)?,
                id,
            });
        }
        Ok(MultiPatternBg { entries })
    }
}

pub struct MultiPatternBg {
    entries: Vec<Entry>,
}

impl MultiPatternBg {
    pub fn reset(&mut self) {
        for e in &mut self.entries {
            e.matcher.reset();
        }
    }

    pub fn total_mem(&self) -> usize {
        self.entries.iter().map(|e| e.matcher.total_mem()).sum()
    }

    /// Feed `c` to every matcher; return the identity of the longest
    /// pattern that completed a match on this byte, if any.
    pub fn read_char(&mut self, c: u8) -> Result<Option<PatternId>> {
        let mut best: Option<(usize, PatternId)> = None;
        for e in &mut self.entries {
            if let Some(_pos) = e.matcher.read_char(c)? {
                if best.map_or(true, |(len, _)| e.len > len) {
                    best = Some((e.len, e.id));
                }
            }
        }
        Ok(best.map(|(_, id)| id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns_tree::{Origin, PatternsTree};

    #[test]
    fn reports_longest_of_concurrent_matches() {
        let patterns = vec![
            (b"he".to_vec(), Origin { file_number: 0, line_number: 1 }),
            (b"she".to_vec(), Origin { file_number: 0, line_number: 2 }),
            (b"his".to_vec(), Origin { file_number: 0, line_number: 3 }),
            (b"hers".to_vec(), Origin { file_number: 0, line_number: 4 }),
        ];
        let (_tree, assigned) = PatternsTree::build(&patterns);
        let mut builder = MultiPatternBgBuilder::new();
        for (bytes, id) in &assigned {
            builder.add_pattern(bytes, *id);
        }
        let mut mpbg = builder.compile().unwrap();

        let she_id = assigned.iter().find(|(b, _)| b == b"she").unwrap().1;
        let hers_id = assigned.iter().find(|(b, _)| b == b"hers").unwrap().1;

        let mut got = Vec::new();
        for &b in b"ushers" {
            got.push(mpbg.read_char(b).unwrap());
        }
        assert_eq!(got[2], Some(she_id));
        assert_eq!(got[5], Some(hers_id));
    }
}
