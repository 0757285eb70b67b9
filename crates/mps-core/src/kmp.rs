//! Real-time single-pattern matcher.
//!
//! Builds on the classical KMP failure table (see
//! `tools/packet-match-fuzz::kmp::KmpMatcher` for the non-streaming version
//! this generalizes) but bounds the failure-function work done per
//! incoming byte to a small constant, deferring any excess into a circular
//! queue so the total work stays linear in the number of bytes consumed.
//! Bytes that can't be fully processed with the current budget sit in the
//! queue and get first claim on the next call's budget; a match is
//! reported against the stream position of the byte that completed it,
//! even if that processing happens while draining a backlog.

use std::collections::VecDeque;

/// Per-byte budget of failure-function hops. Keeping this fixed is what
/// gives amortized-constant behavior: total hops over N bytes is bounded by
/// `BUDGET_PER_CHAR * N` regardless of how bursty the mismatches are.
const BUDGET_PER_CHAR: usize = 2;

#[derive(Debug, Clone)]
pub struct RealTimeKmp {
    pattern: Vec<u8>,
    failure: Vec<usize>,
    offset: usize,
    queue: VecDeque<(u8, u64)>,
    position: u64,
    loop_fail: bool,
}

impl RealTimeKmp {
    /// # Panics
    /// Panics if `pattern` is empty.
    pub fn new(pattern: &[u8]) -> Self {
        assert!(!pattern.is_empty(), "pattern must not be empty");
        let failure = build_failure_table(pattern);
        Self {
            pattern: pattern.to_vec(),
            failure,
            offset: 0,
            queue: VecDeque::new(),
            position: 0,
            loop_fail: false,
        }
    }

    pub fn pattern(&self) -> &[u8] {
        &self.pattern
    }

    /// period(P) = |P| - failure[|P|].
    pub fn period(&self) -> usize {
        self.pattern.len() - self.failure[self.pattern.len()]
    }

    pub fn total_mem(&self) -> usize {
        (self.pattern.len() + self.failure.len()) * std::mem::size_of::<usize>()
            + self.queue.capacity() * std::mem::size_of::<(u8, u64)>()
    }

    pub fn reset(&mut self) {
        self.offset = 0;
        self.queue.clear();
        self.position = 0;
        self.loop_fail = false;
    }

    /// Whether the matcher is presently carrying deferred work.
    pub fn has_backlog(&self) -> bool {
        self.loop_fail || !self.queue.is_empty()
    }

    /// Feed one byte. Returns the stream positions (0-based, position of the
    /// byte completing the match) of every match that this call resolves —
    /// normally zero or one, but draining a backlog can resolve more than
    /// one in a single call.
    pub fn read_char(&mut self, c: u8) -> Vec<u64> {
        self.queue.push_back((c, self.position));
        self.position += 1;

        let mut matches = Vec::new();
        let mut budget = BUDGET_PER_CHAR;
        while budget > 0 {
            let Some(&(byte, pos)) = self.queue.front() else {
                break;
            };
            match self.advance(byte, &mut budget) {
                Advance::Resolved => {
                    self.queue.pop_front();
                    if self.offset == self.pattern.len() {
                        matches.push(pos);
                        self.offset = self.failure[self.pattern.len()];
                    }
                }
                Advance::NeedsMoreBudget => break,
            }
        }
        self.loop_fail = !self.queue.is_empty();
        matches
    }

    /// Try to consume `byte` against the current offset, spending at most
    /// `budget` failure-function hops.
    fn advance(&mut self, byte: u8, budget: &mut usize) -> Advance {
        loop {
            if self.pattern[self.offset] == byte {
                self.offset += 1;
                return Advance::Resolved;
            }
            if self.offset == 0 {
                return Advance::Resolved;
            }
            if *budget == 0 {
                return Advance::NeedsMoreBudget;
            }
            self.offset = self.failure[self.offset];
            *budget -= 1;
        }
    }
}

enum Advance {
    Resolved,
    NeedsMoreBudget,
}

/// `failure[len]` = length of the longest proper border of `pattern[0..len]`.
/// Length `m + 1` so `failure[m]` gives the continuation offset after a full
/// match (needed to find overlapping occurrences).
fn build_failure_table(pattern: &[u8]) -> Vec<usize> {
    let m = pattern.len();
    let mut table = vec![0usize; m + 1];
    let mut k = 0usize;
    for i in 1..m {
        while k > 0 && pattern[i] != pattern[k] {
            k = table[k];
        }
        if pattern[i] == pattern[k] {
            k += 1;
        }
        table[i + 1] = k;
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(kmp: &mut RealTimeKmp, stream: &[u8]) -> Vec<u64> {
        let mut out = Vec::new();
        for &b in stream {
            out.extend(kmp.read_char(b));
        }
        out
    }

    #[test]
    fn periodic_pattern_s1() {
        let mut kmp = RealTimeKmp::new(b"AAAAA");
        let matches = feed_all(&mut kmp, b"AAAAABAAAAAA");
        assert_eq!(matches, vec![4, 10, 11]);
    }

    #[test]
    fn classic_pattern_s2() {
        let mut kmp = RealTimeKmp::new(b"ABCDABD");
        let matches = feed_all(&mut kmp, b"ABCABCDABABCDABCDABDE");
        assert_eq!(matches, vec![18]);
    }

    #[test]
    fn no_match() {
        let mut kmp = RealTimeKmp::new(b"XYZ");
        assert!(feed_all(&mut kmp, b"ABCDEF").is_empty());
    }

    #[test]
    fn reset_clears_offset() {
        let mut kmp = RealTimeKmp::new(b"AB");
        kmp.read_char(b'A');
        kmp.reset();
        let matches = kmp.read_char(b'B');
        assert!(matches.is_empty());
    }

    #[test]
    fn period_matches_definition() {
        let kmp = RealTimeKmp::new(b"ababab");
        assert_eq!(kmp.period(), 2);
        let kmp = RealTimeKmp::new(b"abcdef");
        assert_eq!(kmp.period(), 6);
    }

    #[test]
    fn equivalent_to_naive_matching() {
        fn naive(pattern: &[u8], stream: &[u8]) -> Vec<u64> {
            let m = pattern.len();
            (0..stream.len())
                .filter(|&i| i + 1 >= m && &stream[i + 1 - m..=i] == pattern)
                .map(|i| i as u64)
                .collect()
        }
        let pattern = b"abab";
        let stream = b"abababcababcabababab";
        let mut kmp = RealTimeKmp::new(pattern);
        assert_eq!(feed_all(&mut kmp, stream), naive(pattern, stream));
    }
}
