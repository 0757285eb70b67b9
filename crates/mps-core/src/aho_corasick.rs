//! Aho-Corasick multi-pattern matcher: the system's oracle, and also a
//! measured engine in its own right.
//!
//! Construction is the classical three steps: build a trie, compute failure
//! links by BFS, then propagate output links to the nearest failure-ancestor
//! carrying a pattern so `read_char` returns the *longest* match ending at
//! the current state. That output-link propagation is this module's one
//! deliberate departure from a from-scratch trie-walk implementation: a
//! bare trie only tells you the state's own pattern, not the longest one.

use crate::patterns_tree::PatternId;
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    Dense,
    Sparse,
}

#[derive(Debug, Clone)]
enum ChildMap {
    Dense(Box<[Option<u32>; 256]>),
    Sparse(HashMap<u8, u32>),
}

impl ChildMap {
    fn new(repr: Representation) -> Self {
        match repr {
            Representation::Dense => ChildMap::Dense(Box::new([None; 256])),
            Representation::Sparse => ChildMap::Sparse(HashMap::new()),
        }
    }

    fn get(&self, b: u8) -> Option<u32> {
        match self {
            ChildMap::Dense(arr) => arr[b as usize],
            ChildMap::Sparse(map) => map.get(&b).copied(),
        }
    }

    fn set(&mut self, b: u8, state: u32) {
        match self {
            ChildMap::Dense(arr) => arr[b as usize] = Some(state),
            ChildMap::Sparse(map) => {
                map.insert(b, state);
            }
        }
    }

    fn iter(&self) -> Vec<(u8, u32)> {
        match self {
            ChildMap::Dense(arr) => arr
                .iter()
                .enumerate()
                .filter_map(|(b, s)| s.map(|s| (b as u8, s)))
                .collect(),
            ChildMap::Sparse(map) => map.iter().map(|(&b, &s)| (b, s)).collect(),
        }
    }

    fn mem(&self) -> usize {
        match self {
            ChildMap::Dense(_) => 256 * std::mem::size_of::<Option<u32>>(),
            ChildMap::Sparse(map) => map.capacity() * (std::mem::size_of::<u8>() + std::mem::size_of::<u32>()),
        }
    }
}

#[derive(Debug, Clone)]
struct State {
    children: ChildMap,
    fail: u32,
    own_pattern: Option<PatternId>,
    output: Option<PatternId>,
}

#[derive(Debug, Clone)]
pub struct AhoCorasick {
    states: Vec<State>,
    representation: Representation,
    compiled: bool,
    current: u32,
}

impl AhoCorasick {
    pub fn new(representation: Representation) -> Self {
        Self {
            states: vec![State {
                children: ChildMap::new(representation),
                fail: 0,
                own_pattern: None,
                output: None,
            }],
            representation,
            compiled: false,
            current: 0,
        }
    }

    /// # Panics
    /// Panics if called after `compile`.
    pub fn add_pattern(&mut self, bytes: &[u8], id: PatternId) {
        assert!(!self.compiled, "add_pattern after compile");
        let mut state = 0u32;
        for &b in bytes {
            state = match self.states[state as usize].children.get(b) {
                Some(next) => next,
                None => {
                    let next = self.states.len() as u32;
                    self.states.push(State {
                        children: ChildMap::new(self.representation),
                        fail: 0,
                        own_pattern: None,
                        output: None,
                    });
                    self.states[state as usize].children.set(b, next);
                    next
                }
            };
        }
        self.states[state as usize].own_pattern = Some(id);
    }

    pub fn compile(&mut self) {
        let mut queue = VecDeque::new();
        for (_, child) in self.states[0].children.iter() {
            self.states[child as usize].fail = 0;
            queue.push_back(child);
        }
        while let Some(state) = queue.pop_front() {
            let children = self.states[state as usize].children.iter();
            for (b, child) in children {
                let mut fail = self.states[state as usize].fail;
                let fail_child = loop {
                    if let Some(next) = self.states[fail as usize].children.get(b) {
                        break next;
                    }
                    if fail == 0 {
                        break 0;
                    }
                    fail = self.states[fail as usize].fail;
                };
                self.states[child as usize].fail = if fail_child == child { 0 } else { fail_child };
                queue.push_back(child);
            }
        }

        // BFS again (failure links are now complete) to propagate output.
        let mut order = vec![0u32];
        let mut queue: VecDeque<u32> = self.states[0].children.iter().map(|(_, c)| c).collect();
        order.extend(queue.iter().copied());
        while let Some(state) = queue.pop_front() {
            for (_, child) in self.states[state as usize].children.iter() {
                order.push(child);
                queue.push_back(child);
            }
        }
        for state in order {
            self.states[state as usize].output = if self.states[state as usize].own_pattern.is_some() {
                self.states[state as usize].own_pattern
            } else if state == 0 {
                None
            } else {
                self.states[self.states[state as usize].fail as usize].output
            };
        }

        self.compiled = true;
    }

    pub fn reset(&mut self) {
        self.current = 0;
    }

    pub fn total_mem(&self) -> usize {
        self.states
            .iter()
            .map(|s| std::mem::size_of::<u32>() * 2 + std::mem::size_of::<Option<PatternId>>() * 2 + s.children.mem())
            .sum()
    }

    /// Consume one byte, returning the longest dictionary pattern ending
    /// here, if any.
    pub fn read_char(&mut self, c: u8) -> Option<PatternId> {
        loop {
            if let Some(next) = self.states[self.current as usize].children.get(c) {
                self.current = next;
                break;
            }
            if self.current == 0 {
                break;
            }
            self.current = self.states[self.current as usize].fail;
        }
        self.states[self.current as usize].output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(patterns: &[&[u8]], repr: Representation) -> AhoCorasick {
        let mut ac = AhoCorasick::new(repr);
        for (id, p) in patterns.iter().enumerate() {
            ac.add_pattern(p, id);
        }
        ac.compile();
        ac
    }

    fn run(ac: &mut AhoCorasick, stream: &[u8]) -> Vec<Option<PatternId>> {
        stream.iter().map(|&b| ac.read_char(b)).collect()
    }

    #[test]
    fn oracle_s6_cross_check() {
        let patterns: Vec<&[u8]> = vec![b"he", b"she", b"his", b"hers"];
        for repr in [Representation::Dense, Representation::Sparse] {
            let mut ac = build(&patterns, repr);
            let got = run(&mut ac, b"ushers");
            // positions: u s h e r s
            assert_eq!(got[2], None); // "sh" has no match
            assert_eq!(got[3], Some(1)); // "she" ends here, longest match wins over "he"
            assert_eq!(got[4], None);
            assert_eq!(got[5], Some(3)); // "hers"
        }
    }

    #[test]
    fn longest_match_wins_over_shorter_suffix() {
        let patterns: Vec<&[u8]> = vec![b"e", b"cde", b"bcde", b"abcde"];
        let mut ac = build(&patterns, Representation::Dense);
        let got = run(&mut ac, b"xabcde");
        assert_eq!(got[5], Some(3)); // "abcde", not any shorter suffix
    }

    #[test]
    fn dense_and_sparse_agree() {
        let patterns: Vec<&[u8]> = vec![b"ab", b"bc", b"abc", b"c"];
        let stream = b"xabcabcy";
        let mut dense = build(&patterns, Representation::Dense);
        let mut sparse = build(&patterns, Representation::Sparse);
        assert_eq!(run(&mut dense, stream), run(&mut sparse, stream));
    }

    #[test]
    fn reset_returns_to_root() {
        let patterns: Vec<&[u8]> = vec![b"ab"];
        let mut ac = build(&patterns, Representation::Dense);
        ac.read_char(b'a');
        ac.reset();
        assert_eq!(ac.read_char(b'b'), None);
    }
}
