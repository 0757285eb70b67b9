//! Suffix-ordered tree of dictionary patterns.
//!
//! A pattern's ancestors in this tree are exactly its proper suffixes among
//! the dictionary. Internally this is built as a compressed trie over
//! *reversed* pattern bytes — a is a suffix of b iff reverse(a) is a prefix
//! of reverse(b) — which turns Phase A (full tree) into an ordinary radix
//! trie insertion with edge splitting. Phase B then walks that trie and
//! keeps only pattern-bearing nodes, linking each to its nearest
//! pattern-bearing ancestor (so non-pattern split nodes are invisible to
//! `is_pattern_suffix`).

/// Stable handle to a node in the compact tree. Never constructed for a
/// full-tree node that isn't itself a dictionary pattern.
pub type PatternId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Origin {
    pub file_number: u32,
    pub line_number: u32,
}

#[derive(Debug, Clone)]
struct CompactNode {
    parent: Option<PatternId>,
    origin: Origin,
}

#[derive(Debug, Clone, Default)]
pub struct PatternsTree {
    nodes: Vec<CompactNode>,
}

impl PatternsTree {
    /// Build the tree from dictionary patterns (in file/line order). Returns
    /// the tree plus, for every pattern, its bytes and assigned identity —
    /// ready to feed to every registered engine's `add_pattern`.
    pub fn build(patterns: &[(Vec<u8>, Origin)]) -> (Self, Vec<(Vec<u8>, PatternId)>) {
        let mut full = FullTrie::new();
        for (bytes, origin) in patterns {
            let reversed: Vec<u8> = bytes.iter().rev().copied().collect();
            full.insert(&reversed, *origin);
        }

        let mut tree = PatternsTree { nodes: Vec::new() };
        let mut out = Vec::new();
        let mut path = Vec::new();
        tree.compact_dfs(&full, full.root, None, &mut path, &mut out);
        (tree, out)
    }

    fn compact_dfs(
        &mut self,
        full: &FullTrie,
        node: usize,
        nearest_pattern_ancestor: Option<PatternId>,
        path: &mut Vec<u8>,
        out: &mut Vec<(Vec<u8>, PatternId)>,
    ) {
        let full_node = &full.arena[node];
        let mut ancestor = nearest_pattern_ancestor;

        if let Some(origin) = full_node.origin {
            let id = self.nodes.len();
            self.nodes.push(CompactNode { parent: nearest_pattern_ancestor, origin });
            let pattern: Vec<u8> = path.iter().rev().copied().collect();
            out.push((pattern, id));
            ancestor = Some(id);
        }

        for (label, child) in &full_node.children {
            path.extend_from_slice(label);
            self.compact_dfs(full, *child, ancestor, path, out);
            path.truncate(path.len() - label.len());
        }
    }

    pub fn origin(&self, id: PatternId) -> Origin {
        self.nodes[id].origin
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// True iff `a` is an ancestor of `b` (or `a == b`) — i.e. the pattern at
    /// `a` is a suffix of the pattern at `b`.
    pub fn is_pattern_suffix(&self, a: PatternId, b: PatternId) -> bool {
        let mut cur = Some(b);
        while let Some(n) = cur {
            if n == a {
                return true;
            }
            cur = self.nodes[n].parent;
        }
        false
    }
}

struct FullNode {
    children: Vec<(Vec<u8>, usize)>,
    origin: Option<Origin>,
}

struct FullTrie {
    arena: Vec<FullNode>,
    root: usize,
}

impl FullTrie {
    fn new() -> Self {
        Self {
            arena: vec![FullNode { children: Vec::new(), origin: None }],
            root: 0,
        }
    }

    fn new_node(&mut self) -> usize {
        self.arena.push(FullNode { children: Vec::new(), origin: None });
        self.arena.len() - 1
    }

    fn insert(&mut self, pattern: &[u8], origin: Origin) {
        let mut node = self.root;
        let mut remaining = pattern;

        loop {
            if remaining.is_empty() {
                if self.arena[node].origin.is_none() {
                    self.arena[node].origin = Some(origin);
                }
                return;
            }

            let mut matched_child: Option<(usize, usize)> = None; // (child index in Vec, common prefix len)
            for (idx, (label, _)) in self.arena[node].children.iter().enumerate() {
                let cp = common_prefix_len(label, remaining);
                if cp > 0 {
                    matched_child = Some((idx, cp));
                    break;
                }
            }

            match matched_child {
                None => {
                    let leaf = self.new_node();
                    self.arena[leaf].origin = Some(origin);
                    self.arena[node].children.push((remaining.to_vec(), leaf));
                    return;
                }
                Some((idx, cp)) => {
                    let (label, child) = self.arena[node].children[idx].clone();
                    if cp == label.len() {
                        node = child;
                        remaining = &remaining[cp..];
                        continue;
                    }
                    // split the edge at cp
                    let mid = self.new_node();
                    self.arena[mid].children.push((label[cp..].to_vec(), child));
                    self.arena[node].children[idx] = (label[..cp].to_vec(), mid);
                    node = mid;
                    remaining = &remaining[cp..];
                }
            }
        }
    }
}

fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}
