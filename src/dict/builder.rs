//! Offline dictionary builder.
//!
//! Turns a word list into a [`DictImage`]: an insertion trie with sorted
//! child vectors, flattened to contiguous node/edge tables, plus the sorted
//! fingerprint set and word-length bounds. The builder applies the same
//! normalizer the matcher will use; that pairing is what makes trie walks
//! and fingerprint checks agree at match time.
//!
//! # Determinism
//! Words are deduplicated post-normalization and inserted in sorted order,
//! so the same word set always produces a byte-identical blob.

use ahash::AHashSet;

use crate::crc32;
use crate::normalize::Normalizer;

use super::trie::NODE_FLAG_TERMINAL;
use super::{DictImage, EdgeRecord, NodeRecord};

/// Incremental dictionary builder.
#[derive(Debug)]
pub struct DictBuilder {
    normalizer: Normalizer,
    words: AHashSet<Vec<u16>>,
}

impl DictBuilder {
    /// Creates a builder that normalizes every added word with `normalizer`.
    #[must_use]
    pub fn new(normalizer: Normalizer) -> Self {
        Self {
            normalizer,
            words: AHashSet::new(),
        }
    }

    /// Adds one word. Empty words are ignored; duplicates (after
    /// normalization) collapse to one entry.
    pub fn add_word(&mut self, word: &str) {
        if word.is_empty() {
            return;
        }
        let mut units: Vec<u16> = word.encode_utf16().collect();
        self.normalizer.normalize_in_place(&mut units);
        self.words.insert(units);
    }

    /// Adds every entry of a word-list document.
    ///
    /// One word per line or comma-separated on a line. Lines whose first
    /// non-whitespace character is `#` are comments. Entries are trimmed;
    /// a whole entry wrapped in matching single or double quotes is
    /// unwrapped once. Empty entries are ignored.
    pub fn add_wordlist(&mut self, text: &str) {
        for line in text.lines() {
            let line = line.trim_start();
            if line.starts_with('#') {
                continue;
            }
            for entry in line.split(',') {
                let entry = strip_quotes(entry.trim());
                if !entry.is_empty() {
                    self.add_word(entry);
                }
            }
        }
    }

    /// Number of distinct words added so far.
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Builds the dictionary image.
    ///
    /// An empty builder yields the legal empty dictionary: a root-only
    /// trie, no fingerprints, and zero length bounds.
    #[must_use]
    pub fn build(&self) -> DictImage {
        let mut words: Vec<&[u16]> = self.words.iter().map(Vec::as_slice).collect();
        words.sort_unstable();

        let mut trie = InsertionTrie::new();
        let mut hashes = Vec::with_capacity(words.len());
        let mut min_len = u32::MAX;
        let mut max_len = 0u32;

        for word in &words {
            trie.insert(word);
            hashes.push(crc32::hash_units(word));
            let len = word.len() as u32;
            min_len = min_len.min(len);
            max_len = max_len.max(len);
        }

        if words.is_empty() {
            min_len = 0;
        }

        hashes.sort_unstable();
        hashes.dedup();

        let (nodes, edges) = trie.flatten();
        DictImage {
            nodes,
            edges,
            hashes,
            min_len,
            max_len,
        }
    }
}

/// Strips one layer of matching single or double quotes around a whole
/// entry.
fn strip_quotes(entry: &str) -> &str {
    let bytes = entry.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        if first == last && (first == b'"' || first == b'\'') {
            return &entry[1..entry.len() - 1];
        }
    }
    entry
}

/// Mutable trie used only during building.
///
/// Children are kept label-sorted at insert time so flattening emits edge
/// runs that are contiguous and strictly ascending, as the format requires.
struct InsertionTrie {
    nodes: Vec<BuildNode>,
}

#[derive(Default)]
struct BuildNode {
    children: Vec<(u16, u32)>,
    terminal: bool,
}

impl InsertionTrie {
    fn new() -> Self {
        Self {
            nodes: vec![BuildNode::default()],
        }
    }

    fn insert(&mut self, word: &[u16]) {
        let mut cur = 0usize;
        for &unit in word {
            let pos = self.nodes[cur]
                .children
                .binary_search_by_key(&unit, |&(label, _)| label);
            cur = match pos {
                Ok(i) => self.nodes[cur].children[i].1 as usize,
                Err(i) => {
                    assert!(self.nodes.len() <= u32::MAX as usize);
                    let id = self.nodes.len() as u32;
                    self.nodes[cur].children.insert(i, (unit, id));
                    self.nodes.push(BuildNode::default());
                    id as usize
                }
            };
        }
        self.nodes[cur].terminal = true;
    }

    fn flatten(&self) -> (Vec<NodeRecord>, Vec<EdgeRecord>) {
        let mut nodes = Vec::with_capacity(self.nodes.len());
        let mut edges = Vec::new();

        for node in &self.nodes {
            assert!(node.children.len() <= usize::from(u16::MAX));
            nodes.push(NodeRecord {
                first_edge: edges.len() as u32,
                edge_count: node.children.len() as u16,
                flags: if node.terminal { NODE_FLAG_TERMINAL } else { 0 },
            });
            for &(label, child) in &node.children {
                edges.push(EdgeRecord { label, child });
            }
        }

        (nodes, edges)
    }
}
