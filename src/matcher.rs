//! Hybrid trie + fingerprint matcher.
//!
//! The matcher slides a start position across the text. At each position it
//! walks the trie one code unit at a time; every terminal node it reaches
//! proposes a candidate, which is confirmed by hashing the candidate span
//! and probing the fingerprint set. The trie prunes the walk, the
//! fingerprint set supplies the final verdict; both views are read-only and
//! shared freely across threads.
//!
//! Enumeration is non-overlapping with longest-match-at-position semantics:
//! at each start the walk keeps going past verified terminals looking for a
//! longer verified match, and only then commits. A start with no match
//! advances by exactly one unit.
//!
//! Nothing here allocates and nothing fails: empty text or an empty
//! dictionary simply produce `false` / zero matches.

use crate::crc32;
use crate::dict::hash_set::FingerprintSet;
use crate::dict::trie::TrieView;
use crate::Match;

/// Read-only matcher over borrowed dictionary views.
#[derive(Clone, Copy, Debug)]
pub struct Matcher<'a> {
    trie: TrieView<'a>,
    fingerprints: FingerprintSet<'a>,
}

impl<'a> Matcher<'a> {
    /// Pairs a trie store with its fingerprint set.
    #[must_use]
    pub fn new(trie: TrieView<'a>, fingerprints: FingerprintSet<'a>) -> Self {
        Self { trie, fingerprints }
    }

    /// Returns true iff any substring of `text` is a dictionary word.
    #[must_use]
    pub fn contains(&self, text: &[u16]) -> bool {
        if self.fingerprints.is_empty() {
            return false;
        }
        let max_len = self.fingerprints.max_len();

        for start in 0..text.len() {
            let mut node = self.trie.root();
            let limit = (text.len() - start).min(max_len);
            for depth in 0..limit {
                let Some(child) = self.trie.child(node, text[start + depth]) else {
                    break;
                };
                node = self.trie.node(child);
                let len = depth + 1;
                if node.is_terminal() && self.fingerprints.valid_length(len) {
                    let h = crc32::hash_units(&text[start..start + len]);
                    if self.fingerprints.contains(h) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Length of the longest verified dictionary word starting at `start`,
    /// or 0 when none matches there.
    ///
    /// Every verified terminal along the walk is recorded and the walk
    /// continues; the longest verified length wins, not the first.
    #[must_use]
    pub fn longest_at(&self, text: &[u16], start: usize) -> usize {
        debug_assert!(start <= text.len());
        let mut node = self.trie.root();
        let limit = (text.len() - start).min(self.fingerprints.max_len());
        let mut best = 0usize;

        for depth in 0..limit {
            let Some(child) = self.trie.child(node, text[start + depth]) else {
                break;
            };
            node = self.trie.node(child);
            let len = depth + 1;
            if node.is_terminal() && self.fingerprints.valid_length(len) {
                let h = crc32::hash_units(&text[start..start + len]);
                if self.fingerprints.contains(h) {
                    best = len;
                }
            }
        }
        best
    }

    /// Enumerates non-overlapping matches into `out`, longest match at each
    /// position, strictly ascending starts.
    ///
    /// Returns the number of matches written; enumeration stops when `out`
    /// is full. Empty text or an empty `out` yield 0.
    pub fn find_into(&self, text: &[u16], out: &mut [Match]) -> usize {
        if out.is_empty() || self.fingerprints.is_empty() {
            return 0;
        }
        debug_assert!(text.len() <= u32::MAX as usize);

        let mut count = 0usize;
        let mut start = 0usize;
        while start < text.len() && count < out.len() {
            let len = self.longest_at(text, start);
            if len > 0 {
                out[count] = Match {
                    start: start as u32,
                    len: len as u32,
                };
                count += 1;
                start += len;
            } else {
                start += 1;
            }
        }
        count
    }
}
