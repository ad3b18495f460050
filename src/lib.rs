//! Forbidden-word filtering over a precompiled dictionary.
//!
//! A dictionary of up to ~10^5 words is compiled offline into a single
//! binary blob (the FCF3 container): a character-indexed trie for candidate
//! generation plus a sorted CRC32 fingerprint set for verification. The
//! online side loads the blob once, then answers three questions with zero
//! heap allocation on the hot path:
//! - does a text contain any dictionary word ([`Filter::contains`]),
//! - where are the matches ([`Filter::find_matches`]),
//! - what does the text look like with matches redacted ([`Filter::mask`]).
//!
//! Matching is **substring** matching, not token matching: "classic"
//! contains "ass". This is deliberate; callers needing word boundaries
//! must tokenize first.
//!
//! Typical flow:
//!
//! ```
//! use fcfilter_rs::{DictBuilder, Filter, FilterOptions, Match, Normalizer};
//!
//! let mut builder = DictBuilder::new(Normalizer::Lowercase);
//! builder.add_wordlist("badword, spam");
//! let blob = builder.build().to_bytes();
//!
//! let filter = Filter::from_bytes(blob, FilterOptions::default()).unwrap();
//! assert!(filter.contains("no SPAM please"));
//! assert_eq!(filter.mask("no SPAM please"), "no **** please");
//!
//! let mut out = [Match::default(); 16];
//! let n = filter.find_matches("no SPAM please", &mut out);
//! assert_eq!(n, 1);
//! assert_eq!((out[0].start, out[0].len), (3, 4));
//! ```
//!
//! After construction a [`Filter`] is read-only and safe to share across
//! threads without synchronization. Offsets and lengths are in UTF-16 code
//! units, the unit of the dictionary format.

pub mod crc32;
pub mod dict;
pub mod filter;
pub mod matcher;
pub mod normalize;

pub use dict::builder::DictBuilder;
pub use dict::errors::{DictFormatError, LoadError};
pub use dict::{DictImage, DictView, Dictionary};
pub use filter::{Filter, FilterOptions};
pub use matcher::Matcher;
pub use normalize::{NormalizeError, Normalizer};

/// One verified match: a span of the input, in UTF-16 code units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Match {
    /// Start offset of the match.
    pub start: u32,
    /// Match length; always > 0 for an emitted match.
    pub len: u32,
}

impl Match {
    /// The matched span as a range of code-unit offsets.
    #[inline]
    #[must_use]
    pub fn range(&self) -> std::ops::Range<usize> {
        let start = self.start as usize;
        start..start + self.len as usize
    }
}
