//! Filter facade.
//!
//! Composes the loaded dictionary, the normalizer, and the matcher behind a
//! `&str` API: containment, match enumeration, and masking. Input text is
//! transcoded to UTF-16 code units and normalized into scratch storage:
//! a stack buffer for texts of up to 512 code units, otherwise a pooled
//! buffer rented for the duration of the call and returned on every exit
//! path. `contains` and `find_matches` perform no heap allocation for
//! texts within the stack threshold.
//!
//! Matching is substring-based by design: "grass" contains "ass". Callers
//! that need word-boundary semantics must tokenize before filtering; the
//! engine deliberately does not guess boundaries.
//!
//! A filter is read-only after construction and may be shared across
//! threads freely; the scratch pool is lock-free.

use std::borrow::Cow;
use std::io::Read;
use std::mem;
use std::path::Path;

use crossbeam_queue::ArrayQueue;

use crate::dict::errors::LoadError;
use crate::dict::Dictionary;
use crate::matcher::Matcher;
use crate::normalize::Normalizer;
use crate::Match;

/// Stack scratch capacity, in code units. Texts at or below this size are
/// normalized without touching the heap.
pub const STACK_UNITS: usize = 512;

/// Pooled scratch buffers kept for texts above the stack threshold.
const POOL_BUFFERS: usize = 4;

/// Internal match buffer capacity used by [`Filter::mask`].
const MASK_SCAN_CAP: usize = 256;

/// Runtime configuration for a filter.
#[derive(Clone, Debug)]
pub struct FilterOptions {
    /// Lowercase input before matching. Must match the mode the dictionary
    /// was built with for case-insensitive behavior; a mismatched pairing
    /// degrades to case-sensitive matching.
    pub normalize: bool,
    /// Replacement for each masked code unit in preserve-length mode.
    /// Should be a BMP character; an astral mask character widens masked
    /// spans by one unit per replaced character.
    pub mask_char: char,
    /// When set, each match span is replaced by this string instead of
    /// per-unit mask characters.
    pub fixed_mask: Option<String>,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            normalize: true,
            mask_char: '*',
            fixed_mask: None,
        }
    }
}

/// Loaded forbidden-word filter.
///
/// Owns the dictionary blob; all lookups are zero-copy projections over it.
/// Dropping the filter releases the blob (or unmaps the file).
#[derive(Debug)]
pub struct Filter {
    dict: Dictionary,
    normalizer: Normalizer,
    mask_char: char,
    fixed_mask: Option<String>,
    pool: ArrayQueue<Vec<u16>>,
}

impl Filter {
    /// Memory-maps and validates a dictionary file.
    ///
    /// # Errors
    /// `LoadError::Io` on open/map failure, `LoadError::Format` when the
    /// blob fails validation. Nothing is partially loaded.
    pub fn open(path: impl AsRef<Path>, options: FilterOptions) -> Result<Self, LoadError> {
        Ok(Self::assemble(Dictionary::open(path)?, options))
    }

    /// Reads a dictionary blob fully from `reader`, then validates it.
    ///
    /// # Errors
    /// See [`Filter::open`].
    pub fn from_reader(reader: impl Read, options: FilterOptions) -> Result<Self, LoadError> {
        Ok(Self::assemble(Dictionary::from_reader(reader)?, options))
    }

    /// Validates an in-memory dictionary blob.
    ///
    /// # Errors
    /// `LoadError::Format` when the blob fails validation.
    pub fn from_bytes(bytes: Vec<u8>, options: FilterOptions) -> Result<Self, LoadError> {
        Ok(Self::assemble(Dictionary::from_bytes(bytes)?, options))
    }

    fn assemble(dict: Dictionary, options: FilterOptions) -> Self {
        Self {
            dict,
            normalizer: if options.normalize {
                Normalizer::Lowercase
            } else {
                Normalizer::None
            },
            mask_char: options.mask_char,
            fixed_mask: options.fixed_mask,
            pool: ArrayQueue::new(POOL_BUFFERS),
        }
    }

    /// The normalizer applied to input text.
    #[must_use]
    pub fn normalizer(&self) -> Normalizer {
        self.normalizer
    }

    /// Borrows a matcher over the dictionary views, for callers that
    /// already hold normalized UTF-16 code units.
    #[must_use]
    pub fn matcher(&self) -> Matcher<'_> {
        let view = self.dict.view();
        Matcher::new(view.trie(), view.fingerprints())
    }

    /// Returns true iff `text` contains any dictionary word.
    #[must_use]
    pub fn contains(&self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        self.with_units(text, |matcher, units| matcher.contains(units))
    }

    /// Enumerates non-overlapping matches into `out`, longest match at
    /// each position, in strictly ascending start order. Offsets are in
    /// UTF-16 code units of `text`.
    ///
    /// Returns the number of matches written; stops when `out` is full.
    pub fn find_matches(&self, text: &str, out: &mut [Match]) -> usize {
        if text.is_empty() || out.is_empty() {
            return 0;
        }
        self.with_units(text, |matcher, units| matcher.find_into(units, out))
    }

    /// Returns a masked copy of `text`, or the original when clean.
    ///
    /// In preserve-length mode (the default) every code unit of every match
    /// is replaced by the configured mask character; with a fixed mask each
    /// match span is replaced by the fixed string. Masking scans with an
    /// internal buffer of 256 matches; text with more matches is masked on
    /// the first 256.
    #[must_use]
    pub fn mask<'t>(&self, text: &'t str) -> Cow<'t, str> {
        if text.is_empty() {
            return Cow::Borrowed(text);
        }

        let mut buf = [Match::default(); MASK_SCAN_CAP];
        let found = self.find_matches(text, &mut buf);
        if found == 0 {
            return Cow::Borrowed(text);
        }
        let matches = &buf[..found];

        let mut out = String::with_capacity(text.len());
        let mut next = 0usize;
        let mut unit_pos = 0usize;
        for ch in text.chars() {
            let width = ch.len_utf16();
            if next < matches.len() {
                let m = matches[next];
                let start = m.start as usize;
                let end = start + m.len as usize;
                // Matches begin and end on char boundaries: dictionary
                // words are valid UTF-16 sequences, so a span can never
                // split a surrogate pair.
                if unit_pos >= start && unit_pos < end {
                    match &self.fixed_mask {
                        Some(fixed) => {
                            if unit_pos == start {
                                out.push_str(fixed);
                            }
                        }
                        None => {
                            for _ in 0..width {
                                out.push(self.mask_char);
                            }
                        }
                    }
                    unit_pos += width;
                    if unit_pos >= end {
                        next += 1;
                    }
                    continue;
                }
            }
            out.push(ch);
            unit_pos += width;
        }

        Cow::Owned(out)
    }

    /// Transcodes and normalizes `text` into scratch storage, then runs
    /// `body` against the matcher.
    ///
    /// Texts of up to [`STACK_UNITS`] code units use a stack buffer; larger
    /// texts rent a pooled buffer that is returned when the guard drops,
    /// on every exit path.
    fn with_units<R>(&self, text: &str, body: impl FnOnce(&Matcher<'_>, &[u16]) -> R) -> R {
        let matcher = self.matcher();

        // A UTF-16 transcode never yields more units than UTF-8 bytes, so a
        // short byte length proves the stack buffer fits without counting.
        let fits_stack = text.len() <= STACK_UNITS
            || text.encode_utf16().count() <= STACK_UNITS;

        if fits_stack {
            let mut buf = [0u16; STACK_UNITS];
            let mut len = 0usize;
            for unit in text.encode_utf16() {
                buf[len] = unit;
                len += 1;
            }
            self.normalizer.normalize_in_place(&mut buf[..len]);
            body(&matcher, &buf[..len])
        } else {
            let mut rented = self.rent();
            let units = rented.fill(text);
            self.normalizer.normalize_in_place(units);
            body(&matcher, units)
        }
    }

    fn rent(&self) -> PooledUnits<'_> {
        PooledUnits {
            pool: &self.pool,
            buf: self.pool.pop().unwrap_or_default(),
        }
    }
}

/// RAII guard for a pooled normalization buffer.
///
/// Returning the buffer happens in `drop`, so early returns and panics in
/// the matching body cannot leak it. When the pool is already full the
/// buffer is simply freed.
struct PooledUnits<'a> {
    pool: &'a ArrayQueue<Vec<u16>>,
    buf: Vec<u16>,
}

impl PooledUnits<'_> {
    fn fill(&mut self, text: &str) -> &mut [u16] {
        self.buf.clear();
        self.buf.extend(text.encode_utf16());
        &mut self.buf
    }
}

impl Drop for PooledUnits<'_> {
    fn drop(&mut self) {
        let buf = mem::take(&mut self.buf);
        let _ = self.pool.push(buf);
    }
}
