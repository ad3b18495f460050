//! Error types for dictionary loading and validation.
//!
//! Format errors name the field or record that failed validation so a bad
//! blob can be diagnosed without a hex dump. All enums are
//! `#[non_exhaustive]` to allow adding variants without breaking callers.

use std::fmt;
use std::io;

/// Errors from parsing and validating an FCF3 blob.
#[derive(Debug)]
#[non_exhaustive]
pub enum DictFormatError {
    /// Blob is shorter than the fixed header.
    TooSmall { len: usize },
    /// Magic field does not match `FCF3`.
    BadMagic { found: u32 },
    /// Version field is above the supported range.
    UnsupportedVersion { version: u16 },
    /// Blob is shorter than the header-declared tables require.
    Truncated { expected: u64, len: u64 },
    /// Node table is empty; the root node must exist.
    MissingRoot,
    /// A node's edge range extends past the edge table.
    EdgeRangeOutOfBounds { node: u32 },
    /// An edge's child index is not a valid node index.
    ChildOutOfBounds { node: u32, child: u32 },
    /// An edge points back at its own node.
    SelfEdge { node: u32 },
    /// Edge labels within a node are not strictly ascending.
    EdgeLabelOrder { node: u32 },
    /// Hash entries are not strictly ascending.
    FingerprintOrder { index: u32 },
    /// Word-length bounds are inconsistent.
    LengthBounds { min_len: u32, max_len: u32 },
}

impl fmt::Display for DictFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooSmall { len } => {
                write!(f, "blob too small for header: {len} bytes")
            }
            Self::BadMagic { found } => {
                write!(f, "bad magic: {found:#010x} (expected \"FCF3\")")
            }
            Self::UnsupportedVersion { version } => {
                write!(f, "unsupported version: {version}")
            }
            Self::Truncated { expected, len } => {
                write!(f, "blob truncated: {len} bytes (tables need {expected})")
            }
            Self::MissingRoot => write!(f, "node table is empty (no root)"),
            Self::EdgeRangeOutOfBounds { node } => {
                write!(f, "node {node}: edge range out of bounds")
            }
            Self::ChildOutOfBounds { node, child } => {
                write!(f, "node {node}: child index {child} out of bounds")
            }
            Self::SelfEdge { node } => write!(f, "node {node}: edge points at itself"),
            Self::EdgeLabelOrder { node } => {
                write!(f, "node {node}: edge labels not strictly ascending")
            }
            Self::FingerprintOrder { index } => {
                write!(f, "fingerprint {index}: not strictly ascending")
            }
            Self::LengthBounds { min_len, max_len } => {
                write!(f, "invalid length bounds: min {min_len}, max {max_len}")
            }
        }
    }
}

impl std::error::Error for DictFormatError {}

/// Errors from loading a dictionary from a file, reader, or byte buffer.
#[derive(Debug)]
#[non_exhaustive]
pub enum LoadError {
    /// I/O error while reading or mapping the blob.
    Io(io::Error),
    /// The blob failed format validation; nothing was loaded.
    Format(DictFormatError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::Format(err) => write!(f, "invalid dictionary: {err}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Format(err) => Some(err),
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<DictFormatError> for LoadError {
    fn from(err: DictFormatError) -> Self {
        Self::Format(err)
    }
}
