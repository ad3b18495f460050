//! FCF3 dictionary container.
//!
//! A dictionary is a single self-describing blob: a fixed 32-byte header
//! followed by the node table, the edge table, and the fingerprint table.
//! All multi-byte fields are little-endian. The blob is built offline,
//! loaded once into an immutable byte store, and projected zero-copy.
//!
//! # Layout
//!
//! ```text
//! offset 0   u32 magic       0x33464346 ("FCF3")
//! offset 4   u16 version     3
//! offset 6   u16 flags       0
//! offset 8   u32 node_count
//! offset 12  u32 edge_count
//! offset 16  u32 hash_count
//! offset 20  u32 min_len     shortest word, code units (0 when empty)
//! offset 24  u32 max_len     longest word, code units (0 when empty)
//! offset 28  u32 reserved    0
//! offset 32  node records    8 bytes each (u32 first_edge, u16 count, u16 flags)
//!            edge records    8 bytes each (u16 label, u16 pad, u32 child)
//!            hash records    4 bytes each (u32 fingerprint, ascending)
//! ```
//!
//! # Format contract
//! - Fingerprints are CRC-32C (Castagnoli) over the word's UTF-16 code
//!   units as little-endian byte pairs; see [`crate::crc32`]. Blobs hashed
//!   with the IEEE polynomial are not compatible.
//! - Edge labels within a node are strictly ascending; a node's edges are
//!   one contiguous run of records.
//! - Node 0 is the root and exists even for an empty dictionary.
//!
//! # Validation
//! Loading validates the header, then every structural invariant the
//! matcher later relies on without bounds checks: edge ranges, child
//! indices, label order, fingerprint order, and length bounds. Validation
//! failures carry the offending field; nothing is partially loaded.

pub mod builder;
pub mod errors;
pub mod hash_set;
pub mod trie;

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use memmap2::Mmap;

use self::errors::{DictFormatError, LoadError};
use self::hash_set::{FingerprintSet, HASH_RECORD_LEN};
use self::trie::{TrieView, EDGE_RECORD_LEN, NODE_RECORD_LEN};

/// Magic field value, "FCF3" read as a little-endian u32.
pub const DICT_MAGIC: u32 = 0x3346_4346;
/// Highest supported format version.
pub const DICT_VERSION: u16 = 3;
/// Fixed header size in bytes.
pub const HEADER_LEN: usize = 32;

/// Decoded header fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    pub version: u16,
    pub flags: u16,
    pub node_count: u32,
    pub edge_count: u32,
    pub hash_count: u32,
    pub min_len: u32,
    pub max_len: u32,
}

impl Header {
    /// Parses and validates the fixed header.
    ///
    /// # Errors
    /// Returns a [`DictFormatError`] naming the failing field on bad magic,
    /// unsupported version, or a blob shorter than the declared tables.
    pub fn parse(data: &[u8]) -> Result<Self, DictFormatError> {
        if data.len() < HEADER_LEN {
            return Err(DictFormatError::TooSmall { len: data.len() });
        }

        let magic = read_u32(data, 0);
        if magic != DICT_MAGIC {
            return Err(DictFormatError::BadMagic { found: magic });
        }

        let version = read_u16(data, 4);
        if version > DICT_VERSION {
            return Err(DictFormatError::UnsupportedVersion { version });
        }

        let header = Self {
            version,
            flags: read_u16(data, 6),
            node_count: read_u32(data, 8),
            edge_count: read_u32(data, 12),
            hash_count: read_u32(data, 16),
            min_len: read_u32(data, 20),
            max_len: read_u32(data, 24),
        };

        let expected = header.tables_end();
        if (data.len() as u64) < expected {
            return Err(DictFormatError::Truncated {
                expected,
                len: data.len() as u64,
            });
        }

        if header.node_count == 0 {
            return Err(DictFormatError::MissingRoot);
        }

        if header.min_len > header.max_len || (header.hash_count > 0 && header.min_len == 0) {
            return Err(DictFormatError::LengthBounds {
                min_len: header.min_len,
                max_len: header.max_len,
            });
        }

        Ok(header)
    }

    /// Byte offset one past the last table. Computed in u64 so the
    /// header-declared counts cannot overflow the check on 32-bit hosts.
    fn tables_end(&self) -> u64 {
        HEADER_LEN as u64
            + u64::from(self.node_count) * NODE_RECORD_LEN as u64
            + u64::from(self.edge_count) * EDGE_RECORD_LEN as u64
            + u64::from(self.hash_count) * HASH_RECORD_LEN as u64
    }

    fn nodes_range(&self) -> std::ops::Range<usize> {
        let start = HEADER_LEN;
        start..start + self.node_count as usize * NODE_RECORD_LEN
    }

    fn edges_range(&self) -> std::ops::Range<usize> {
        let start = self.nodes_range().end;
        start..start + self.edge_count as usize * EDGE_RECORD_LEN
    }

    fn hashes_range(&self) -> std::ops::Range<usize> {
        let start = self.edges_range().end;
        start..start + self.hash_count as usize * HASH_RECORD_LEN
    }
}

/// Zero-copy, fully validated view over a dictionary blob.
#[derive(Clone, Copy, Debug)]
pub struct DictView<'a> {
    header: Header,
    nodes: &'a [u8],
    edges: &'a [u8],
    hashes: &'a [u8],
}

impl<'a> DictView<'a> {
    /// Parses and validates a blob, projecting the three table regions.
    ///
    /// Validation is O(nodes + edges + hashes) and runs once per load; the
    /// matcher afterwards indexes without bounds checks in release builds.
    ///
    /// # Errors
    /// Returns a [`DictFormatError`] naming the first violated invariant.
    pub fn parse(data: &'a [u8]) -> Result<Self, DictFormatError> {
        let header = Header::parse(data)?;
        let view = Self::project(data, header);
        view.validate_tables()?;
        Ok(view)
    }

    /// Projects table regions for an already-validated header.
    fn project(data: &'a [u8], header: Header) -> Self {
        Self {
            header,
            nodes: &data[header.nodes_range()],
            edges: &data[header.edges_range()],
            hashes: &data[header.hashes_range()],
        }
    }

    fn validate_tables(&self) -> Result<(), DictFormatError> {
        let trie = self.trie();
        let node_count = self.header.node_count;
        let edge_count = self.header.edge_count;

        for i in 0..node_count {
            let node = trie.node(i);
            let end = u64::from(node.first_edge) + u64::from(node.edge_count);
            if node.edge_count > 0 && end > u64::from(edge_count) {
                return Err(DictFormatError::EdgeRangeOutOfBounds { node: i });
            }

            let edges = trie.edges(node);
            let mut prev_label: Option<u16> = None;
            for j in 0..edges.len() {
                let label = edges.label_at(j);
                if let Some(prev) = prev_label {
                    if label <= prev {
                        return Err(DictFormatError::EdgeLabelOrder { node: i });
                    }
                }
                prev_label = Some(label);

                let child = edges.child_at(j);
                if child >= node_count {
                    return Err(DictFormatError::ChildOutOfBounds { node: i, child });
                }
                if child == i {
                    return Err(DictFormatError::SelfEdge { node: i });
                }
            }
        }

        let set = self.fingerprints();
        for i in 1..set.len() {
            if set.at(i) <= set.at(i - 1) {
                return Err(DictFormatError::FingerprintOrder { index: i as u32 });
            }
        }

        Ok(())
    }

    /// Header fields.
    #[inline]
    #[must_use]
    pub fn header(&self) -> Header {
        self.header
    }

    /// Trie store over the node and edge regions.
    #[inline]
    #[must_use]
    pub fn trie(&self) -> TrieView<'a> {
        TrieView::new(self.nodes, self.edges)
    }

    /// Fingerprint set over the hash region.
    #[inline]
    #[must_use]
    pub fn fingerprints(&self) -> FingerprintSet<'a> {
        FingerprintSet::new(self.hashes, self.header.min_len, self.header.max_len)
    }
}

/// Immutable dictionary byte store.
///
/// Backed by either a memory-mapped file (production) or owned in-memory
/// bytes (tests, streams). Clones are cheap and share the same bytes,
/// which are never mutated after load.
#[derive(Clone, Debug)]
enum DictBytes {
    Mmap(Arc<Mmap>),
    Owned(Arc<[u8]>),
}

impl DictBytes {
    #[inline]
    fn as_slice(&self) -> &[u8] {
        match self {
            Self::Mmap(mmap) => mmap.as_ref(),
            Self::Owned(bytes) => bytes.as_ref(),
        }
    }
}

/// Owned, validated dictionary.
///
/// Owns the blob and re-projects [`DictView`]s on demand; projection after
/// the initial validation is two offset computations and allocates nothing.
#[derive(Clone, Debug)]
pub struct Dictionary {
    bytes: DictBytes,
    header: Header,
}

impl Dictionary {
    /// Memory-maps and validates a dictionary file.
    ///
    /// # Errors
    /// `LoadError::Io` if the file cannot be opened or mapped;
    /// `LoadError::Format` if validation fails. Nothing is partially loaded.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let file = File::open(path)?;
        // SAFETY: the mapping is used read-only for the lifetime of the
        // store. Concurrent truncation of the underlying file is outside the
        // crate's contract, as with every mmap-backed reader.
        let mmap = unsafe { Mmap::map(&file)? };
        Self::from_store(DictBytes::Mmap(Arc::new(mmap)))
    }

    /// Reads a dictionary fully from `reader`, then validates it.
    ///
    /// # Errors
    /// See [`Dictionary::open`].
    pub fn from_reader(mut reader: impl Read) -> Result<Self, LoadError> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        Self::from_bytes(buf)
    }

    /// Validates an in-memory blob.
    ///
    /// # Errors
    /// `LoadError::Format` if validation fails.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, LoadError> {
        Self::from_store(DictBytes::Owned(Arc::from(bytes)))
    }

    fn from_store(bytes: DictBytes) -> Result<Self, LoadError> {
        let header = DictView::parse(bytes.as_slice())?.header();
        Ok(Self { bytes, header })
    }

    /// Projects a validated view over the owned bytes.
    #[inline]
    #[must_use]
    pub fn view(&self) -> DictView<'_> {
        DictView::project(self.bytes.as_slice(), self.header)
    }

    /// Total blob size in bytes.
    #[inline]
    #[must_use]
    pub fn blob_len(&self) -> usize {
        self.bytes.as_slice().len()
    }
}

/// In-memory image of a dictionary, produced by the builder.
///
/// This is the write-side counterpart of [`DictView`]: flat record vectors
/// that serialize to a blob and re-parse to an identical structure.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DictImage {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
    pub hashes: Vec<u32>,
    pub min_len: u32,
    pub max_len: u32,
}

/// Write-side node record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NodeRecord {
    pub first_edge: u32,
    pub edge_count: u16,
    pub flags: u16,
}

/// Write-side edge record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeRecord {
    pub label: u16,
    pub child: u32,
}

impl DictImage {
    /// Serializes the image to an FCF3 blob.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        assert!(self.nodes.len() <= u32::MAX as usize);
        assert!(self.edges.len() <= u32::MAX as usize);
        assert!(self.hashes.len() <= u32::MAX as usize);

        let total = HEADER_LEN
            + self.nodes.len() * NODE_RECORD_LEN
            + self.edges.len() * EDGE_RECORD_LEN
            + self.hashes.len() * HASH_RECORD_LEN;
        let mut out = Vec::with_capacity(total);

        out.extend_from_slice(&DICT_MAGIC.to_le_bytes());
        out.extend_from_slice(&DICT_VERSION.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes()); // flags
        out.extend_from_slice(&(self.nodes.len() as u32).to_le_bytes());
        out.extend_from_slice(&(self.edges.len() as u32).to_le_bytes());
        out.extend_from_slice(&(self.hashes.len() as u32).to_le_bytes());
        out.extend_from_slice(&self.min_len.to_le_bytes());
        out.extend_from_slice(&self.max_len.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes()); // reserved

        for node in &self.nodes {
            out.extend_from_slice(&node.first_edge.to_le_bytes());
            out.extend_from_slice(&node.edge_count.to_le_bytes());
            out.extend_from_slice(&node.flags.to_le_bytes());
        }
        for edge in &self.edges {
            out.extend_from_slice(&edge.label.to_le_bytes());
            out.extend_from_slice(&0u16.to_le_bytes()); // padding
            out.extend_from_slice(&edge.child.to_le_bytes());
        }
        for hash in &self.hashes {
            out.extend_from_slice(&hash.to_le_bytes());
        }

        debug_assert_eq!(out.len(), total);
        out
    }
}

#[inline]
fn read_u16(data: &[u8], off: usize) -> u16 {
    u16::from_le_bytes([data[off], data[off + 1]])
}

#[inline]
fn read_u32(data: &[u8], off: usize) -> u32 {
    u32::from_le_bytes([data[off], data[off + 1], data[off + 2], data[off + 3]])
}
