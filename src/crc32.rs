//! CRC32 fingerprint primitive.
//!
//! Computes the CRC-32C (Castagnoli) checksum used for dictionary
//! fingerprints. The polynomial choice is part of the dictionary format
//! contract: the x86 `crc32` instruction family implements exactly this
//! polynomial, so the hardware path and the table-driven software path
//! agree bit-for-bit on every input. Builder and matcher both hash through
//! this module, byte-identically.
//!
//! # Invariants
//! - Initial register 0xFFFF_FFFF, reflected shift, final XOR 0xFFFF_FFFF.
//! - UTF-16 code units are hashed as little-endian byte pairs on every
//!   platform (`hash_units`).
//!
//! # Failure modes
//! None. Both entry points are pure and total.

/// Reflected CRC-32C (Castagnoli) polynomial.
const POLY: u32 = 0x82F6_3B78;

/// Table for the byte-at-a-time software path, built at compile time.
static TABLE: [u32; 256] = build_table();

const fn build_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u32;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 1 != 0 { (crc >> 1) ^ POLY } else { crc >> 1 };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// Computes the CRC-32C of a byte slice.
#[inline]
#[must_use]
pub fn hash_bytes(bytes: &[u8]) -> u32 {
    #[cfg(target_arch = "x86_64")]
    {
        if std::arch::is_x86_feature_detected!("sse4.2") {
            // SAFETY: sse4.2 support was just verified at runtime.
            return unsafe { hash_bytes_hw(bytes) };
        }
    }
    hash_bytes_sw(bytes)
}

/// Computes the CRC-32C of UTF-16 code units, hashed as little-endian
/// byte pairs.
///
/// This is the fingerprint function for dictionary words and match
/// candidates. The little-endian pairing is fixed by the format and does
/// not vary with the host byte order.
#[inline]
#[must_use]
pub fn hash_units(units: &[u16]) -> u32 {
    #[cfg(target_endian = "little")]
    {
        // SAFETY: on a little-endian target the in-memory representation of
        // `[u16]` is exactly the little-endian byte-pair sequence the format
        // hashes. `u8` has no alignment requirement, and the length cannot
        // overflow because the units already fit in memory.
        let bytes = unsafe {
            std::slice::from_raw_parts(units.as_ptr().cast::<u8>(), units.len() * 2)
        };
        return hash_bytes(bytes);
    }
    #[cfg(not(target_endian = "little"))]
    {
        let mut state = !0u32;
        for &unit in units {
            state = update_sw(state, &unit.to_le_bytes());
        }
        !state
    }
}

/// Table-driven software path.
#[inline]
fn hash_bytes_sw(bytes: &[u8]) -> u32 {
    !update_sw(!0u32, bytes)
}

#[inline]
fn update_sw(mut state: u32, bytes: &[u8]) -> u32 {
    for &b in bytes {
        let idx = ((state ^ u32::from(b)) & 0xFF) as usize;
        state = (state >> 8) ^ TABLE[idx];
    }
    state
}

/// Hardware path consuming 8-byte, then 4-byte, then single-byte chunks.
///
/// The `crc32` instruction implements the Castagnoli polynomial, the same
/// polynomial as [`TABLE`]; the two paths are interchangeable.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse4.2")]
unsafe fn hash_bytes_hw(bytes: &[u8]) -> u32 {
    use std::arch::x86_64::{_mm_crc32_u32, _mm_crc32_u64, _mm_crc32_u8};

    let mut state = !0u32;

    let mut chunks = bytes.chunks_exact(8);
    for chunk in chunks.by_ref() {
        let word = u64::from_le_bytes(chunk.try_into().expect("8-byte chunk"));
        state = _mm_crc32_u64(u64::from(state), word) as u32;
    }

    let rest = chunks.remainder();
    let mut chunks = rest.chunks_exact(4);
    for chunk in chunks.by_ref() {
        let word = u32::from_le_bytes(chunk.try_into().expect("4-byte chunk"));
        state = _mm_crc32_u32(state, word);
    }

    for &b in chunks.remainder() {
        state = _mm_crc32_u8(state, b);
    }

    !state
}
