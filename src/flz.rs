//! FastLZ variant codec (FLZ) — bit-exact port of Solady's `LibZip.flzCompress`
//! / `flzDecompress`, as implemented in
//! `examples/original_source/src/compressions/fastlz.py`.
//!
//! An LZ77-style back-reference compressor with a fixed 8192-entry hash
//! table over 3-byte windows. See spec.md §3/§4.3 for the wire format.

use std::fmt;

use crate::hex::{self, HexError};

/// Errors raised while decompressing an FLZ stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlzError {
    /// A back-reference token pointed before the start of the output buffer.
    InvalidBackReference,
}

impl fmt::Display for FlzError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlzError::InvalidBackReference => {
                f.write_str("invalid back-reference during decompression")
            }
        }
    }
}

impl std::error::Error for FlzError {}

const HASH_TABLE_SIZE: usize = 8192;
const WINDOW: i64 = 8192;

#[inline]
fn u24(ib: &[u8], idx: usize) -> u32 {
    (ib[idx] as u32) | ((ib[idx + 1] as u32) << 8) | ((ib[idx + 2] as u32) << 16)
}

#[inline]
fn hash32(x: u32) -> usize {
    (((2654435769u32.wrapping_mul(x)) >> 19) & 8191) as usize
}

fn emit_literals(ob: &mut Vec<u8>, ib: &[u8], mut r: i64, mut s: i64) {
    while r >= 32 {
        ob.push(31);
        for _ in 0..32 {
            ob.push(ib[s as usize]);
            s += 1;
        }
        r -= 32;
    }
    if r > 0 {
        ob.push((r - 1) as u8);
        for _ in 0..r {
            ob.push(ib[s as usize]);
            s += 1;
        }
    }
}

/// Compresses `bytes` with the FastLZ variant described in spec.md §4.3.
/// This is a literal port of the reference's index arithmetic (signed,
/// since indices can transiently go negative in the trailing-literal
/// computation) rather than a from-scratch re-derivation.
pub fn compress_bytes(bytes: &[u8]) -> Vec<u8> {
    let ib = bytes;
    let n = ib.len() as i64;
    let b = n - 4;

    if n <= 0 {
        return Vec::new();
    }

    let mut ob: Vec<u8> = Vec::new();
    let mut ht = [0i64; HASH_TABLE_SIZE];

    let mut a: i64 = 0;
    let mut i: i64 = 2;

    while i < b - 9 {
        let (mut s, mut h, mut r, mut d, mut c): (u32, usize, i64, i64, u32);
        loop {
            s = u24(ib, i as usize);
            h = hash32(s);
            r = ht[h];
            ht[h] = i;
            d = i - r;
            c = if d < WINDOW { u24(ib, r as usize) } else { 0x1000000 };
            i += 1;
            if !(i < b - 9 && s != c) {
                break;
            }
        }
        if i >= b - 9 {
            break;
        }
        i -= 1;
        if i > a {
            emit_literals(&mut ob, ib, i - a, a);
        }

        let mut match_len: i64 = 0;
        let p = r + 3;
        let q = i + 3;
        let mut e = b - q;
        while match_len < e {
            e *= if ib[(p + match_len) as usize] == ib[(q + match_len) as usize] {
                1
            } else {
                0
            };
            match_len += 1;
        }
        i += match_len;
        d -= 1;

        while match_len > 262 {
            ob.push((224 + (d >> 8)) as u8);
            ob.push(253);
            ob.push((d & 255) as u8);
            match_len -= 262;
        }
        if match_len < 7 {
            ob.push(((match_len << 5) + (d >> 8)) as u8);
            ob.push((d & 255) as u8);
        } else {
            ob.push((224 + (d >> 8)) as u8);
            ob.push((match_len - 7) as u8);
            ob.push((d & 255) as u8);
        }

        if i + 2 < n {
            ht[hash32(u24(ib, i as usize))] = i;
        }
        i += 1;
        if i + 2 < n {
            ht[hash32(u24(ib, i as usize))] = i;
        }
        i += 1;
        a = i;
    }

    emit_literals(&mut ob, ib, b + 4 - a, a);
    ob
}

/// Decompresses an FLZ stream per spec.md §4.3. The copy loop walks byte by
/// byte so self-overlapping references (source inside the not-yet-finished
/// destination run) read back already-written bytes, matching standard
/// LZ77 semantics.
pub fn decompress_bytes(bytes: &[u8]) -> Result<Vec<u8>, FlzError> {
    let ib = bytes;
    let mut i = 0usize;
    let mut ob: Vec<u8> = Vec::new();
    let n = ib.len();

    while i < n {
        let t = ib[i] >> 5;
        if t == 0 {
            let lit_len = 1 + ib[i] as usize;
            i += 1;
            ob.extend_from_slice(&ib[i..i + lit_len]);
            i += lit_len;
        } else {
            let (f, match_len);
            if t < 7 {
                f = 256 * (ib[i] as i64 & 31) + ib[i + 1] as i64;
                match_len = 2 + (ib[i] as i64 >> 5);
                i += 2;
            } else {
                f = 256 * (ib[i] as i64 & 31) + ib[i + 2] as i64;
                match_len = 9 + ib[i + 1] as i64;
                i += 3;
            }
            let mut r = ob.len() as i64 - f - 1;
            if r < 0 {
                return Err(FlzError::InvalidBackReference);
            }
            for _ in 0..match_len {
                let byte = ob[r as usize];
                ob.push(byte);
                r += 1;
            }
        }
    }

    Ok(ob)
}

/// `flz_compress(hex) -> hex`.
pub fn flz_compress(data: &str) -> Result<String, HexError> {
    let bytes = hex::to_bytes(data)?;
    Ok(hex::to_hex(&compress_bytes(&bytes)))
}

/// `flz_decompress(hex) -> hex`.
pub fn flz_decompress(data: &str) -> Result<String, FlzDecompressError> {
    let bytes = hex::to_bytes(data).map_err(FlzDecompressError::Hex)?;
    let out = decompress_bytes(&bytes).map_err(FlzDecompressError::Flz)?;
    Ok(hex::to_hex(&out))
}

/// Combined error for the hex-in/hex-out `flz_decompress` entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlzDecompressError {
    Hex(HexError),
    Flz(FlzError),
}

impl fmt::Display for FlzDecompressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlzDecompressError::Hex(e) => write!(f, "{e}"),
            FlzDecompressError::Flz(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for FlzDecompressError {}
