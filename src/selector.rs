//! Selector / cost model (C6): chooses how to deliver a payload — vanilla
//! calldata, RLE, FastLZ, or JIT bytecode — based on payload size and an
//! explicit algorithm override, ported from
//! `examples/original_source/src/ethcompress/compressor.py`'s
//! `compress_call_data`.

use std::fmt;

use alloy_primitives::Address;

use crate::cd;
use crate::config::DEFAULT_MIN_SIZE;
use crate::flz;
use crate::forwarder;
use crate::hex::{self, HexError};
use crate::jit;

/// A payload at or above this many bytes is always sent via JIT in `auto`
/// mode — large payloads amortise the JIT program's fixed overhead better
/// than a hash-table codec does (spec.md §4.6).
const JIT_FORCE_THRESHOLD: usize = 2096;

/// Compression strategy. `Auto` lets the selector pick by size; the rest
/// force a specific delivery mode regardless of payload size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alg {
    Auto,
    Vanilla,
    Cd,
    Flz,
    Jit,
}

impl fmt::Display for Alg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Alg::Auto => "auto",
            Alg::Vanilla => "vanilla",
            Alg::Cd => "cd",
            Alg::Flz => "flz",
            Alg::Jit => "jit",
        };
        f.write_str(s)
    }
}

/// Raised only by the strict parser used at the CLI boundary. The
/// programmatic `compress_call_data` entry point never raises this —
/// unrecognised algorithm names there silently degrade to vanilla delivery,
/// matching the reference's duck-typed `alg: str` parameter (spec.md §7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnsupportedAlg;

impl fmt::Display for UnsupportedAlg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unsupported algorithm (expected auto, vanilla, cd, flz, or jit)")
    }
}

impl std::error::Error for UnsupportedAlg {}

impl std::str::FromStr for Alg {
    type Err = UnsupportedAlg;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Alg::Auto),
            "vanilla" => Ok(Alg::Vanilla),
            "cd" => Ok(Alg::Cd),
            "flz" => Ok(Alg::Flz),
            "jit" => Ok(Alg::Jit),
            _ => Err(UnsupportedAlg),
        }
    }
}

/// Lenient variant for the library's programmatic entry point: anything
/// that isn't one of the five known names is treated as `Vanilla`, not an
/// error (spec.md §4.6/§7).
fn alg_from_str_lenient(s: &str) -> Alg {
    s.parse().unwrap_or(Alg::Vanilla)
}

/// One `eth_call` state-override entry: deploy `code` at `address` for the
/// duration of the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateOverride {
    pub address: Address,
    pub code: String,
}

/// Size/benefit accounting attached to every selection (spec.md §4.6).
/// `compressed_size` and `code_size` are kept apart rather than pre-summed
/// so callers can check `compressed_size + code_size < original_size`
/// directly; `bytes_saved`/`pct` report that same comparison as savings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Meta {
    pub alg: Alg,
    pub original_size: usize,
    pub compressed_size: usize,
    pub code_size: usize,
    pub bytes_saved: usize,
    pub pct: f64,
    pub benefit: bool,
}

/// What the selector decided to send: the target address, the `data` field
/// of the `eth_call`, any state override required, and the accounting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedCallData {
    pub to: Address,
    pub data: String,
    pub overrides: Vec<StateOverride>,
    pub meta: Meta,
}

/// Errors raised while selecting and encoding a compressed call. The
/// selector itself is total over its inputs; only malformed hex fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectError {
    Hex(HexError),
}

impl fmt::Display for SelectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectError::Hex(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SelectError {}

impl From<HexError> for SelectError {
    fn from(e: HexError) -> Self {
        SelectError::Hex(e)
    }
}

fn vanilla(to: Address, bytes: &[u8]) -> CompressedCallData {
    let size = bytes.len();
    CompressedCallData {
        to,
        data: hex::to_hex(bytes),
        overrides: Vec::new(),
        meta: Meta {
            alg: Alg::Vanilla,
            original_size: size,
            compressed_size: size,
            code_size: 0,
            bytes_saved: 0,
            pct: 0.0,
            benefit: false,
        },
    }
}

/// Left-pads `addr` to a 32-byte word — the calldata shape the JIT
/// decompressor's `CALLDATALOAD(0)` prologue expects (spec.md §6).
fn address_word_bytes(addr: Address) -> Vec<u8> {
    let mut out = vec![0u8; 12];
    out.extend_from_slice(addr.as_slice());
    out
}

/// Picks between CD and FLZ by actually running both and keeping the
/// shorter output — the reference does not try to predict which wins.
fn auto_pick_codec(bytes: &[u8]) -> Alg {
    let cd_len = cd::compress_bytes(bytes).len();
    let flz_len = flz::compress_bytes(bytes).len();
    if flz_len <= cd_len {
        Alg::Flz
    } else {
        Alg::Cd
    }
}

/// Runs the full selection, encoding, and degrade-to-vanilla pipeline
/// (spec.md §4.6). The `min_size` gate is checked first and unconditionally
/// — a payload shorter than `min_size` is always sent vanilla, even with an
/// explicit `alg` override. `alg` is matched leniently (see
/// [`alg_from_str_lenient`]); pass `"auto"` for the default policy.
pub fn compress_call_data(
    to: Address,
    calldata_hex: &str,
    min_size: usize,
    alg: &str,
) -> Result<CompressedCallData, SelectError> {
    let bytes = hex::to_bytes(calldata_hex)?;
    let original_size = bytes.len();
    let requested = alg_from_str_lenient(alg);

    if original_size < min_size {
        return Ok(vanilla(to, &bytes));
    }
    if requested == Alg::Vanilla {
        return Ok(vanilla(to, &bytes));
    }

    let resolved = if requested == Alg::Auto {
        if original_size >= JIT_FORCE_THRESHOLD {
            Alg::Jit
        } else {
            auto_pick_codec(&bytes)
        }
    } else {
        requested
    };

    let (data_bytes, override_code): (Vec<u8>, String) = match resolved {
        Alg::Cd => (cd::compress_bytes(&bytes), forwarder::rle_forwarder(to)),
        Alg::Flz => (flz::compress_bytes(&bytes), forwarder::flz_forwarder(to)),
        Alg::Jit => (
            address_word_bytes(to),
            hex::to_hex(&jit::jit_bytecode_bytes(&bytes)),
        ),
        Alg::Vanilla | Alg::Auto => unreachable!("resolved above"),
    };

    let compressed_size = data_bytes.len();
    let code_size = (override_code.len() - 2) / 2;
    if compressed_size + code_size >= original_size {
        return Ok(vanilla(to, &bytes));
    }

    let bytes_saved = original_size - (compressed_size + code_size);
    let pct = if original_size == 0 {
        0.0
    } else {
        (bytes_saved as f64 / original_size as f64) * 100.0
    };

    Ok(CompressedCallData {
        to: forwarder::DECOMPRESSOR_ADDRESS,
        data: hex::to_hex(&data_bytes),
        overrides: vec![StateOverride {
            address: forwarder::DECOMPRESSOR_ADDRESS,
            code: override_code,
        }],
        meta: Meta {
            alg: resolved,
            original_size,
            compressed_size,
            code_size,
            bytes_saved,
            pct,
            benefit: true,
        },
    })
}
