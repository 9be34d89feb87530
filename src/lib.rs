//! `calldata-compress` — shrinks `eth_call` calldata for cheaper RPC
//! transport by pairing a smaller payload with a decompressor contract
//! injected through the provider's state-override mechanism.
//!
//! Three independent codecs do the heavy lifting ([`cd`], [`flz`], [`jit`]);
//! [`selector`] picks between them (or vanilla delivery) by payload size;
//! [`call`] drives the whole pipeline against a [`call::Provider`] or
//! [`call::AsyncProvider`]. [`forwarder`] holds the fixed decompressor
//! bytecode templates these modules inject via state override.
//!
//! The RPC transport itself, and anything resembling an on-chain assembler,
//! are out of scope — decompressor bytecode is produced and consumed as an
//! opaque byte sequence throughout.

pub mod call;
pub mod cd;
pub mod config;
pub mod flz;
pub mod forwarder;
pub mod hex;
pub mod jit;
pub mod notify;
pub mod selector;

pub use call::{AsyncProvider, BlockTag, CallError, CompressedCall, EthCallTx, Provider};
pub use cd::{cd_compress, cd_decompress, CdDecompressError, CdError};
pub use flz::{flz_compress, flz_decompress, FlzDecompressError, FlzError};
pub use forwarder::{flz_forwarder, rle_forwarder, DECOMPRESSOR_ADDRESS};
pub use hex::HexError;
pub use jit::jit_bytecode;
pub use selector::{compress_call_data, Alg, CompressedCallData, Meta, StateOverride};
