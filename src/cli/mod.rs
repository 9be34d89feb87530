//! CLI argument model (C10), parsed with `clap`'s derive API.
//!
//! The teacher lists `clap` as a dependency but parses argv by hand
//! (built around a specific C CLI's historical single-letter flag
//! grammar this crate has no counterpart for); this module puts that
//! dependency to its first real use instead.

mod run;

use clap::{Args, Parser, Subcommand};

pub use run::run;

#[derive(Parser)]
#[command(
    name = "calldata-compress",
    version,
    about = "Compress eth_call calldata via decompressor bytecode"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase output verbosity (repeatable: -v, -vv).
    #[arg(short = 'v', long = "verbose", global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-essential output.
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// RLE calldata codec.
    Cd {
        #[command(subcommand)]
        action: CodecAction,
    },
    /// FastLZ variant codec.
    Flz {
        #[command(subcommand)]
        action: CodecAction,
    },
    /// JIT bytecode synthesizer.
    Jit {
        #[command(subcommand)]
        action: JitAction,
    },
    /// Decompressor program templates.
    Forwarder {
        #[command(subcommand)]
        action: ForwarderAction,
    },
    /// Select and encode a compressed `eth_call`.
    Select(SelectArgs),
}

#[derive(Subcommand)]
pub enum CodecAction {
    Compress {
        /// Hex payload; reads stdin if omitted.
        #[arg(long = "in")]
        input: Option<String>,
    },
    Decompress {
        /// Hex payload; reads stdin if omitted.
        #[arg(long = "in")]
        input: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum JitAction {
    /// Synthesizes and prints the JIT bytecode for `hex`.
    Build { hex: String },
}

#[derive(Subcommand)]
pub enum ForwarderAction {
    /// Prints the RLE-forwarder template for `address`.
    Rle { address: String },
    /// Prints the FLZ-forwarder template for `address`.
    Flz { address: String },
}

#[derive(Args)]
pub struct SelectArgs {
    /// The real target contract the decompressor forwards to.
    #[arg(long)]
    pub target: String,

    /// One of auto, vanilla, cd, flz, jit.
    #[arg(long, default_value_t = calldata_compress::config::DEFAULT_ALG.to_string())]
    pub alg: String,

    /// Minimum payload size (bytes) before compression is attempted.
    #[arg(long = "min-size")]
    pub min_size: Option<usize>,

    /// The calldata to send.
    pub hex: String,
}
