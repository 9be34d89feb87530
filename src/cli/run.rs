//! CLI dispatch: turns a parsed [`super::Cli`] into stdout output.

use std::io::{self, Read};

use alloy_primitives::Address;
use anyhow::{bail, Context, Result};

use calldata_compress::{cd, flz, forwarder, jit, selector};

use super::{Cli, CodecAction, Command, ForwarderAction, JitAction, SelectArgs};

/// Reads `input` if given, else all of stdin, trimming trailing whitespace.
fn read_input(input: Option<String>) -> Result<String> {
    match input {
        Some(s) => Ok(s),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading calldata from stdin")?;
            Ok(buf.trim().to_string())
        }
    }
}

fn parse_address(s: &str) -> Result<Address> {
    s.parse::<Address>()
        .with_context(|| format!("invalid address: {s}"))
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Cd { action } => match action {
            CodecAction::Compress { input } => {
                let data = read_input(input)?;
                let out = cd::cd_compress(&data).map_err(|e| anyhow::anyhow!("{e}"))?;
                println!("{out}");
                Ok(())
            }
            CodecAction::Decompress { input } => {
                let data = read_input(input)?;
                let out = cd::cd_decompress(&data).map_err(|e| anyhow::anyhow!("{e}"))?;
                println!("{out}");
                Ok(())
            }
        },
        Command::Flz { action } => match action {
            CodecAction::Compress { input } => {
                let data = read_input(input)?;
                let out = flz::flz_compress(&data).map_err(|e| anyhow::anyhow!("{e}"))?;
                println!("{out}");
                Ok(())
            }
            CodecAction::Decompress { input } => {
                let data = read_input(input)?;
                let out = flz::flz_decompress(&data).map_err(|e| anyhow::anyhow!("{e}"))?;
                println!("{out}");
                Ok(())
            }
        },
        Command::Jit { action } => run_jit(action),
        Command::Forwarder { action } => run_forwarder(action),
        Command::Select(args) => run_select(args),
    }
}

fn run_jit(action: JitAction) -> Result<()> {
    let JitAction::Build { hex: data } = action;
    let out = jit::jit_bytecode(&data).map_err(|e| anyhow::anyhow!("{e}"))?;
    println!("{out}");
    Ok(())
}

fn run_forwarder(action: ForwarderAction) -> Result<()> {
    let code = match action {
        ForwarderAction::Rle { address } => forwarder::rle_forwarder(parse_address(&address)?),
        ForwarderAction::Flz { address } => forwarder::flz_forwarder(parse_address(&address)?),
    };
    println!("{code}");
    Ok(())
}

fn run_select(args: SelectArgs) -> Result<()> {
    let target = parse_address(&args.target)?;
    let min_size = args
        .min_size
        .unwrap_or_else(calldata_compress::config::min_size_default);

    let planned = selector::compress_call_data(target, &args.hex, min_size, &args.alg);
    let planned = match planned {
        Ok(p) => p,
        Err(e) => bail!("{e}"),
    };

    let overrides: Vec<_> = planned
        .overrides
        .iter()
        .map(|o| {
            serde_json::json!({
                "address": o.address.to_string(),
                "code": o.code,
            })
        })
        .collect();

    let out = serde_json::json!({
        "to": planned.to.to_string(),
        "data": planned.data,
        "override": overrides,
        "meta": {
            "alg": planned.meta.alg.to_string(),
            "sizes": {
                "original": planned.meta.original_size,
                "compressed": planned.meta.compressed_size,
                "code": planned.meta.code_size,
            },
            "benefit": {
                "bytes_saved": planned.meta.bytes_saved,
                "pct": planned.meta.pct,
            },
        }
    });
    println!("{out}");
    Ok(())
}
