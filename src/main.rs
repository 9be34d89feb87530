//! `calldata-compress` CLI entry point.

mod cli;

use clap::Parser;

use calldata_compress::config::NotifyLevel;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    let level = if cli.quiet {
        NotifyLevel::Quiet
    } else {
        match cli.verbose {
            0 => calldata_compress::config::notify_level_default(),
            1 => NotifyLevel::Verbose,
            _ => NotifyLevel::Verbose,
        }
    };
    calldata_compress::notify::set_level(level);

    cli::run(cli)
}
