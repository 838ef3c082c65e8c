// Mon Oct 19 2026 - Alex

pub mod args;
pub mod handler;

pub use args::{Args, OutputMode};
pub use handler::{prepare_out_path, select_domains, CommandHandler, GenerationSummary};

use clap::Parser;

pub fn parse_args() -> Args {
    Args::parse()
}

pub fn run() -> anyhow::Result<()> {
    let args = parse_args();
    let mut handler = CommandHandler::new();
    handler.execute(args)
}
