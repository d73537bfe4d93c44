//! CLI entry point for converting images into CHR tiles and metasprites

use chrpack::io::cli::{Cli, CommandRunner};
use clap::Parser;
use env_logger::Env;

fn main() -> chrpack::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let mut runner = CommandRunner::new(cli);
    runner.process()
}
