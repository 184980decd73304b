mod cli;
mod config;
mod convert;
mod inventory_cmd;
mod logging;
mod output;
mod pastas_cmd;
mod regroup_cmd;
mod summary_cmd;

use std::process;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Inventory(args) => inventory_cmd::run(args),
        Command::Summary(args) => summary_cmd::run(args),
        Command::Regroup(args) => regroup_cmd::run(args),
        Command::Pastas(args) => pastas_cmd::run(args),
    }
}
