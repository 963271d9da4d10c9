use anyhow::Result;
use clap::Parser;

use floodrater::cli::{Cli, Commands};
use floodrater::commands::{analyze, inspect};

fn main() -> Result<()> {
    let cli = Cli::parse();
    match &cli.command {
        Commands::Analyze(args) => analyze::run(&cli, args),
        Commands::Inspect(args) => inspect::run(&cli, args),
    }
}
