use anyhow::Result;
use clap::Parser;
use gitweek::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.execute()
}
