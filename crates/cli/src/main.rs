use anyhow::Result;
use clap::Parser;
use mongfont_cli::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.init_logger();
    cli.command.run()
}
