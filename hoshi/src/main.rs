use clap::Parser;

mod cli;

#[derive(Debug, Parser)]
#[command(name = "hoshi", about = "A renju engine", version)]
struct Cli {
    #[command(subcommand)]
    command: cli::Command,
}

fn main() -> anyhow::Result<()> {
    Cli::parse().command.run()
}
