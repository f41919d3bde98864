use clap::Parser;
use llm_replay_cache::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Inspect(args) => cli::inspect::run(args).await,
        Command::Clear => cli::clear::run().await,
    }
}
