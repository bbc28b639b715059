use clap::Parser;
use tracing_subscriber::EnvFilter;

mod catalog;
mod cli;
mod core;
mod matching;
mod output;
mod parsing;
mod pipeline;
mod search;
mod utils;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("cog_classifier=debug,info")
    } else {
        EnvFilter::new("cog_classifier=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let layout = cli.layout();
    match cli.command {
        cli::Commands::Classify(args) => {
            cli::classify::run(args, layout, cli.verbose)?;
        }
        cli::Commands::Report(args) => {
            cli::report::run(args, cli.verbose)?;
        }
        cli::Commands::Info => {
            cli::info::run(layout, cli.verbose)?;
        }
        cli::Commands::Prepare(args) => {
            cli::prepare::run(args, layout, cli.verbose)?;
        }
        cli::Commands::Search(args) => {
            cli::search::run(args, layout, cli.verbose)?;
        }
    }

    Ok(())
}
