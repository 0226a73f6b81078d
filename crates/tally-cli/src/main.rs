use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod bootstrap;
mod cli;
mod commands;
mod output;
mod progress;
mod ui;

use commands::shared::Interrupted;

/// Conventional status for a process stopped by SIGINT.
const EXIT_INTERRUPTED: u8 = 130;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) if error.is::<Interrupted>() => ExitCode::from(EXIT_INTERRUPTED),
        Err(error) => {
            eprintln!("tally error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let flags = cli.global_flags();
    init_tracing(&flags)?;
    ui::init(&flags);

    // Schemas describe types only and need no endpoint.
    if let cli::Commands::Schema(args) = &cli.command {
        return commands::schema::handle(args, &flags);
    }

    let config = bootstrap::load_config(&flags)?;
    commands::dispatch::dispatch(cli.command, &config, &flags).await
}

/// `TALLY_LOG` wins over the verbosity flags. Logs go to stderr so rows on
/// stdout stay pipeable.
fn init_tracing(flags: &cli::GlobalFlags) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_env("TALLY_LOG").unwrap_or_else(|_| {
        EnvFilter::new(match (flags.quiet, flags.verbose) {
            (true, _) => "error",
            (false, true) => "tally=debug,tally_feed=debug,tally_transport=debug,warn",
            (false, false) => "warn",
        })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(flags.verbose)
        .try_init()
        .map_err(|error| anyhow::anyhow!("cannot install log subscriber: {error}"))
}
