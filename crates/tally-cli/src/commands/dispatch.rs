use tally_config::TallyConfig;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    config: &TallyConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Probe => commands::probe::handle(config, flags).await,
        Commands::Browse(args) => commands::browse::handle(&args, config, flags).await,
        Commands::Watch(args) => commands::watch::handle(&args, config, flags).await,
        Commands::Upload(args) => commands::upload::handle(&args, config, flags).await,
        Commands::Schema(args) => commands::schema::handle(&args, flags),
    }
}
