mod cli;
mod commands;

use crate::cli::{Cli, Commands};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with INFO level
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check { file, namespace } => {
            commands::check_cmd::check_application(file, namespace).await?;
        }
        Commands::Jobs { file, namespace } => {
            commands::jobs_cmd::list_jobs(file, namespace).await?;
        }
        Commands::Savepoint {
            file,
            namespace,
            trigger,
        } => {
            commands::savepoint_cmd::execute(file, namespace, trigger).await?;
        }
        Commands::Cleanup {
            file,
            namespace,
            dry_run,
        } => {
            commands::cleanup_cmd::execute(file, namespace, dry_run).await?;
        }
    }

    Ok(())
}
