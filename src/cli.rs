use clap::{Parser, Subcommand};

/// Flink application reconciler CLI.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// The subcommands supported by the CLI.
#[derive(Subcommand)]
pub enum Commands {
    /// Compare a FlinkApplication with what is deployed and report readiness.
    Check {
        /// Path to the FlinkApplication manifest (YAML).
        #[arg(short, long)]
        file: String,

        /// Override the namespace from the manifest.
        #[arg(long, short)]
        namespace: Option<String>,
    },

    /// List the jobs on the application's job manager.
    Jobs {
        /// Path to the FlinkApplication manifest (YAML).
        #[arg(short, long)]
        file: String,

        /// Override the namespace from the manifest.
        #[arg(long, short)]
        namespace: Option<String>,
    },

    /// Trigger or poll a cancel-with-savepoint for the recorded job.
    Savepoint {
        /// Path to the FlinkApplication manifest (YAML).
        #[arg(short, long)]
        file: String,

        /// Override the namespace from the manifest.
        #[arg(long, short)]
        namespace: Option<String>,

        /// Cancel the job behind a new savepoint instead of polling the pending one.
        #[arg(long, default_value_t = false)]
        trigger: bool,
    },

    /// Delete clusters left behind by previous images.
    Cleanup {
        /// Path to the FlinkApplication manifest (YAML).
        #[arg(short, long)]
        file: String,

        /// Override the namespace from the manifest.
        #[arg(long, short)]
        namespace: Option<String>,

        /// Only report whether stale clusters exist.
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
}
