//! tmpwatch CLI - deletes temporary files as they appear

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

mod cmd;
mod system_config;
mod util;

use system_config::Overrides;

/// tmpwatch - Watch a folder and delete temporary files as they appear
#[derive(Parser)]
#[command(name = "tmpwatch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (default: <config dir>/tmpwatch/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print diagnostics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch a directory and delete matching files until you quit
    Watch {
        #[command(flatten)]
        target: TargetArgs,
        /// Delay before deleting a new file, in milliseconds (default: 100)
        #[arg(long)]
        grace_ms: Option<u64>,
        /// Delete matching files that already exist before watching
        #[arg(long)]
        sweep_existing: bool,
        /// Don't echo log lines to stdout
        #[arg(short, long)]
        quiet: bool,
    },
    /// Delete matching files that already exist, then exit
    Sweep {
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Show recent log entries
    Log {
        /// Log file (default: from config)
        #[arg(long)]
        log: Option<PathBuf>,
        /// Number of entries to show
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    /// Show the config file location or an example config
    Config {
        /// Create the config file with defaults if missing
        #[arg(long)]
        create: bool,
        /// Print an example config
        #[arg(long)]
        example: bool,
    },
}

/// Where to look, what to match, where to log
#[derive(Args)]
struct TargetArgs {
    /// Directory to watch (default: <Documents>/TempFilesWatch)
    #[arg(long)]
    dir: Option<PathBuf>,
    /// File-name glob (default: *.tmp)
    #[arg(long)]
    pattern: Option<String>,
    /// Log file (default: <Documents>/file_watcher.log)
    #[arg(long)]
    log: Option<PathBuf>,
}

impl TargetArgs {
    fn into_overrides(self, grace_ms: Option<u64>) -> Overrides {
        Overrides {
            dir: self.dir,
            pattern: self.pattern,
            log_file: self.log,
            grace_ms,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Diagnostics go to stderr; stdout carries the event log mirror
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Watch { target, grace_ms, sweep_existing, quiet } => {
            let config = system_config::load(cli.config.as_deref())?;
            let settings = config.resolve(&target.into_overrides(grace_ms))?;
            cmd::watch::run(settings, sweep_existing, quiet).await
        }
        Commands::Sweep { target } => {
            let config = system_config::load(cli.config.as_deref())?;
            let settings = config.resolve(&target.into_overrides(None))?;
            cmd::sweep::run(settings).await
        }
        Commands::Log { log, limit } => {
            let config = system_config::load(cli.config.as_deref())?;
            let settings = config.resolve(&Overrides { log_file: log, ..Overrides::default() })?;
            cmd::log::run(&settings.log_file, limit).await
        }
        Commands::Config { create, example } => {
            if example {
                cmd::config::run_example().await
            } else {
                cmd::config::run_path(create).await
            }
        }
    }
}
