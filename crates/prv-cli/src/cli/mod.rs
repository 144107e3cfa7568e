//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use prv_core::config::{self, Config};
use prv_core::interrupt;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "prv")]
#[command(version = "0.1")]
#[command(about = "Terminal client for the Proover evaluator")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override the evaluator base URL from config
    #[arg(long, value_name = "URL", global = true)]
    backend_url: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Evaluate one command and print the response
    Eval {
        /// The command to send to the evaluator
        #[arg(value_name = "COMMAND")]
        command: String,

        /// Stream raw response text without typesetting
        #[arg(long)]
        raw: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Persist the evaluator base URL to the config file
    SetUrl {
        #[arg(value_name = "URL")]
        url: String,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    interrupt::init();
    let _log_guard = init_logging();
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "prv starting");

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let config = Config::load().context("load config")?;
    let backend_override = cli.backend_url.as_deref();

    // default to the interactive session
    let Some(command) = cli.command else {
        return prv_tui::run_session(config, backend_override).await;
    };

    match command {
        Commands::Eval { command, raw } => {
            commands::eval::run(commands::eval::EvalOptions {
                command: &command,
                raw,
                config: &config,
                backend_override,
            })
            .await
        }

        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::SetUrl { url } => commands::config::set_url(&url),
        },
    }
}

/// Logs go to a file only; stdout belongs to the TUI and to `eval` output.
/// If the log directory cannot be created, prefer no logs over corrupting
/// the screen.
fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_env("PRV_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    let logs_dir = config::paths::logs_dir();
    std::fs::create_dir_all(&logs_dir).ok()?;

    let appender = tracing_appender::rolling::daily(logs_dir, "prv.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Some(guard)
}
