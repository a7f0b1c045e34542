use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use config::Overrides;

#[derive(Parser)]
#[command(name = "vendor-prep", version)]
#[command(about = "Provision vendored MinGit and GnuPG for the build", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct GlobalArgs {
    /// Vendor root directory (default: ./vendor)
    #[arg(long, global = true)]
    root: Option<String>,
    /// Config file (default: ./vendor-prep.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Override the MinGit archive URL
    #[arg(long, global = true)]
    mingit_url: Option<String>,
    /// Overall request timeout in seconds (0 disables it)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Download and extract every vendored tool (default)
    Prepare,
    /// Show what is already provisioned without changing anything
    Status,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("vendor-prep: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let settings = config::resolve_settings(Overrides {
        config: cli.global.config,
        root: cli.global.root,
        mingit_url: cli.global.mingit_url,
        timeout_secs: cli.global.timeout_secs,
    })?;

    match cli.command.unwrap_or(Commands::Prepare) {
        Commands::Prepare => commands::prepare::exec(&settings).await,
        Commands::Status => commands::status::exec(&settings),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
