//! Trellis CLI: project scaffolding and admin resource generation.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "trellis",
    version,
    about = "Project scaffolding: entity path resolution, idempotent skeletons, schema-driven admin resources"
)]
struct Cli {
    /// Environment file (default: ~/.trellis/environment.yaml)
    #[arg(long, global = true, env = "TRELLIS_CONFIG")]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: trellis::cli::Commands,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Err(e) = trellis::cli::dispatch(cli.command, cli.config.as_deref()) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
