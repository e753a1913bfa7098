//! blockMeshDict command line tool.
//!
//! Reads a JSON or TOML mesh description, validates it, and writes the
//! dictionary consumed by OpenFOAM's `blockMesh`.

mod commands;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Render and check blockMeshDict files.
#[derive(Parser)]
#[command(name = "blockmesh")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Render block-structured hex meshes as blockMeshDict files", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, default_value = "warn")]
    log_level: String,

    /// Output format for results
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Suppress all non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a blockMeshDict from a mesh description
    Render(commands::render::RenderArgs),
    /// Validate a mesh description and report topology findings
    Check(commands::check::CheckArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Render(args) => commands::render::execute(args, cli.format, cli.quiet),
        Commands::Check(args) => commands::check::execute(args, cli.format, cli.quiet),
    }
}
