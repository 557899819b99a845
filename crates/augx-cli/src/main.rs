mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{adr::AdrSubcommand, collection::CollectionSubcommand, project::ProjectSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "augx",
    about = "Manage extension collections, validate ADRs, and resolve screenplay projects",
    version
)]
struct Cli {
    /// Workspace root (default: auto-detect from collections/ or .git/)
    #[arg(long, global = true, env = "AUGX_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage collection manifests
    Collection {
        #[command(subcommand)]
        subcommand: CollectionSubcommand,
    },

    /// Validate ADR records
    Adr {
        #[command(subcommand)]
        subcommand: AdrSubcommand,
    },

    /// Resolve screenplay project names and directories
    Project {
        #[command(subcommand)]
        subcommand: ProjectSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Collection { subcommand } => cmd::collection::run(&root, subcommand, cli.json),
        Commands::Adr { subcommand } => cmd::adr::run(&root, subcommand, cli.json),
        Commands::Project { subcommand } => cmd::project::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
