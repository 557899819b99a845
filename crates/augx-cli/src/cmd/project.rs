use crate::output::print_json;
use anyhow::Context;
use augx_core::project::{self, ConflictStrategy, ProjectSource};
use clap::Subcommand;
use std::path::Path;
use std::str::FromStr;

#[derive(Subcommand)]
pub enum ProjectSubcommand {
    /// Resolve the project name (OpenSpec, then Beads, then timestamp)
    Resolve,
    /// Create screenplays/<name> for the resolved project
    CreateDir {
        /// Conflict handling: overwrite | append-number
        #[arg(long = "on-conflict", default_value = "overwrite")]
        on_conflict: String,
    },
}

pub fn run(root: &Path, subcmd: ProjectSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ProjectSubcommand::Resolve => resolve(root, json),
        ProjectSubcommand::CreateDir { on_conflict } => create_dir(root, &on_conflict, json),
    }
}

fn resolve(root: &Path, json: bool) -> anyhow::Result<()> {
    let info = project::resolve(root).context("failed to resolve project name")?;

    if json {
        return print_json(&info);
    }

    match &info.source {
        ProjectSource::OpenSpec { spec_id } => {
            println!("{} (openspec change {spec_id})", info.name);
        }
        ProjectSource::Beads { epic_id } => {
            println!("{} (beads epic {epic_id})", info.name);
        }
        ProjectSource::Manual => {
            println!("{} (manual fallback)", info.name);
        }
    }
    Ok(())
}

fn create_dir(root: &Path, on_conflict: &str, json: bool) -> anyhow::Result<()> {
    let strategy = ConflictStrategy::from_str(on_conflict)?;
    let info = project::resolve(root).context("failed to resolve project name")?;
    let path = project::create_project_dir(root, &info, strategy)
        .with_context(|| format!("failed to create project directory for '{}'", info.name))?;

    if json {
        print_json(&serde_json::json!({
            "project": info,
            "path": path,
        }))
    } else {
        println!("{}", path.display());
        Ok(())
    }
}
