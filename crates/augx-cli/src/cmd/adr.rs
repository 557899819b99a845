use crate::output::print_json;
use anyhow::Context;
use augx_core::adr::AdrRecord;
use clap::Subcommand;
use std::path::{Path, PathBuf};

#[derive(Subcommand)]
pub enum AdrSubcommand {
    /// Validate a single ADR's required and optional metadata
    Validate {
        /// Path to a Markdown ADR with YAML frontmatter
        file: PathBuf,
    },
    /// Validate every ADR in a directory, including cross-references
    Check {
        /// Directory holding the ADR corpus
        dir: PathBuf,
    },
}

pub fn run(_root: &Path, subcmd: AdrSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        AdrSubcommand::Validate { file } => validate(&file, json),
        AdrSubcommand::Check { dir } => check(&dir, json),
    }
}

fn validate(file: &Path, json: bool) -> anyhow::Result<()> {
    let record = AdrRecord::load(file)
        .with_context(|| format!("failed to load ADR from {}", file.display()))?;

    let metadata = record.validate_metadata();
    let optional = record.validate_optional_fields();

    if json {
        print_json(&serde_json::json!({
            "file": file,
            "valid": metadata.valid,
            "errors": metadata.errors,
            "warnings": optional.warnings,
        }))?;
    } else {
        for error in &metadata.errors {
            println!("error: {error}");
        }
        for warning in &optional.warnings {
            println!("warning: {warning}");
        }
        if metadata.valid && optional.valid {
            println!("{}: ok", file.display());
        }
    }

    // Warnings are non-blocking; only required-field errors fail the command
    anyhow::ensure!(
        metadata.valid,
        "{} failed validation with {} error(s)",
        file.display(),
        metadata.errors.len()
    );
    Ok(())
}

fn check(dir: &Path, json: bool) -> anyhow::Result<()> {
    let corpus = AdrRecord::load_corpus(dir)
        .with_context(|| format!("failed to load ADR corpus from {}", dir.display()))?;

    let mut total_errors = 0usize;
    let mut total_warnings = 0usize;
    let mut results = Vec::new();

    for record in &corpus {
        let metadata = record.validate_metadata();
        let optional = record.validate_optional_fields();
        let references = record.validate_references(&corpus);

        total_errors += metadata.errors.len();
        total_warnings += optional.warnings.len() + references.warnings.len();

        let label = record.id.clone().unwrap_or_else(|| "<no id>".to_string());
        if json {
            let warnings = [optional.warnings, references.warnings].concat();
            results.push(serde_json::json!({
                "id": record.id,
                "valid": metadata.valid,
                "errors": metadata.errors,
                "warnings": warnings,
            }));
        } else {
            for error in &metadata.errors {
                println!("{label}: error: {error}");
            }
            for warning in optional.warnings.iter().chain(&references.warnings) {
                println!("{label}: warning: {warning}");
            }
        }
    }

    if json {
        print_json(&serde_json::json!({
            "records": corpus.len(),
            "errors": total_errors,
            "warnings": total_warnings,
            "results": results,
        }))?;
    } else {
        println!(
            "checked {} record(s): {} error(s), {} warning(s)",
            corpus.len(),
            total_errors,
            total_warnings
        );
    }

    anyhow::ensure!(
        total_errors == 0,
        "corpus check failed with {total_errors} error(s)"
    );
    Ok(())
}
