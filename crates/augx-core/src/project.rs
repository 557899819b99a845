use crate::error::{AugxError, Result};
use crate::{io, paths};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ProjectSource / ProjectInfo
// ---------------------------------------------------------------------------

/// Where a screenplay project's name came from. Ordered by preference:
/// an explicit OpenSpec change beats a Beads epic beats a timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ProjectSource {
    #[serde(rename = "openspec")]
    OpenSpec { spec_id: String },
    Beads { epic_id: String },
    Manual,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub name: String,
    #[serde(flatten)]
    pub source: ProjectSource,
}

// ---------------------------------------------------------------------------
// BeadsIssue
// ---------------------------------------------------------------------------

/// One line of `.beads/issues.jsonl`. Only epics are consulted here, but the
/// record convention carries status and labels as well.
#[derive(Debug, Clone, Deserialize)]
pub struct BeadsIssue {
    pub id: String,
    pub issue_type: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub labels: Vec<String>,
}

// ---------------------------------------------------------------------------
// Resolver strategies
// ---------------------------------------------------------------------------

/// First change directory under `<root>/openspec/changes/`, if any.
/// Directory names are sorted so "first" is deterministic. A missing or
/// empty tree is not an error.
pub fn from_openspec(root: &Path) -> Result<Option<ProjectInfo>> {
    let changes = paths::openspec_changes_dir(root);
    if !changes.is_dir() {
        return Ok(None);
    }

    let mut names = Vec::new();
    for entry in std::fs::read_dir(&changes)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();

    Ok(names.into_iter().next().map(|name| ProjectInfo {
        name: name.clone(),
        source: ProjectSource::OpenSpec { spec_id: name },
    }))
}

/// First epic in `<root>/.beads/issues.jsonl`, if any. Malformed lines are
/// skipped with a warning rather than aborting resolution.
pub fn from_beads(root: &Path) -> Result<Option<ProjectInfo>> {
    let issues = paths::beads_issues_path(root);
    if !issues.is_file() {
        return Ok(None);
    }

    let data = std::fs::read_to_string(&issues)?;
    for line in data.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<BeadsIssue>(line) {
            Ok(issue) if issue.issue_type == "epic" => {
                return Ok(Some(ProjectInfo {
                    name: issue.id.clone(),
                    source: ProjectSource::Beads { epic_id: issue.id },
                }));
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(path = %issues.display(), error = %e, "skipping malformed beads issue line");
            }
        }
    }
    Ok(None)
}

/// Resolve a project name: OpenSpec, then Beads, then a manual fallback of
/// the form `screenplay-YYYY-MM-DD` from the current date.
pub fn resolve(root: &Path) -> Result<ProjectInfo> {
    if let Some(info) = from_openspec(root)? {
        return Ok(info);
    }
    if let Some(info) = from_beads(root)? {
        return Ok(info);
    }
    Ok(ProjectInfo {
        name: format!("screenplay-{}", Local::now().format("%Y-%m-%d")),
        source: ProjectSource::Manual,
    })
}

// ---------------------------------------------------------------------------
// Project directory creation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictStrategy {
    /// Reuse an existing directory at the target path.
    #[default]
    Overwrite,
    /// Probe `<name>-1`, `<name>-2`, ... until an unused path is found.
    AppendNumber,
}

impl std::str::FromStr for ConflictStrategy {
    type Err = AugxError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "overwrite" => Ok(ConflictStrategy::Overwrite),
            "append-number" => Ok(ConflictStrategy::AppendNumber),
            _ => Err(AugxError::InvalidConflictStrategy(s.to_string())),
        }
    }
}

/// Create `<root>/screenplays/<name>` and return the resolved path.
pub fn create_project_dir(
    root: &Path,
    info: &ProjectInfo,
    strategy: ConflictStrategy,
) -> Result<PathBuf> {
    paths::validate_name(&info.name)?;
    let base = paths::screenplays_dir(root).join(&info.name);

    let target = match strategy {
        ConflictStrategy::Overwrite => base,
        ConflictStrategy::AppendNumber => {
            if !base.exists() {
                base
            } else {
                let mut n = 1u32;
                loop {
                    let candidate =
                        paths::screenplays_dir(root).join(format!("{}-{n}", info.name));
                    if !candidate.exists() {
                        break candidate;
                    }
                    n += 1;
                }
            }
        }
    };

    io::ensure_dir(&target)?;
    Ok(target)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
