use crate::error::{AugxError, Result};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory and file constants
// ---------------------------------------------------------------------------

pub const COLLECTIONS_DIR: &str = "collections";
pub const SCREENPLAYS_DIR: &str = "screenplays";
pub const OPENSPEC_CHANGES_DIR: &str = "openspec/changes";
pub const BEADS_ISSUES_FILE: &str = ".beads/issues.jsonl";

pub const COLLECTION_MANIFEST: &str = "collection.json";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn collections_dir(root: &Path) -> PathBuf {
    root.join(COLLECTIONS_DIR)
}

pub fn collection_dir(root: &Path, name: &str) -> PathBuf {
    collections_dir(root).join(name)
}

pub fn collection_manifest(root: &Path, name: &str) -> PathBuf {
    collection_dir(root, name).join(COLLECTION_MANIFEST)
}

pub fn screenplays_dir(root: &Path) -> PathBuf {
    root.join(SCREENPLAYS_DIR)
}

pub fn openspec_changes_dir(root: &Path) -> PathBuf {
    root.join(OPENSPEC_CHANGES_DIR)
}

pub fn beads_issues_path(root: &Path) -> PathBuf {
    root.join(BEADS_ISSUES_FILE)
}

// ---------------------------------------------------------------------------
// Name validation
// ---------------------------------------------------------------------------

/// Collection and project names become directory components, so they must
/// not be empty or escape their containing directory. Anything else is
/// accepted as-is.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
    {
        return Err(AugxError::InvalidName(name.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
