use crate::error::{AugxError, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ManifestKind
// ---------------------------------------------------------------------------

/// Tag distinguishing collection manifests from module manifests elsewhere
/// in the ecosystem. A `collection.json` always carries `Collection`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestKind {
    Collection,
    Module,
}

// ---------------------------------------------------------------------------
// ModuleRef
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRef {
    /// Module id, conventionally `<category>/<name>`.
    pub id: String,
    /// Semver range the collection accepts for this module.
    pub version: String,
    pub required: bool,
}

impl ModuleRef {
    pub const DEFAULT_VERSION_RANGE: &'static str = "^1.0.0";

    /// A required reference accepting the default version range.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: Self::DEFAULT_VERSION_RANGE.to_string(),
            required: true,
        }
    }

    pub fn with_version(id: impl Into<String>, version: impl Into<String>, required: bool) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
            required,
        }
    }
}

// ---------------------------------------------------------------------------
// Collection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    pub name: String,
    pub version: String,
    #[serde(rename = "type")]
    pub kind: ManifestKind,
    #[serde(
        rename = "displayName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub modules: Vec<ModuleRef>,
}

#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    /// Manifest version; defaults to `1.0.0`.
    pub version: Option<String>,
    /// Human-readable title; defaults to a title-cased `name`.
    pub display_name: Option<String>,
    pub description: Option<String>,
    /// Module ids to seed the collection with, each wrapped as a required
    /// reference at the default version range.
    pub modules: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MetadataUpdate {
    pub version: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,
}

impl MetadataUpdate {
    pub fn is_empty(&self) -> bool {
        self.version.is_none() && self.display_name.is_none() && self.description.is_none()
    }
}

/// Derive a display name from a collection name: `adr-tools` → `Adr Tools`.
pub fn title_case(name: &str) -> String {
    name.split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl Collection {
    pub fn new(name: impl Into<String>, options: CreateOptions) -> Self {
        let name = name.into();
        let display_name = options
            .display_name
            .unwrap_or_else(|| title_case(&name));
        Self {
            name,
            version: options.version.unwrap_or_else(|| "1.0.0".to_string()),
            kind: ManifestKind::Collection,
            display_name: Some(display_name),
            description: options.description,
            modules: options.modules.into_iter().map(ModuleRef::new).collect(),
        }
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    /// Create `<root>/collections/<name>/collection.json`.
    ///
    /// An existing manifest at the same path is silently overwritten; callers
    /// wanting protection must check for it first. Duplicate-name detection
    /// is intentionally not enforced here.
    pub fn create(root: &Path, name: &str, options: CreateOptions) -> Result<Self> {
        paths::validate_name(name)?;
        let collection = Self::new(name, options);
        collection.save(root)?;
        Ok(collection)
    }

    pub fn load(root: &Path, name: &str) -> Result<Self> {
        let manifest = paths::collection_manifest(root, name);
        if !manifest.exists() {
            return Err(AugxError::CollectionNotFound(name.to_string()));
        }
        let data = std::fs::read_to_string(&manifest)?;
        let collection: Collection = serde_json::from_str(&data)?;
        Ok(collection)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let manifest = paths::collection_manifest(root, &self.name);
        let mut data = serde_json::to_string_pretty(self)?;
        data.push('\n');
        crate::io::atomic_write(&manifest, data.as_bytes())
    }

    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let collections_dir = paths::collections_dir(root);
        if !collections_dir.exists() {
            return Ok(Vec::new());
        }

        let mut collections = Vec::new();
        for entry in std::fs::read_dir(&collections_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                let name = entry.file_name().to_string_lossy().into_owned();
                match Self::load(root, &name) {
                    Ok(c) => collections.push(c),
                    Err(AugxError::CollectionNotFound(_)) => {}
                    Err(e) => return Err(e),
                }
            }
        }
        collections.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(collections)
    }

    /// Remove the collection's directory recursively. Idempotent: an absent
    /// path is not an error. Referenced modules are independently owned and
    /// are not touched.
    pub fn delete(root: &Path, name: &str) -> Result<()> {
        let dir = paths::collection_dir(root, name);
        match std::fs::remove_dir_all(&dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn manifest_path(root: &Path, name: &str) -> PathBuf {
        paths::collection_manifest(root, name)
    }

    // ---------------------------------------------------------------------------
    // Module mutations
    // ---------------------------------------------------------------------------

    /// Append a module reference unconditionally. Duplicate ids are allowed
    /// by the format: differing version ranges for one id may coexist, so
    /// de-duplication is left to callers that want it.
    pub fn add_module(&mut self, module: ModuleRef) {
        self.modules.push(module);
    }

    /// Remove every entry with the given id (not just the first).
    /// Returns the number of entries removed.
    pub fn remove_module(&mut self, module_id: &str) -> usize {
        let before = self.modules.len();
        self.modules.retain(|m| m.id != module_id);
        before - self.modules.len()
    }

    pub fn has_module(&self, module_id: &str) -> bool {
        self.modules.iter().any(|m| m.id == module_id)
    }

    // ---------------------------------------------------------------------------
    // Metadata mutations
    // ---------------------------------------------------------------------------

    /// Merge top-level metadata fields. Never touches `modules`.
    pub fn update_metadata(&mut self, update: MetadataUpdate) {
        if let Some(version) = update.version {
            self.version = version;
        }
        if let Some(display_name) = update.display_name {
            self.display_name = Some(display_name);
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn create_with_defaults() {
        let dir = TempDir::new().unwrap();
        let collection =
            Collection::create(dir.path(), "adr-tools", CreateOptions::default()).unwrap();
        assert_eq!(collection.version, "1.0.0");
        assert_eq!(collection.kind, ManifestKind::Collection);
        assert_eq!(collection.display_name.as_deref(), Some("Adr Tools"));
        assert!(collection.modules.is_empty());
        assert!(dir
            .path()
            .join("collections/adr-tools/collection.json")
            .exists());
    }

    #[test]
    fn create_round_trip_with_modules() {
        let dir = TempDir::new().unwrap();
        Collection::create(
            dir.path(),
            "frontend",
            CreateOptions {
                modules: vec!["a/b".to_string(), "c/d".to_string()],
                ..Default::default()
            },
        )
        .unwrap();

        let loaded = Collection::load(dir.path(), "frontend").unwrap();
        assert_eq!(loaded.modules.len(), 2);
        assert_eq!(loaded.modules[0].id, "a/b");
        assert_eq!(loaded.modules[1].id, "c/d");
        for m in &loaded.modules {
            assert_eq!(m.version, "^1.0.0");
            assert!(m.required);
        }
    }

    #[test]
    fn create_overwrites_existing() {
        let dir = TempDir::new().unwrap();
        Collection::create(
            dir.path(),
            "frontend",
            CreateOptions {
                modules: vec!["a/b".to_string()],
                ..Default::default()
            },
        )
        .unwrap();
        // Same name again: silently replaces, no error
        Collection::create(dir.path(), "frontend", CreateOptions::default()).unwrap();
        let loaded = Collection::load(dir.path(), "frontend").unwrap();
        assert!(loaded.modules.is_empty());
    }

    #[test]
    fn create_invalid_name_fails() {
        let dir = TempDir::new().unwrap();
        assert!(Collection::create(dir.path(), "../escape", CreateOptions::default()).is_err());
    }

    #[test]
    fn load_missing_is_not_found() {
        let dir = TempDir::new().unwrap();
        match Collection::load(dir.path(), "absent") {
            Err(AugxError::CollectionNotFound(name)) => assert_eq!(name, "absent"),
            other => panic!("expected CollectionNotFound, got {other:?}"),
        }
    }

    #[test]
    fn manifest_is_pretty_printed_json() {
        let dir = TempDir::new().unwrap();
        Collection::create(dir.path(), "frontend", CreateOptions::default()).unwrap();
        let raw =
            std::fs::read_to_string(dir.path().join("collections/frontend/collection.json"))
                .unwrap();
        assert!(raw.contains("\n  \"name\": \"frontend\""));
        assert!(raw.contains("\"type\": \"collection\""));
        assert!(raw.contains("\"displayName\": \"Frontend\""));
        assert!(raw.ends_with('\n'));
    }

    #[test]
    fn add_module_allows_duplicates() {
        let mut collection = Collection::new("frontend", CreateOptions::default());
        collection.add_module(ModuleRef::new("a/b"));
        collection.add_module(ModuleRef::with_version("a/b", "^2.0.0", false));
        assert_eq!(collection.modules.len(), 2);
        assert_eq!(collection.modules[1].version, "^2.0.0");
    }

    #[test]
    fn remove_module_removes_all_matching() {
        let mut collection = Collection::new("frontend", CreateOptions::default());
        collection.add_module(ModuleRef::new("a/b"));
        collection.add_module(ModuleRef::with_version("a/b", "^2.0.0", false));
        collection.add_module(ModuleRef::new("c/d"));

        let removed = collection.remove_module("a/b");
        assert_eq!(removed, 2);
        assert_eq!(collection.modules.len(), 1);
        assert_eq!(collection.modules[0].id, "c/d");
    }

    #[test]
    fn remove_module_missing_is_noop() {
        let mut collection = Collection::new("frontend", CreateOptions::default());
        collection.add_module(ModuleRef::new("a/b"));
        assert_eq!(collection.remove_module("x/y"), 0);
        assert_eq!(collection.modules.len(), 1);
    }

    #[test]
    fn update_metadata_leaves_modules_alone() {
        let mut collection = Collection::new(
            "frontend",
            CreateOptions {
                modules: vec!["a/b".to_string()],
                ..Default::default()
            },
        );
        collection.update_metadata(MetadataUpdate {
            version: Some("2.0.0".to_string()),
            display_name: None,
            description: Some("UI modules".to_string()),
        });
        assert_eq!(collection.version, "2.0.0");
        // Unset fields keep their previous values
        assert_eq!(collection.display_name.as_deref(), Some("Frontend"));
        assert_eq!(collection.description.as_deref(), Some("UI modules"));
        assert_eq!(collection.modules.len(), 1);
    }

    #[test]
    fn delete_is_idempotent() {
        let dir = TempDir::new().unwrap();
        Collection::create(dir.path(), "frontend", CreateOptions::default()).unwrap();
        Collection::delete(dir.path(), "frontend").unwrap();
        assert!(!dir.path().join("collections/frontend").exists());
        // Deleting again is fine
        Collection::delete(dir.path(), "frontend").unwrap();
    }

    #[test]
    fn list_skips_dirs_without_manifest() {
        let dir = TempDir::new().unwrap();
        Collection::create(dir.path(), "zeta", CreateOptions::default()).unwrap();
        Collection::create(dir.path(), "alpha", CreateOptions::default()).unwrap();
        std::fs::create_dir_all(dir.path().join("collections/not-a-collection")).unwrap();

        let collections = Collection::list(dir.path()).unwrap();
        let names: Vec<&str> = collections.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn list_empty_root() {
        let dir = TempDir::new().unwrap();
        assert!(Collection::list(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn title_case_variants() {
        assert_eq!(title_case("adr-tools"), "Adr Tools");
        assert_eq!(title_case("my_collection"), "My Collection");
        assert_eq!(title_case("frontend"), "Frontend");
        assert_eq!(title_case("a--b"), "A B");
    }

    #[test]
    fn modules_default_when_absent_in_json() {
        // A manifest written without a modules key still parses to an empty
        // array, never null.
        let raw = r#"{"name":"x","version":"1.0.0","type":"collection"}"#;
        let collection: Collection = serde_json::from_str(raw).unwrap();
        assert!(collection.modules.is_empty());
    }

    #[test]
    fn rejects_wrong_type_tag() {
        let raw = r#"{"name":"x","version":"1.0.0","type":"widget"}"#;
        assert!(serde_json::from_str::<Collection>(raw).is_err());
    }
}
