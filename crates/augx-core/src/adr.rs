use crate::error::{AugxError, Result};
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// AdrStatus
// ---------------------------------------------------------------------------

/// Lifecycle states for an architecture decision record. Records move
/// forward through these and are terminated by `Superseded` or `Sunset`;
/// superseded records are flagged and cross-linked, never deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdrStatus {
    Draft,
    Proposed,
    Approved,
    Implemented,
    Maintained,
    Superseded,
    Sunset,
}

impl AdrStatus {
    pub fn all() -> &'static [AdrStatus] {
        &[
            AdrStatus::Draft,
            AdrStatus::Proposed,
            AdrStatus::Approved,
            AdrStatus::Implemented,
            AdrStatus::Maintained,
            AdrStatus::Superseded,
            AdrStatus::Sunset,
        ]
    }

    /// Returns true if the given string is a valid status name.
    pub fn is_valid(s: &str) -> bool {
        Self::all().iter().any(|st| st.as_str() == s)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AdrStatus::Draft => "draft",
            AdrStatus::Proposed => "proposed",
            AdrStatus::Approved => "approved",
            AdrStatus::Implemented => "implemented",
            AdrStatus::Maintained => "maintained",
            AdrStatus::Superseded => "superseded",
            AdrStatus::Sunset => "sunset",
        }
    }
}

impl fmt::Display for AdrStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AdrStatus {
    type Err = AugxError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "draft" => Ok(AdrStatus::Draft),
            "proposed" => Ok(AdrStatus::Proposed),
            "approved" => Ok(AdrStatus::Approved),
            "implemented" => Ok(AdrStatus::Implemented),
            "maintained" => Ok(AdrStatus::Maintained),
            "superseded" => Ok(AdrStatus::Superseded),
            "sunset" => Ok(AdrStatus::Sunset),
            _ => Err(AugxError::InvalidStatus(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Id and date patterns
// ---------------------------------------------------------------------------

static ADR_ID_RE: OnceLock<Regex> = OnceLock::new();
static DATE_RE: OnceLock<Regex> = OnceLock::new();

fn adr_id_re() -> &'static Regex {
    ADR_ID_RE.get_or_init(|| Regex::new(r"^adr-\d{4}$").unwrap())
}

fn date_re() -> &'static Regex {
    DATE_RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap())
}

pub fn is_valid_adr_id(id: &str) -> bool {
    adr_id_re().is_match(id)
}

/// Strict `YYYY-MM-DD` validation: the string must be lexically well-formed
/// and denote a real calendar date. `2024-02-30` is rejected even though it
/// matches the pattern.
pub fn is_valid_iso8601(date: &str) -> bool {
    if !date_re().is_match(date) {
        return false;
    }
    let (Ok(year), Ok(month), Ok(day)) = (
        date[0..4].parse::<i32>(),
        date[5..7].parse::<u32>(),
        date[8..10].parse::<u32>(),
    ) else {
        return false;
    };
    NaiveDate::from_ymd_opt(year, month, day).is_some()
}

// ---------------------------------------------------------------------------
// AdrRecord
// ---------------------------------------------------------------------------

/// An ADR's parsed metadata. Required fields are `Option` so that a record
/// missing them can still be represented and reported on; the validators
/// below turn absences into accumulated errors rather than parse failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdrRecord {
    pub id: Option<String>,
    pub title: Option<String>,
    pub status: Option<String>,
    pub date: Option<String>,
    pub deciders: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub supersedes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub superseded_by: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related_decisions: Vec<String>,
}

// ---------------------------------------------------------------------------
// Validation reports
// ---------------------------------------------------------------------------

/// Blocking result of required-field validation. Every violated rule is
/// accumulated; `valid` is true iff `errors` is empty.
#[derive(Debug, Clone, Serialize)]
pub struct MetadataReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Non-blocking result of optional-field and cross-reference validation.
/// Problems here should surface for human review without rejecting the
/// record, e.g. while it is still being drafted.
#[derive(Debug, Clone, Serialize)]
pub struct ReferenceReport {
    pub valid: bool,
    pub warnings: Vec<String>,
}

impl AdrRecord {
    /// Check required-field presence and format. Violations never
    /// short-circuit: a record missing both date and deciders reports both.
    pub fn validate_metadata(&self) -> MetadataReport {
        let mut errors = Vec::new();

        match &self.id {
            None => errors.push("missing required field: id".to_string()),
            Some(id) if !is_valid_adr_id(id) => {
                errors.push(format!("id '{id}' does not match the adr-NNNN pattern"));
            }
            Some(_) => {}
        }

        match &self.title {
            None => errors.push("missing required field: title".to_string()),
            Some(title) => {
                let len = title.chars().count();
                if !(10..=100).contains(&len) {
                    errors.push(format!(
                        "title must be 10-100 characters, got {len}"
                    ));
                }
            }
        }

        match &self.status {
            None => errors.push("missing required field: status".to_string()),
            Some(status) if !AdrStatus::is_valid(status) => {
                errors.push(format!(
                    "invalid status '{status}': expected one of draft, proposed, approved, \
                     implemented, maintained, superseded, sunset"
                ));
            }
            Some(_) => {}
        }

        match &self.date {
            None => errors.push("missing required field: date".to_string()),
            Some(date) if !is_valid_iso8601(date) => {
                errors.push(format!(
                    "date '{date}' is not a valid ISO-8601 calendar date (YYYY-MM-DD)"
                ));
            }
            Some(_) => {}
        }

        if self.deciders.is_empty() {
            errors.push("deciders must be a non-empty list".to_string());
        }

        MetadataReport {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// Format checks on optional fields, downgraded to warnings so a
    /// malformed optional field never blocks acceptance. Array-shape
    /// enforcement happens at the serde decode boundary, so only ADR-id
    /// patterns are checked here.
    pub fn validate_optional_fields(&self) -> ReferenceReport {
        let mut warnings = Vec::new();

        for id in &self.supersedes {
            if !is_valid_adr_id(id) {
                warnings.push(format!(
                    "supersedes entry '{id}' does not match the adr-NNNN pattern"
                ));
            }
        }
        if let Some(id) = &self.superseded_by {
            if !is_valid_adr_id(id) {
                warnings.push(format!(
                    "superseded_by '{id}' does not match the adr-NNNN pattern"
                ));
            }
        }
        for id in &self.related_decisions {
            if !is_valid_adr_id(id) {
                warnings.push(format!(
                    "related_decisions entry '{id}' does not match the adr-NNNN pattern"
                ));
            }
        }

        ReferenceReport {
            valid: warnings.is_empty(),
            warnings,
        }
    }

    /// Check that every cross-referenced id resolves to a record in the
    /// known corpus. One warning per unresolved occurrence. The validator
    /// does no I/O: the caller supplies the corpus.
    pub fn validate_references(&self, known: &[AdrRecord]) -> ReferenceReport {
        let known_ids: HashSet<&str> = known
            .iter()
            .filter_map(|r| r.id.as_deref())
            .collect();

        let mut warnings = Vec::new();
        let mut check = |field: &str, id: &str| {
            if !known_ids.contains(id) {
                warnings.push(format!("{field} references '{id}' which does not exist"));
            }
        };

        for id in &self.supersedes {
            check("supersedes", id);
        }
        if let Some(id) = &self.superseded_by {
            check("superseded_by", id);
        }
        for id in &self.related_decisions {
            check("related_decisions", id);
        }

        ReferenceReport {
            valid: warnings.is_empty(),
            warnings,
        }
    }

    // ---------------------------------------------------------------------------
    // Frontmatter loading
    // ---------------------------------------------------------------------------

    /// Parse a record from a Markdown document's leading `---` YAML
    /// frontmatter block. Unknown frontmatter keys are ignored.
    pub fn from_markdown(content: &str) -> Result<Self> {
        let frontmatter = extract_frontmatter(content).ok_or(AugxError::MissingFrontmatter)?;
        let record: AdrRecord = serde_yaml::from_str(&frontmatter)?;
        Ok(record)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_markdown(&content)
    }

    /// Load every `*.md` record in a directory, skipping files whose
    /// frontmatter is absent or unparseable. Missing directory yields an
    /// empty corpus.
    pub fn load_corpus(dir: &Path) -> Result<Vec<Self>> {
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }
            match Self::load(&path) {
                Ok(record) => records.push(record),
                Err(AugxError::Io(e)) => return Err(AugxError::Io(e)),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unparseable ADR");
                }
            }
        }
        records.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(records)
    }
}

fn extract_frontmatter(content: &str) -> Option<String> {
    let mut lines = content.lines();
    if lines.next()?.trim_end() != "---" {
        return None;
    }
    let mut block = Vec::new();
    for line in lines {
        if line.trim_end() == "---" {
            return Some(block.join("\n"));
        }
        block.push(line);
    }
    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_record() -> AdrRecord {
        AdrRecord {
            id: Some("adr-0001".to_string()),
            title: Some("Adopt event sourcing".to_string()),
            status: Some("approved".to_string()),
            date: Some("2024-02-29".to_string()),
            deciders: vec!["alice".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn iso8601_accepts_real_dates() {
        for date in ["2024-01-01", "2024-02-29", "2023-12-31", "2000-02-29"] {
            assert!(is_valid_iso8601(date), "expected valid: {date}");
        }
    }

    #[test]
    fn iso8601_rejects_calendar_invalid() {
        for date in ["2024-02-30", "2024-13-01", "2024-00-01", "2023-02-29", "2024-04-31"] {
            assert!(!is_valid_iso8601(date), "expected invalid: {date}");
        }
    }

    #[test]
    fn iso8601_rejects_lexically_malformed() {
        for date in ["2024/01/01", "2024-1-1", "24-01-01", "2024-01-01T00:00:00Z", ""] {
            assert!(!is_valid_iso8601(date), "expected invalid: {date}");
        }
    }

    #[test]
    fn valid_record_passes() {
        let report = valid_record().validate_metadata();
        assert!(report.valid);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn errors_accumulate() {
        let record = AdrRecord {
            date: None,
            deciders: Vec::new(),
            ..valid_record()
        };
        let report = record.validate_metadata();
        assert!(!report.valid);
        assert!(report.errors.iter().any(|e| e.contains("date")));
        assert!(report.errors.iter().any(|e| e.contains("deciders")));
        assert_eq!(report.errors.len(), 2);
    }

    #[test]
    fn bad_id_format() {
        let record = AdrRecord {
            id: Some("adr-12".to_string()),
            ..valid_record()
        };
        let report = record.validate_metadata();
        assert!(!report.valid);
        assert!(report.errors[0].contains("adr-NNNN"));
    }

    #[test]
    fn title_length_bounds() {
        let short = AdrRecord {
            title: Some("Too short".to_string()),
            ..valid_record()
        };
        assert!(!short.validate_metadata().valid);

        let exact = AdrRecord {
            title: Some("a".repeat(100)),
            ..valid_record()
        };
        assert!(exact.validate_metadata().valid);

        let long = AdrRecord {
            title: Some("a".repeat(101)),
            ..valid_record()
        };
        assert!(!long.validate_metadata().valid);
    }

    #[test]
    fn unknown_status_rejected() {
        let record = AdrRecord {
            status: Some("rejected".to_string()),
            ..valid_record()
        };
        let report = record.validate_metadata();
        assert!(!report.valid);
        assert!(report.errors[0].contains("invalid status"));
    }

    #[test]
    fn status_roundtrip() {
        use std::str::FromStr;
        for status in AdrStatus::all() {
            assert_eq!(AdrStatus::from_str(status.as_str()).unwrap(), *status);
        }
        assert!(AdrStatus::from_str("bogus").is_err());
    }

    #[test]
    fn optional_fields_warn_not_error() {
        let record = AdrRecord {
            supersedes: vec!["adr-1".to_string()],
            superseded_by: Some("not-an-adr".to_string()),
            ..valid_record()
        };
        // Required-field validation is unaffected
        assert!(record.validate_metadata().valid);

        let report = record.validate_optional_fields();
        assert!(!report.valid);
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn references_resolve_against_corpus() {
        let corpus = vec![valid_record()];
        let record = AdrRecord {
            id: Some("adr-0002".to_string()),
            supersedes: vec!["adr-0001".to_string()],
            ..valid_record()
        };
        let report = record.validate_references(&corpus);
        assert!(report.valid, "{:?}", report.warnings);
    }

    #[test]
    fn unresolved_reference_warns_once_per_occurrence() {
        let corpus = vec![valid_record()];
        let record = AdrRecord {
            id: Some("adr-0002".to_string()),
            supersedes: vec!["adr-0009".to_string()],
            related_decisions: vec!["adr-0009".to_string()],
            ..valid_record()
        };
        let report = record.validate_references(&corpus);
        assert_eq!(report.warnings.len(), 2);
        assert!(report.warnings.iter().all(|w| w.contains("adr-0009")));
    }

    #[test]
    fn from_markdown_parses_frontmatter() {
        let doc = "---\n\
                   id: adr-0003\n\
                   title: Use JSON manifests\n\
                   status: proposed\n\
                   date: 2024-06-01\n\
                   deciders:\n\
                   \x20 - alice\n\
                   \x20 - bob\n\
                   tags:\n\
                   \x20 - storage\n\
                   ---\n\
                   \n\
                   # Context\n";
        let record = AdrRecord::from_markdown(doc).unwrap();
        assert_eq!(record.id.as_deref(), Some("adr-0003"));
        assert_eq!(record.deciders, vec!["alice", "bob"]);
        assert_eq!(record.tags, vec!["storage"]);
        assert!(record.validate_metadata().valid);
    }

    #[test]
    fn from_markdown_without_frontmatter_fails() {
        assert!(matches!(
            AdrRecord::from_markdown("# Just a heading\n"),
            Err(AugxError::MissingFrontmatter)
        ));
    }

    #[test]
    fn load_corpus_skips_non_adr_files() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("adr-0001.md"),
            "---\nid: adr-0001\ntitle: First decision here\nstatus: draft\ndate: 2024-01-01\ndeciders: [alice]\n---\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("README.md"), "no frontmatter\n").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored\n").unwrap();

        let corpus = AdrRecord::load_corpus(dir.path()).unwrap();
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus[0].id.as_deref(), Some("adr-0001"));
    }

    #[test]
    fn load_corpus_missing_dir_is_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        let corpus = AdrRecord::load_corpus(&dir.path().join("absent")).unwrap();
        assert!(corpus.is_empty());
    }
}
