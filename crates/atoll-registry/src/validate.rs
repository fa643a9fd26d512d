use crate::layout::{RegistryLayout, INDEX_FILE_NAME};
use crate::scan::discover_manifests;
use crate::RegistryError;
use atoll_schema::{validate_manifest, ManifestDoc, Violation, ViolationKind};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;

/// Consistency violations found on the index side of the registry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IndexViolation {
    #[error("Invalid JSON in index.json: {0}")]
    Parse(String),
    #[error("Missing 'packages' array in index.json")]
    MissingPackages,
    #[error("Package in index missing 'id'")]
    EntryMissingId,
    #[error("Duplicate package ID: {0}")]
    DuplicateId(String),
    #[error("Package '{id}' references non-existent manifest: {path}")]
    DanglingManifest { id: String, path: String },
    #[error("Package ID mismatch: index has '{index_id}', manifest has '{manifest_id}'")]
    IdMismatch { index_id: String, manifest_id: String },
    #[error("index.json not found")]
    IndexNotFound,
}

impl IndexViolation {
    pub fn kind(&self) -> ViolationKind {
        match self {
            IndexViolation::Parse(_) => ViolationKind::Parse,
            IndexViolation::MissingPackages | IndexViolation::EntryMissingId => {
                ViolationKind::Schema
            }
            IndexViolation::DuplicateId(_)
            | IndexViolation::DanglingManifest { .. }
            | IndexViolation::IdMismatch { .. } => ViolationKind::Referential,
            IndexViolation::IndexNotFound => ViolationKind::NotFound,
        }
    }
}

/// One validation error, tagged with the artifact it was found in.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Finding {
    /// Registry-relative path of the offending artifact. `None` only for
    /// the missing-index report, which has no file to point at.
    pub source: Option<String>,
    pub kind: ViolationKind,
    pub message: String,
}

impl Finding {
    fn manifest(source: String, violation: &Violation) -> Self {
        Self {
            source: Some(source),
            kind: violation.kind(),
            message: violation.to_string(),
        }
    }

    fn index(violation: &IndexViolation) -> Self {
        Self {
            source: Some(INDEX_FILE_NAME.to_owned()),
            kind: violation.kind(),
            message: violation.to_string(),
        }
    }

    fn index_missing() -> Self {
        Self {
            source: None,
            kind: ViolationKind::NotFound,
            message: IndexViolation::IndexNotFound.to_string(),
        }
    }
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{source}: {}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Outcome of a full registry validation pass.
#[derive(Debug, Default, Serialize)]
pub struct ValidationReport {
    /// Number of manifests examined.
    pub checked: usize,
    /// Every violation found: index checks first, then manifests in
    /// discovery order.
    pub findings: Vec<Finding>,
}

impl ValidationReport {
    pub fn passed(&self) -> bool {
        self.findings.is_empty()
    }
}

/// Cross-check the registry: the index artifact against the manifest tree,
/// then every manifest against the field contract.
///
/// All findings are accumulated into one report; nothing short-circuits the
/// whole pass. The only fatal condition is a missing registry root.
pub fn validate_registry(layout: &RegistryLayout) -> Result<ValidationReport, RegistryError> {
    if !layout.root().is_dir() {
        return Err(RegistryError::RootNotFound(layout.root().to_path_buf()));
    }

    load_advisory_schema(layout);

    let mut report = ValidationReport::default();
    check_index(layout, &mut report.findings);

    for path in discover_manifests(layout)? {
        report.checked += 1;
        let source = layout.relative_key(&path);
        match ManifestDoc::load(&path) {
            Ok(doc) => {
                for violation in validate_manifest(&doc) {
                    report.findings.push(Finding::manifest(source.clone(), &violation));
                }
            }
            Err(e) => {
                // One load failure swallows the structural checks for this
                // manifest; there is nothing sound to check them against.
                let violation = Violation::Parse(e.detail());
                report.findings.push(Finding::manifest(source, &violation));
            }
        }
    }

    Ok(report)
}

/// The schema document mirrors the hardcoded checks and is loaded only to
/// surface registries shipping a broken copy: absence is fine, an unreadable
/// schema warns.
fn load_advisory_schema(layout: &RegistryLayout) {
    let path = layout.schema_path();
    if !path.exists() {
        return;
    }
    if let Err(e) = ManifestDoc::load(&path) {
        tracing::warn!(
            "could not load schema from '{}': {}",
            path.display(),
            e.detail()
        );
    }
}

fn check_index(layout: &RegistryLayout, findings: &mut Vec<Finding>) {
    let index_path = layout.index_path();
    if !index_path.exists() {
        findings.push(Finding::index_missing());
        return;
    }

    let doc = match ManifestDoc::load(&index_path) {
        Ok(doc) => doc,
        Err(e) => {
            findings.push(Finding::index(&IndexViolation::Parse(e.detail())));
            return;
        }
    };

    let Some(packages) = doc.field("packages").and_then(Value::as_array) else {
        findings.push(Finding::index(&IndexViolation::MissingPackages));
        return;
    };

    // Ordering is guaranteed by the write path, not enforced here: a
    // hand-sorted but consistent index still passes.
    let ids: Vec<&str> = packages
        .iter()
        .filter_map(|entry| entry.get("id").and_then(Value::as_str))
        .collect();
    if !ids.windows(2).all(|pair| pair[0] <= pair[1]) {
        tracing::warn!("index entries are not sorted by id");
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for entry in packages {
        let Some(id) = entry.get("id").and_then(Value::as_str) else {
            findings.push(Finding::index(&IndexViolation::EntryMissingId));
            continue;
        };

        // Reported at the second and later occurrences; the entry still
        // gets its reference checks.
        if !seen.insert(id) {
            findings.push(Finding::index(&IndexViolation::DuplicateId(id.to_owned())));
        }

        let Some(manifest_ref) = entry.get("manifest").and_then(Value::as_str) else {
            continue;
        };
        let manifest_path = layout.root().join(manifest_ref);
        if !manifest_path.exists() {
            findings.push(Finding::index(&IndexViolation::DanglingManifest {
                id: id.to_owned(),
                path: manifest_ref.to_owned(),
            }));
            continue;
        }

        // A manifest that fails to load here is left to the structural
        // pass; only a clean load can contradict the entry.
        if let Ok(manifest) = ManifestDoc::load(&manifest_path) {
            let manifest_id = manifest.field("id");
            if manifest_id.and_then(Value::as_str) != Some(id) {
                findings.push(Finding::index(&IndexViolation::IdMismatch {
                    index_id: id.to_owned(),
                    manifest_id: render_id(manifest_id),
                }));
            }
        }
    }
}

/// Render a manifest's id field for the mismatch report: strings bare,
/// anything else (including an absent field) in its JSON form.
fn render_id(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "null".to_owned(),
    }
}
