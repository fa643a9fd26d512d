use crate::document::ManifestDoc;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Fields every manifest must declare.
pub const REQUIRED_FIELDS: [&str; 7] = [
    "id",
    "name",
    "version",
    "description",
    "repository",
    "runtime",
    "entrypoint",
];

/// Supported execution environments for `runtime.type`.
pub const RUNTIME_TYPES: [&str; 6] = ["python", "node", "bash", "powershell", "binary", "go"];

/// Repositories must be hosted under this origin.
pub const TRUSTED_REPOSITORY_PREFIX: &str = "https://github.com/";

/// One structural problem found in a manifest.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Violation {
    #[error("Invalid JSON: {0}")]
    Parse(String),
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Invalid ID format: {0} (expected author.package-name)")]
    IdFormat(String),
    #[error("Invalid version format: {0} (expected semver)")]
    VersionFormat(String),
    #[error("Repository must be a GitHub URL: {0}")]
    UntrustedRepository(String),
    #[error("Runtime missing 'type' field")]
    RuntimeMissingType,
    #[error("Invalid runtime type: {0}")]
    UnknownRuntimeType(String),
}

/// Coarse classification of validation errors, used in machine-readable
/// report output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    Parse,
    Schema,
    Referential,
    NotFound,
}

impl Violation {
    pub fn kind(&self) -> ViolationKind {
        match self {
            Violation::Parse(_) => ViolationKind::Parse,
            _ => ViolationKind::Schema,
        }
    }
}

/// Check one manifest against the field contract.
///
/// Accumulates every violation instead of stopping at the first, so one pass
/// reports all missing fields and all shape problems together. A manifest
/// that failed to parse never reaches this function; the caller reports that
/// as a [`Violation::Parse`] on its own.
pub fn validate_manifest(doc: &ManifestDoc) -> Vec<Violation> {
    let mut violations = Vec::new();

    for field in REQUIRED_FIELDS {
        if !doc.has_field(field) {
            violations.push(Violation::MissingField(field));
        }
    }

    if let Some(id) = doc.field("id") {
        match id.as_str() {
            Some(s) if s.contains('.') => {}
            _ => violations.push(Violation::IdFormat(render_field(id))),
        }
    }

    if let Some(version) = doc.field("version") {
        match version.as_str() {
            Some(s) if s.split('.').count() >= 3 => {}
            _ => violations.push(Violation::VersionFormat(render_field(version))),
        }
    }

    if let Some(repository) = doc.field("repository") {
        match repository.as_str() {
            Some(s) if s.starts_with(TRUSTED_REPOSITORY_PREFIX) => {}
            _ => violations.push(Violation::UntrustedRepository(render_field(repository))),
        }
    }

    // Only the object form of `runtime` carries a checkable `type`; other
    // shapes are checked for presence alone.
    if let Some(runtime) = doc.field("runtime") {
        if let Some(object) = runtime.as_object() {
            match object.get("type") {
                None => violations.push(Violation::RuntimeMissingType),
                Some(kind) => {
                    let known = kind.as_str().is_some_and(|s| RUNTIME_TYPES.contains(&s));
                    if !known {
                        violations.push(Violation::UnknownRuntimeType(render_field(kind)));
                    }
                }
            }
        }
    }

    violations
}

/// Render a field value for a report line: strings bare, anything else in
/// its JSON form.
fn render_field(value: &Value) -> String {
    match value.as_str() {
        Some(s) => s.to_owned(),
        None => value.to_string(),
    }
}
