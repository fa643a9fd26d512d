use serde_json::Value;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read manifest file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse manifest: {0}")]
    Parse(#[from] serde_json::Error),
}

impl DocumentError {
    /// The underlying failure without this error's own prefix, for embedding
    /// in operator-facing report lines.
    pub fn detail(&self) -> String {
        match self {
            DocumentError::Io(e) => e.to_string(),
            DocumentError::Parse(e) => e.to_string(),
        }
    }
}

/// A manifest held as raw JSON with typed field accessors.
///
/// Manifests are authored independently of this tooling and carry fields the
/// tooling does not know about (`author`, `license`, `commands`, `platforms`,
/// anything newer). Loading is therefore purely syntactic: presence and shape
/// of logical fields are the caller's concern, checked field by field through
/// the accessors below.
#[derive(Debug, Clone)]
pub struct ManifestDoc {
    value: Value,
}

impl ManifestDoc {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(input: &str) -> Result<Self, DocumentError> {
        Ok(Self {
            value: serde_json::from_str(input)?,
        })
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.value.get(field).is_some()
    }

    pub fn field(&self, field: &str) -> Option<&Value> {
        self.value.get(field)
    }

    /// A field's value when it is present and a string.
    pub fn str_field(&self, field: &str) -> Option<&str> {
        self.value.get(field).and_then(Value::as_str)
    }

    /// The keyword list; non-string elements are dropped, anything that is
    /// not an array counts as empty.
    pub fn keywords(&self) -> Vec<String> {
        self.value
            .get("keywords")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).map(str::to_owned).collect())
            .unwrap_or_default()
    }
}
