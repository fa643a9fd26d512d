use crate::document::ManifestDoc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Current index artifact format version.
pub const INDEX_FORMAT_VERSION: &str = "1.0";

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("index I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("index serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One manifest's projected summary within the index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndexEntry {
    pub id: String,
    pub name: String,
    pub version: String,
    pub description: String,
    pub keywords: Vec<String>,
    /// Registry-relative path of the source manifest, forward slashes.
    pub manifest: String,
}

/// The derived registry index artifact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Index {
    pub version: String,
    pub updated: String,
    pub packages: Vec<IndexEntry>,
}

impl IndexEntry {
    /// Project a manifest into its index summary.
    ///
    /// Missing or mistyped fields fall back to placeholders (`unknown`,
    /// `0.0.0`, empty) instead of failing; reporting them is the validator's
    /// job, not the projection's.
    pub fn from_document(doc: &ManifestDoc, manifest_path: &str) -> Self {
        Self {
            id: doc.str_field("id").unwrap_or("unknown").to_owned(),
            name: doc
                .str_field("name")
                .or_else(|| doc.str_field("id"))
                .unwrap_or("Unknown")
                .to_owned(),
            version: doc.str_field("version").unwrap_or("0.0.0").to_owned(),
            description: doc.str_field("description").unwrap_or("").to_owned(),
            keywords: doc.keywords(),
            manifest: manifest_path.to_owned(),
        }
    }
}

impl Index {
    /// Assemble a fresh index from projected entries.
    ///
    /// Entries are sorted ascending by id here, so every index built through
    /// this constructor satisfies the ordering invariant regardless of the
    /// scan order that produced the entries.
    pub fn new(mut packages: Vec<IndexEntry>) -> Self {
        packages.sort_by(|a, b| a.id.cmp(&b.id));
        Self {
            version: INDEX_FORMAT_VERSION.to_owned(),
            updated: utc_timestamp(),
            packages,
        }
    }

    /// Replace the index file atomically: write to a temp file in the same
    /// directory, fsync, then rename over the target. A crashed run never
    /// leaves a truncated index visible.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<(), IndexError> {
        let path = path.as_ref();
        let mut content = serde_json::to_string_pretty(self)?;
        content.push('\n');
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| IndexError::Io(e.error))?;
        // Fsync the parent directory so the rename survives power loss.
        if let Ok(f) = fs::File::open(dir) {
            let _ = f.sync_all();
        }
        Ok(())
    }

    pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self, IndexError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// UTC wall-clock time at second precision with a literal `Z` suffix.
fn utc_timestamp() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(json: &str) -> ManifestDoc {
        ManifestDoc::parse(json).unwrap()
    }

    fn entry(id: &str) -> IndexEntry {
        IndexEntry {
            id: id.to_owned(),
            name: "Tool".to_owned(),
            version: "1.0.0".to_owned(),
            description: String::new(),
            keywords: Vec::new(),
            manifest: format!("packages/{id}/manifest.json"),
        }
    }

    #[test]
    fn projection_uses_manifest_fields() {
        let doc = doc(r#"{
            "id": "acme.tool",
            "name": "Tool",
            "version": "2.1.0",
            "description": "A tool",
            "keywords": ["cli", "demo"]
        }"#);
        let entry = IndexEntry::from_document(&doc, "packages/tool/manifest.json");
        assert_eq!(entry.id, "acme.tool");
        assert_eq!(entry.name, "Tool");
        assert_eq!(entry.version, "2.1.0");
        assert_eq!(entry.description, "A tool");
        assert_eq!(entry.keywords, vec!["cli".to_owned(), "demo".to_owned()]);
        assert_eq!(entry.manifest, "packages/tool/manifest.json");
    }

    #[test]
    fn projection_falls_back_to_placeholders() {
        let entry = IndexEntry::from_document(&doc("{}"), "packages/x/manifest.json");
        assert_eq!(entry.id, "unknown");
        assert_eq!(entry.name, "Unknown");
        assert_eq!(entry.version, "0.0.0");
        assert_eq!(entry.description, "");
        assert!(entry.keywords.is_empty());
    }

    #[test]
    fn missing_name_falls_back_to_id() {
        let entry = IndexEntry::from_document(&doc(r#"{"id": "acme.tool"}"#), "m");
        assert_eq!(entry.name, "acme.tool");
    }

    #[test]
    fn non_string_fields_fall_back_like_missing_ones() {
        let entry = IndexEntry::from_document(
            &doc(r#"{"id": 7, "name": ["x"], "version": 1.2}"#),
            "m",
        );
        assert_eq!(entry.id, "unknown");
        assert_eq!(entry.name, "Unknown");
        assert_eq!(entry.version, "0.0.0");
    }

    #[test]
    fn new_sorts_entries_by_id() {
        let index = Index::new(vec![entry("zeta.z"), entry("acme.a"), entry("mid.m")]);
        let ids: Vec<&str> = index.packages.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["acme.a", "mid.m", "zeta.z"]);
    }

    #[test]
    fn new_stamps_format_version_and_timestamp() {
        let index = Index::new(Vec::new());
        assert_eq!(index.version, INDEX_FORMAT_VERSION);
        assert_eq!(index.updated.len(), 20);
        assert!(index.updated.ends_with('Z'));
        assert_eq!(&index.updated[10..11], "T");
    }

    #[test]
    fn index_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        let index = Index::new(vec![entry("acme.tool")]);

        index.write_to_file(&path).unwrap();
        let loaded = Index::read_from_file(&path).unwrap();
        assert_eq!(index, loaded);
    }

    #[test]
    fn written_file_ends_with_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        Index::new(Vec::new()).write_to_file(&path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.ends_with('\n'));
        assert!(!content.ends_with("\n\n"));
    }

    #[test]
    fn serialized_field_order_is_stable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        Index::new(vec![entry("acme.tool")]).write_to_file(&path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let version_at = content.find("\"version\"").unwrap();
        let updated_at = content.find("\"updated\"").unwrap();
        let packages_at = content.find("\"packages\"").unwrap();
        assert!(version_at < updated_at);
        assert!(updated_at < packages_at);
    }

    #[test]
    fn write_leaves_no_temp_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        Index::new(Vec::new()).write_to_file(&path).unwrap();
        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["index.json".to_owned()]);
    }

    #[test]
    fn write_replaces_existing_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        Index::new(vec![entry("acme.old")]).write_to_file(&path).unwrap();
        Index::new(vec![entry("acme.new")]).write_to_file(&path).unwrap();
        let loaded = Index::read_from_file(&path).unwrap();
        assert_eq!(loaded.packages.len(), 1);
        assert_eq!(loaded.packages[0].id, "acme.new");
    }
}
