use crate::layout::RegistryLayout;
use crate::scan::discover_manifests;
use crate::RegistryError;
use atoll_schema::{Index, IndexEntry, ManifestDoc};

/// Outcome of one discovered manifest during an index build.
#[derive(Debug)]
pub struct ScanRecord {
    /// Registry-relative manifest path, forward slashes.
    pub manifest: String,
    /// The projected package id on success, the load failure otherwise.
    pub outcome: Result<String, String>,
}

/// An assembled index plus the per-manifest scan trail that produced it.
#[derive(Debug)]
pub struct IndexBuild {
    pub index: Index,
    pub records: Vec<ScanRecord>,
}

impl IndexBuild {
    /// Number of manifests that made it into the index.
    pub fn indexed(&self) -> usize {
        self.records.iter().filter(|r| r.outcome.is_ok()).count()
    }

    /// Number of manifests skipped over load failures.
    pub fn skipped(&self) -> usize {
        self.records.len() - self.indexed()
    }
}

/// Derive a fresh index from every manifest under the packages tree.
///
/// The build is best-effort: a manifest that fails to load is recorded as a
/// skipped entry and logged, never aborting the batch. The returned index is
/// assembled but not yet written; the caller decides where it lands.
pub fn build_index(layout: &RegistryLayout) -> Result<IndexBuild, RegistryError> {
    if !layout.root().is_dir() {
        return Err(RegistryError::RootNotFound(layout.root().to_path_buf()));
    }

    let mut entries = Vec::new();
    let mut records = Vec::new();

    for path in discover_manifests(layout)? {
        let key = layout.relative_key(&path);
        match ManifestDoc::load(&path) {
            Ok(doc) => {
                let entry = IndexEntry::from_document(&doc, &key);
                records.push(ScanRecord {
                    manifest: key,
                    outcome: Ok(entry.id.clone()),
                });
                entries.push(entry);
            }
            Err(e) => {
                let reason = e.detail();
                tracing::warn!("skipping manifest '{key}': {reason}");
                records.push(ScanRecord {
                    manifest: key,
                    outcome: Err(reason),
                });
            }
        }
    }

    Ok(IndexBuild {
        index: Index::new(entries),
        records,
    })
}
