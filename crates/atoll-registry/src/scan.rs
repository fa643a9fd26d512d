use crate::layout::{RegistryLayout, MANIFEST_FILE_NAME};
use crate::RegistryError;
use std::fs;
use std::path::{Path, PathBuf};

/// Collect every manifest file under the packages tree, in lexicographic
/// path order so later stages are reproducible.
///
/// A registry without a `packages/` directory scans as empty; that is a
/// valid (if bare) registry, not an error.
pub fn discover_manifests(layout: &RegistryLayout) -> Result<Vec<PathBuf>, RegistryError> {
    let packages = layout.packages_dir();
    let mut found = Vec::new();
    if packages.is_dir() {
        collect_manifests(&packages, &mut found)?;
    }
    found.sort();
    tracing::debug!("discovered {} manifest(s)", found.len());
    Ok(found)
}

fn collect_manifests(dir: &Path, found: &mut Vec<PathBuf>) -> Result<(), RegistryError> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_manifests(&path, found)?;
        } else if entry.file_name() == MANIFEST_FILE_NAME {
            found.push(path);
        }
    }
    Ok(())
}
