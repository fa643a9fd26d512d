//! Registry operations for Atoll: tree layout, manifest discovery, index
//! building, and consistency validation.
//!
//! This crate provides the operations layer over `atoll-schema`:
//! `RegistryLayout` describes the on-disk registry tree, `build_index`
//! derives the index artifact from the manifest set, and `validate_registry`
//! cross-checks manifests and index and accumulates every inconsistency into
//! a `ValidationReport`.

pub mod indexer;
pub mod layout;
pub mod scan;
pub mod validate;

pub use indexer::{build_index, IndexBuild, ScanRecord};
pub use layout::{RegistryLayout, INDEX_FILE_NAME, MANIFEST_FILE_NAME};
pub use scan::discover_manifests;
pub use validate::{validate_registry, Finding, IndexViolation, ValidationReport};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("registry directory not found: {}", .0.display())]
    RootNotFound(PathBuf),
    #[error("registry I/O error: {0}")]
    Io(#[from] std::io::Error),
}
