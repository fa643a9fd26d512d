//! Manifest documents, the field contract, and the derived index artifact for Atoll.
//!
//! This crate defines the data-model layer: lenient JSON manifest loading
//! (`ManifestDoc`), structural validation against the required-field contract
//! (`validate_manifest`), and the sorted index artifact (`Index`) with atomic
//! file replacement.

pub mod document;
pub mod index;
pub mod manifest;

pub use document::{DocumentError, ManifestDoc};
pub use index::{Index, IndexEntry, IndexError, INDEX_FORMAT_VERSION};
pub use manifest::{
    validate_manifest, Violation, ViolationKind, REQUIRED_FIELDS, RUNTIME_TYPES,
    TRUSTED_REPOSITORY_PREFIX,
};
