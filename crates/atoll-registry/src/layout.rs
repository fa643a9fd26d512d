use std::path::{Path, PathBuf};

/// File name every package manifest must use.
pub const MANIFEST_FILE_NAME: &str = "manifest.json";
/// File name of the derived index artifact at the registry root.
pub const INDEX_FILE_NAME: &str = "index.json";

const PACKAGES_DIR: &str = "packages";
const SCHEMA_DIR: &str = "schema";
const SCHEMA_FILE: &str = "package.schema.json";
const ROOT_DIR_NAME: &str = "registry";

/// Directory layout of a registry tree.
///
/// Owns the registry root and derives the locations of the packages tree,
/// the index artifact, and the advisory schema document. Both operations
/// take the layout explicitly, so two registries can be worked on from one
/// process without shared state.
#[derive(Debug, Clone)]
pub struct RegistryLayout {
    root: PathBuf,
}

impl RegistryLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Locate a `registry/` directory near the running tool: the current
    /// directory first, then up to three ancestors of the executable's
    /// directory. `None` when no candidate exists.
    pub fn discover() -> Option<Self> {
        if let Ok(cwd) = std::env::current_dir() {
            let candidate = cwd.join(ROOT_DIR_NAME);
            if candidate.is_dir() {
                return Some(Self::new(candidate));
            }
        }

        if let Ok(exe) = std::env::current_exe() {
            let mut dir = exe.parent();
            for _ in 0..3 {
                let Some(d) = dir else { break };
                let candidate = d.join(ROOT_DIR_NAME);
                if candidate.is_dir() {
                    return Some(Self::new(candidate));
                }
                dir = d.parent();
            }
        }

        None
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[inline]
    pub fn packages_dir(&self) -> PathBuf {
        self.root.join(PACKAGES_DIR)
    }

    #[inline]
    pub fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_FILE_NAME)
    }

    #[inline]
    pub fn schema_path(&self) -> PathBuf {
        self.root.join(SCHEMA_DIR).join(SCHEMA_FILE)
    }

    /// A path under the root rendered registry-relative with forward
    /// slashes, the form stored in index entries and report prefixes.
    pub fn relative_key(&self, path: &Path) -> String {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        let rel = rel.to_string_lossy();
        if std::path::MAIN_SEPARATOR == '/' {
            rel.into_owned()
        } else {
            rel.replace(std::path::MAIN_SEPARATOR, "/")
        }
    }
}
