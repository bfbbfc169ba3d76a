//! Resolution of dependency headers against include search directories

use std::path::{Component, Path, PathBuf};

/// A header another type was declared in, as spelled and as resolved on disk
#[derive(Debug, Clone)]
pub struct IncludePath {
    raw: PathBuf,
    absolute: PathBuf,
}

impl IncludePath {
    /// Probe `search_dirs` in order for `raw`; the first existing candidate
    /// wins, otherwise the absolute form of `raw` itself is used.
    pub fn resolve(raw: impl Into<PathBuf>, search_dirs: &[PathBuf]) -> Self {
        let raw = raw.into();
        let absolute = search_dirs
            .iter()
            .map(|dir| dir.join(&raw))
            .find(|candidate| candidate.is_file())
            .map(|found| absolutize(&found))
            .unwrap_or_else(|| absolutize(&raw));

        Self { raw, absolute }
    }

    pub fn raw(&self) -> &Path {
        &self.raw
    }

    pub fn absolute(&self) -> &Path {
        &self.absolute
    }
}

impl PartialEq for IncludePath {
    fn eq(&self, other: &Self) -> bool {
        self.absolute == other.absolute
    }
}

impl Eq for IncludePath {}

impl std::hash::Hash for IncludePath {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.absolute.hash(state);
    }
}

/// Absolute, lexically normalised form of `path`. Only the current directory
/// is consulted; symlinks are not resolved.
pub fn absolutize(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    normalize(&absolute)
}

/// Fold `.` and `name/..` components without touching the filesystem.
/// `..` directly below the root stays at the root.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => normalized.push(Component::ParentDir),
            },
            other => normalized.push(other),
        }
    }
    if normalized.as_os_str().is_empty() {
        normalized.push(Component::CurDir);
    }
    normalized
}

/// Whether two spellings name the same file
pub fn same_file(a: &Path, b: &Path) -> bool {
    a == b || absolutize(a) == absolutize(b)
}
