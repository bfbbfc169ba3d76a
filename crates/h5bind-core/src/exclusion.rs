//! Include exclusion list
//!
//! System and third-party headers end up in the registry whenever the input
//! header includes them. Paths listed in the ignore file (one absolute prefix
//! per line, `#` starts a comment line) are never `#include`d by generated
//! code.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::CoreError;
use crate::include_path::absolutize;

#[derive(Debug, Clone, Default)]
pub struct FileExcluder {
    prefixes: Vec<String>,
}

impl FileExcluder {
    /// An excluder that lets every path through
    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_prefixes<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn parse(content: &str) -> Self {
        Self::from_prefixes(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)?;
        let excluder = Self::parse(&content);
        debug!(
            file = %path.display(),
            prefixes = excluder.prefixes.len(),
            "loaded exclusion list"
        );
        Ok(excluder)
    }

    /// Load `path` if it exists; a missing file excludes nothing
    pub fn load_optional(path: Option<&PathBuf>) -> Result<Self, CoreError> {
        match path {
            Some(path) if path.exists() => Self::load(path),
            Some(path) => {
                debug!(file = %path.display(), "exclusion list not found, excluding nothing");
                Ok(Self::none())
            }
            None => Ok(Self::none()),
        }
    }

    pub fn is_excluded(&self, path: &Path) -> bool {
        let absolute = absolutize(path);
        let absolute = absolute.to_string_lossy();
        self.prefixes
            .iter()
            .any(|prefix| absolute.starts_with(prefix.as_str()))
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }
}
