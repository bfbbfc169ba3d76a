//! The registry seen from the header bindings are generated for

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::include_path::{same_file, IncludePath};
use crate::registry::TypeRegistry;
use crate::types::{CompoundType, EnumType, UnionType};

/// Splits a finished registry into the types declared in `source_file` and
/// the headers that must be included for everything else.
#[derive(Debug, Clone)]
pub struct FileScopeView {
    registry: TypeRegistry,
    source_file: PathBuf,
    includes: Vec<IncludePath>,
}

impl FileScopeView {
    pub fn new(
        registry: TypeRegistry,
        source_file: impl Into<PathBuf>,
        search_dirs: &[PathBuf],
    ) -> Self {
        let source_file = source_file.into();
        let includes = resolve_includes(&registry, &source_file, search_dirs);
        debug!(
            file = %source_file.display(),
            includes = includes.len(),
            "file scope resolved"
        );
        Self {
            registry,
            source_file,
            includes,
        }
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn source_file(&self) -> &Path {
        &self.source_file
    }

    pub fn is_local(&self, declaring_file: &Path) -> bool {
        same_file(declaring_file, &self.source_file)
    }

    pub fn compound_types_in_file(&self) -> impl Iterator<Item = &CompoundType> {
        self.registry
            .compound_types()
            .filter(|compound| self.is_local(&compound.declaring_file))
    }

    pub fn enum_types_in_file(&self) -> impl Iterator<Item = &EnumType> {
        self.registry
            .enum_types()
            .filter(|enumeration| self.is_local(&enumeration.declaring_file))
    }

    pub fn union_types_in_file(&self) -> impl Iterator<Item = &UnionType> {
        self.registry
            .union_types()
            .filter(|union| self.is_local(&union.declaring_file))
    }

    /// Headers declaring the types pulled in from elsewhere, deduplicated by
    /// resolved path
    pub fn resolved_includes(&self) -> &[IncludePath] {
        &self.includes
    }
}

fn resolve_includes(
    registry: &TypeRegistry,
    source_file: &Path,
    search_dirs: &[PathBuf],
) -> Vec<IncludePath> {
    let candidates = registry
        .compound_types()
        .map(|compound| compound.declaring_file.as_path())
        .chain(registry.enum_types().map(|e| e.declaring_file.as_path()))
        .chain(registry.union_types().map(|u| u.declaring_file.as_path()))
        .filter(|file| !file.as_os_str().is_empty() && !same_file(file, source_file));

    let mut seen = HashSet::new();
    let mut includes = Vec::new();
    for candidate in candidates {
        let include = IncludePath::resolve(candidate, search_dirs);
        if seen.insert(include.absolute().to_path_buf()) {
            includes.push(include);
        }
    }
    includes
}
