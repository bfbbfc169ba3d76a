//! Names of everything the generator writes: binding classes, their
//! namespaces, dependent-instance variables and the output files.

use std::path::{Path, PathBuf};

use h5bind_core::qualified_name::{sanitize_identifier, QualifiedName};

pub const BINDING_SUFFIX: &str = "DxTransform";
pub const NAMESPACE_SUFFIX: &str = "_Dx";
pub const BASE_CLASS: &str = "DxTransform::DxTransformBase";
pub const BASE_HEADER: &str = "DxTransformBase.h";

/// HDF5 datatype class a binding populates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum H5Category {
    Enum,
    Compound,
}

impl H5Category {
    pub fn as_str(self) -> &'static str {
        match self {
            H5Category::Enum => "H5::EnumType",
            H5Category::Compound => "H5::CompType",
        }
    }
}

/// `C` becomes `CDxTransform`
pub fn binding_class_name(name: &QualifiedName) -> String {
    format!("{}{}", sanitize_identifier(name.type_name()), BINDING_SUFFIX)
}

/// One block per enclosing scope, outermost first: `A::B::C` gives
/// `["A_Dx", "B_Dx"]`
pub fn namespace_blocks(name: &QualifiedName) -> Vec<String> {
    name.namespaces()
        .iter()
        .map(|ns| format!("{}{}", sanitize_identifier(ns), NAMESPACE_SUFFIX))
        .collect()
}

/// Fully qualified reference to a binding class, usable from any namespace
pub fn qualified_binding_name(name: &QualifiedName) -> String {
    let mut qualified = String::new();
    for block in namespace_blocks(name) {
        qualified.push_str("::");
        qualified.push_str(&block);
    }
    qualified.push_str("::");
    qualified.push_str(&binding_class_name(name));
    qualified
}

/// Local holding a dependent type's binding instance inside a constructor
pub fn dependent_variable(name: &QualifiedName) -> String {
    format!("zzz_{}_dx", name.sanitized())
}

pub fn base_class(name: &QualifiedName, category: H5Category) -> String {
    format!("{}<{}, {}>", BASE_CLASS, name.as_str(), category.as_str())
}

/// Stem generated files are named after: `sample` for `/src/sample.h`
pub fn source_stem(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    let stem = file_name.split('.').next().unwrap_or(file_name);
    (!stem.is_empty()).then(|| stem.to_string())
}

pub fn generated_header_name(stem: &str) -> String {
    format!("{}_{}.h", stem, BINDING_SUFFIX)
}

pub fn generated_source_name(stem: &str) -> String {
    format!("{}_{}.cpp", stem, BINDING_SUFFIX)
}

pub fn include_guard(stem: &str) -> String {
    format!("{}_DX_TRANSFORM_H", sanitize_identifier(stem).to_uppercase())
}

pub fn header_path(output_dir: &Path, stem: &str) -> PathBuf {
    output_dir.join(generated_header_name(stem))
}

pub fn source_path(output_dir: &Path, stem: &str) -> PathBuf {
    output_dir.join(generated_source_name(stem))
}
