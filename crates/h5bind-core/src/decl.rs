//! Declaration tree handed over by the C++ front-end
//!
//! The builder walks any type implementing [`DeclCursor`]. The in-tree
//! implementation is [`DeclNode`], which is what a front-end serialises to
//! JSON inside a [`TranslationUnit`] document:
//!
//! ```json
//! {
//!   "file": "include/sample.h",
//!   "diagnostics": [],
//!   "root": {
//!     "kind": "translation_unit",
//!     "spelling": "include/sample.h",
//!     "children": [
//!       {
//!         "kind": "struct",
//!         "spelling": "Point",
//!         "is_definition": true,
//!         "location": "include/sample.h",
//!         "children": [
//!           { "kind": "field", "spelling": "x",
//!             "field_type": { "scalar": { "spelling": "int32_t", "canonical": "int" } } }
//!         ]
//!       }
//!     ]
//!   }
//! }
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::EnumValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclKind {
    TranslationUnit,
    Namespace,
    Struct,
    Class,
    Union,
    Enum,
    EnumConstant,
    Field,
    #[serde(other)]
    Other,
}

/// A type as spelled in the source and with typedefs resolved
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSpelling {
    #[serde(default)]
    pub spelling: String,
    /// Fully resolved spelling; clang leaves this empty for some
    /// anonymous/typedef'd records
    #[serde(default)]
    pub canonical: String,
}

impl TypeSpelling {
    pub fn new(spelling: impl Into<String>, canonical: impl Into<String>) -> Self {
        Self {
            spelling: spelling.into(),
            canonical: canonical.into(),
        }
    }

    /// Canonical spelling, or the declared spelling when the canonical one is empty
    pub fn resolved(&self) -> &str {
        if self.canonical.is_empty() {
            &self.spelling
        } else {
            &self.canonical
        }
    }
}

/// Type of a field declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Scalar(TypeSpelling),
    ConstantArray { element: TypeSpelling, count: usize },
}

/// Read access to one node of a declaration tree.
///
/// Cursors are cheap handles (clang's `CXCursor` is two pointers), so
/// `children` hands out new cursors by value.
pub trait DeclCursor: Sized {
    fn kind(&self) -> DeclKind;

    /// The node's own name; empty for anonymous declarations
    fn spelling(&self) -> &str;

    /// Fully qualified type spelling of a record or enum (`ns::Outer::Inner`)
    fn qualified_name(&self) -> &str;

    /// Whether a record or enum node is a definition rather than a forward declaration
    fn is_definition(&self) -> bool;

    /// File containing the definition
    fn location(&self) -> Option<&Path>;

    /// Underlying integer type spelling of an enum
    fn enum_integer_type(&self) -> Option<&str>;

    /// Value of an enum constant
    fn enum_value(&self) -> Option<EnumValue>;

    fn field_type(&self) -> Option<&FieldType>;

    /// Declared width of a bitfield member
    fn bit_width(&self) -> Option<u32>;

    fn children(&self) -> Vec<Self>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclNode {
    pub kind: DeclKind,
    #[serde(default)]
    pub spelling: String,
    /// Defaults to `spelling` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualified_name: Option<String>,
    #[serde(default)]
    pub is_definition: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enum_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enum_value: Option<EnumValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bit_width: Option<u32>,
    #[serde(default)]
    pub children: Vec<DeclNode>,
}

impl DeclNode {
    pub fn new(kind: DeclKind, spelling: impl Into<String>) -> Self {
        Self {
            kind,
            spelling: spelling.into(),
            qualified_name: None,
            is_definition: false,
            location: None,
            enum_type: None,
            enum_value: None,
            field_type: None,
            bit_width: None,
            children: Vec::new(),
        }
    }

    pub fn translation_unit(file: impl Into<PathBuf>) -> Self {
        let file = file.into();
        Self::new(DeclKind::TranslationUnit, file.display().to_string())
    }

    pub fn namespace(name: impl Into<String>) -> Self {
        Self::new(DeclKind::Namespace, name)
    }

    /// A record or enum definition located in `file`
    pub fn definition(
        kind: DeclKind,
        spelling: impl Into<String>,
        qualified_name: impl Into<String>,
        file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            qualified_name: Some(qualified_name.into()),
            is_definition: true,
            location: Some(file.into()),
            ..Self::new(kind, spelling)
        }
    }

    pub fn enumeration(
        spelling: impl Into<String>,
        qualified_name: impl Into<String>,
        underlying: impl Into<String>,
        file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            enum_type: Some(underlying.into()),
            ..Self::definition(DeclKind::Enum, spelling, qualified_name, file)
        }
    }

    pub fn enum_constant(name: impl Into<String>, value: impl Into<EnumValue>) -> Self {
        Self {
            enum_value: Some(value.into()),
            ..Self::new(DeclKind::EnumConstant, name)
        }
    }

    pub fn scalar_field(
        name: impl Into<String>,
        spelling: impl Into<String>,
        canonical: impl Into<String>,
    ) -> Self {
        Self {
            field_type: Some(FieldType::Scalar(TypeSpelling::new(spelling, canonical))),
            ..Self::new(DeclKind::Field, name)
        }
    }

    pub fn array_field(
        name: impl Into<String>,
        spelling: impl Into<String>,
        canonical: impl Into<String>,
        count: usize,
    ) -> Self {
        Self {
            field_type: Some(FieldType::ConstantArray {
                element: TypeSpelling::new(spelling, canonical),
                count,
            }),
            ..Self::new(DeclKind::Field, name)
        }
    }

    /// Mark a field as a bitfield of `width` bits
    pub fn with_bit_width(mut self, width: u32) -> Self {
        self.bit_width = Some(width);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = DeclNode>) -> Self {
        self.children.extend(children);
        self
    }
}

impl<'a> DeclCursor for &'a DeclNode {
    fn kind(&self) -> DeclKind {
        self.kind
    }

    fn spelling(&self) -> &str {
        &self.spelling
    }

    fn qualified_name(&self) -> &str {
        self.qualified_name.as_deref().unwrap_or(&self.spelling)
    }

    fn is_definition(&self) -> bool {
        self.is_definition
    }

    fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    fn enum_integer_type(&self) -> Option<&str> {
        self.enum_type.as_deref()
    }

    fn enum_value(&self) -> Option<EnumValue> {
        self.enum_value
    }

    fn field_type(&self) -> Option<&FieldType> {
        self.field_type.as_ref()
    }

    fn bit_width(&self) -> Option<u32> {
        self.bit_width
    }

    fn children(&self) -> Vec<Self> {
        self.children.iter().collect()
    }
}

/// Severity of a front-end diagnostic, least severe first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticSeverity {
    Ignored,
    Note,
    Warning,
    Error,
    Fatal,
}

impl DiagnosticSeverity {
    pub fn is_error(self) -> bool {
        self >= DiagnosticSeverity::Error
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: DiagnosticSeverity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{}: {:?}: {}", location, self.severity, self.message),
            None => write!(f, "{:?}: {}", self.severity, self.message),
        }
    }
}

/// Everything the front-end produced for one input header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationUnit {
    /// The header bindings are generated for
    pub file: PathBuf,
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
    pub root: DeclNode,
}

impl TranslationUnit {
    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Fail with every error or fatal diagnostic the front-end reported
    pub fn check_diagnostics(&self) -> Result<(), CoreError> {
        let errors: Vec<String> = self
            .diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.severity.is_error())
            .map(ToString::to_string)
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(CoreError::FrontEndParse {
                file: self.file.clone(),
                diagnostics: errors,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_spelling_falls_back_to_declared() {
        assert_eq!(TypeSpelling::new("uint32_t", "unsigned int").resolved(), "unsigned int");
        assert_eq!(TypeSpelling::new("legacy_t", "").resolved(), "legacy_t");
    }

    #[test]
    fn test_unknown_kinds_deserialize_as_other() {
        let node: DeclNode =
            serde_json::from_str(r#"{ "kind": "function_decl", "spelling": "main" }"#).unwrap();
        assert_eq!(node.kind, DeclKind::Other);
        assert_eq!((&node).qualified_name(), "main");
    }

    #[test]
    fn test_field_type_json_shapes() {
        let node: DeclNode = serde_json::from_str(
            r#"{
                "kind": "field",
                "spelling": "samples",
                "field_type": {
                    "constant_array": {
                        "element": { "spelling": "sample_t", "canonical": "double" },
                        "count": 8
                    }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(
            node.field_type,
            Some(FieldType::ConstantArray {
                element: TypeSpelling::new("sample_t", "double"),
                count: 8,
            })
        );
    }

    #[test]
    fn test_unsigned_enum_values_beyond_i64_load() {
        let unit = TranslationUnit::from_json_str(
            r#"{
                "file": "flags.h",
                "root": {
                    "kind": "translation_unit",
                    "spelling": "flags.h",
                    "children": [{
                        "kind": "enum",
                        "spelling": "Flags",
                        "is_definition": true,
                        "location": "flags.h",
                        "enum_type": "unsigned long long",
                        "children": [
                            { "kind": "enum_constant", "spelling": "NONE", "enum_value": 0 },
                            { "kind": "enum_constant", "spelling": "ALL", "enum_value": 18446744073709551615 }
                        ]
                    }]
                }
            }"#,
        )
        .unwrap();

        let values: Vec<_> = unit.root.children[0]
            .children
            .iter()
            .map(|constant| constant.enum_value)
            .collect();
        assert_eq!(
            values,
            vec![Some(EnumValue::Signed(0)), Some(EnumValue::Unsigned(u64::MAX))]
        );
    }

    #[test]
    fn test_warnings_do_not_fail_the_unit() {
        let unit = TranslationUnit {
            file: PathBuf::from("a.h"),
            diagnostics: vec![Diagnostic {
                severity: DiagnosticSeverity::Warning,
                message: "unused".into(),
                location: None,
            }],
            root: DeclNode::translation_unit("a.h"),
        };
        assert!(unit.check_diagnostics().is_ok());
    }

    #[test]
    fn test_errors_are_aggregated() {
        let unit = TranslationUnit {
            file: PathBuf::from("a.h"),
            diagnostics: vec![
                Diagnostic {
                    severity: DiagnosticSeverity::Error,
                    message: "unknown type name 'foo'".into(),
                    location: Some("a.h:3:5".into()),
                },
                Diagnostic {
                    severity: DiagnosticSeverity::Note,
                    message: "declared here".into(),
                    location: None,
                },
                Diagnostic {
                    severity: DiagnosticSeverity::Fatal,
                    message: "'missing.h' file not found".into(),
                    location: None,
                },
            ],
            root: DeclNode::translation_unit("a.h"),
        };

        match unit.check_diagnostics() {
            Err(CoreError::FrontEndParse { diagnostics, .. }) => {
                assert_eq!(diagnostics.len(), 2);
                assert!(diagnostics[0].contains("a.h:3:5"));
            }
            other => panic!("expected front-end error, got {:?}", other),
        }
    }
}
