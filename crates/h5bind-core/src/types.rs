//! Type descriptors held by the registry
//!
//! Every type the generator knows about is one variant of [`TypeDescriptor`].
//! Fields refer to their type by qualified name; the registry is the single
//! owner of every descriptor.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::atomic::AtomicType;
use crate::qualified_name::short_name;

/// Kind tag of a descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    Atomic,
    Compound,
    Enum,
    Union,
}

/// A member of a struct, class or union
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldElement {
    pub name: String,
    /// Registry key of the member's (element) type
    pub type_name: String,
    /// Kind of the referenced type when the field was attached
    pub type_kind: TypeKind,
    /// 1 for scalars, the declared length for fixed-size arrays
    pub element_count: usize,
}

impl FieldElement {
    pub fn new(
        name: impl Into<String>,
        type_name: impl Into<String>,
        type_kind: TypeKind,
        element_count: usize,
    ) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            type_kind,
            element_count,
        }
    }

    pub fn is_array(&self) -> bool {
        self.element_count > 1
    }
}

/// A struct or class definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompoundType {
    pub name: String,
    pub declaring_file: PathBuf,
    fields: Vec<FieldElement>,
}

impl CompoundType {
    pub fn new(name: impl Into<String>, declaring_file: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            declaring_file: declaring_file.into(),
            fields: Vec::new(),
        }
    }

    pub fn add_field(&mut self, field: FieldElement) {
        self.fields.push(field);
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[FieldElement] {
        &self.fields
    }

    /// Unqualified type name (`C` for `A::B::C`)
    pub fn type_name(&self) -> &str {
        short_name(&self.name)
    }
}

/// Value of an enumerator.
///
/// Values that fit `i64` are always `Signed`; `Unsigned` only carries values
/// of unsigned enums above `i64::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnumValue {
    Signed(i64),
    Unsigned(u64),
}

impl EnumValue {
    /// C++ integer literal for the value; large unsigned values get a `ULL`
    /// suffix since no signed type can hold them
    pub fn cpp_literal(self) -> String {
        match self {
            EnumValue::Signed(value) => value.to_string(),
            EnumValue::Unsigned(value) => format!("{}ULL", value),
        }
    }
}

impl From<i64> for EnumValue {
    fn from(value: i64) -> Self {
        EnumValue::Signed(value)
    }
}

impl From<i32> for EnumValue {
    fn from(value: i32) -> Self {
        EnumValue::Signed(value.into())
    }
}

impl From<u64> for EnumValue {
    fn from(value: u64) -> Self {
        i64::try_from(value).map_or(EnumValue::Unsigned(value), EnumValue::Signed)
    }
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnumValue::Signed(value) => write!(f, "{}", value),
            EnumValue::Unsigned(value) => write!(f, "{}", value),
        }
    }
}

/// A single enumerator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumConstant {
    pub name: String,
    pub value: EnumValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumType {
    pub name: String,
    /// Underlying integer type, as spelled by the front-end
    pub underlying_type: String,
    pub declaring_file: PathBuf,
    constants: Vec<EnumConstant>,
}

impl EnumType {
    pub fn new(
        name: impl Into<String>,
        underlying_type: impl Into<String>,
        declaring_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            underlying_type: underlying_type.into(),
            declaring_file: declaring_file.into(),
            constants: Vec::new(),
        }
    }

    pub fn add_constant(&mut self, name: impl Into<String>, value: impl Into<EnumValue>) {
        self.constants.push(EnumConstant {
            name: name.into(),
            value: value.into(),
        });
    }

    /// Enumerators in declaration order
    pub fn constants(&self) -> &[EnumConstant] {
        &self.constants
    }

    pub fn type_name(&self) -> &str {
        short_name(&self.name)
    }
}

/// A union definition.
///
/// HDF5 has no tagged-union datatype, so a union is written out as a compound
/// holding only its [representative](UnionType::representative) member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnionType {
    pub name: String,
    pub declaring_file: PathBuf,
    fields: Vec<FieldElement>,
}

impl UnionType {
    pub fn new(name: impl Into<String>, declaring_file: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            declaring_file: declaring_file.into(),
            fields: Vec::new(),
        }
    }

    pub fn add_field(&mut self, field: FieldElement) {
        self.fields.push(field);
    }

    pub fn fields(&self) -> &[FieldElement] {
        &self.fields
    }

    pub fn type_name(&self) -> &str {
        short_name(&self.name)
    }

    /// The member that stands in for the whole union: the first compound
    /// member if there is one, otherwise the first member. `None` for a union
    /// without members.
    pub fn representative(&self) -> Option<&FieldElement> {
        self.fields
            .iter()
            .find(|field| field.type_kind == TypeKind::Compound)
            .or_else(|| self.fields.first())
    }
}

/// Closed set of descriptors stored in the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeDescriptor {
    Atomic(AtomicType),
    Compound(CompoundType),
    Enum(EnumType),
    Union(UnionType),
}

impl TypeDescriptor {
    pub fn kind(&self) -> TypeKind {
        match self {
            TypeDescriptor::Atomic(_) => TypeKind::Atomic,
            TypeDescriptor::Compound(_) => TypeKind::Compound,
            TypeDescriptor::Enum(_) => TypeKind::Enum,
            TypeDescriptor::Union(_) => TypeKind::Union,
        }
    }

    pub fn qualified_name(&self) -> &str {
        match self {
            TypeDescriptor::Atomic(atomic) => atomic.spelling(),
            TypeDescriptor::Compound(compound) => &compound.name,
            TypeDescriptor::Enum(enumeration) => &enumeration.name,
            TypeDescriptor::Union(union) => &union.name,
        }
    }

    /// File the type was defined in; atomics have none
    pub fn declaring_file(&self) -> Option<&Path> {
        match self {
            TypeDescriptor::Atomic(_) => None,
            TypeDescriptor::Compound(compound) => Some(&compound.declaring_file),
            TypeDescriptor::Enum(enumeration) => Some(&enumeration.declaring_file),
            TypeDescriptor::Union(union) => Some(&union.declaring_file),
        }
    }

    /// Members of a compound or union; empty for everything else
    pub fn fields(&self) -> &[FieldElement] {
        match self {
            TypeDescriptor::Compound(compound) => compound.fields(),
            TypeDescriptor::Union(union) => union.fields(),
            TypeDescriptor::Atomic(_) | TypeDescriptor::Enum(_) => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, type_name: &str, kind: TypeKind) -> FieldElement {
        FieldElement::new(name, type_name, kind, 1)
    }

    #[test]
    fn test_compound_preserves_field_order() {
        let mut compound = CompoundType::new("Sample", "sample.h");
        for name in ["zeta", "alpha", "mid", "beta"] {
            compound.add_field(field(name, "int", TypeKind::Atomic));
        }

        let names: Vec<_> = compound.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid", "beta"]);
    }

    #[test]
    fn test_enum_values_keep_the_unsigned_range() {
        assert_eq!(EnumValue::from(7u64), EnumValue::Signed(7));
        assert_eq!(EnumValue::from(u64::MAX), EnumValue::Unsigned(u64::MAX));
        assert_eq!(EnumValue::from(-1).cpp_literal(), "-1");
        assert_eq!(
            EnumValue::from(u64::MAX).cpp_literal(),
            "18446744073709551615ULL"
        );

        let values: Vec<EnumValue> =
            serde_json::from_str("[-2, 3, 18446744073709551615]").unwrap();
        assert_eq!(
            values,
            vec![
                EnumValue::Signed(-2),
                EnumValue::Signed(3),
                EnumValue::Unsigned(u64::MAX)
            ]
        );
    }

    #[test]
    fn test_union_prefers_first_compound_member() {
        let mut union = UnionType::new("Payload", "payload.h");
        union.add_field(field("x", "int", TypeKind::Atomic));
        union.add_field(field("y", "Point", TypeKind::Compound));
        union.add_field(field("z", "double", TypeKind::Atomic));

        assert_eq!(union.representative().map(|f| f.name.as_str()), Some("y"));
    }

    #[test]
    fn test_union_falls_back_to_first_member() {
        let mut union = UnionType::new("Payload", "payload.h");
        union.add_field(field("x", "int", TypeKind::Atomic));
        union.add_field(field("z", "double", TypeKind::Atomic));

        assert_eq!(union.representative().map(|f| f.name.as_str()), Some("x"));
    }

    #[test]
    fn test_union_without_members_has_no_representative() {
        let union = UnionType::new("Empty", "payload.h");
        assert!(union.representative().is_none());
    }

    #[test]
    fn test_enum_member_does_not_count_as_compound() {
        let mut union = UnionType::new("Tagged", "payload.h");
        union.add_field(field("mode", "Mode", TypeKind::Enum));
        union.add_field(field("raw", "unsigned int", TypeKind::Atomic));

        assert_eq!(union.representative().map(|f| f.name.as_str()), Some("mode"));
    }

    #[test]
    fn test_short_names() {
        let compound = CompoundType::new("outer::inner::Point", "p.h");
        assert_eq!(compound.type_name(), "Point");
        let enumeration = EnumType::new("Color", "int", "c.h");
        assert_eq!(enumeration.type_name(), "Color");
    }

    #[test]
    fn test_array_detection() {
        assert!(!FieldElement::new("a", "int", TypeKind::Atomic, 1).is_array());
        assert!(FieldElement::new("a", "int", TypeKind::Atomic, 3).is_array());
    }
}
