//! Walks a declaration tree and fills a [`TypeRegistry`]
//!
//! Records and enums are registered before their children are visited, and a
//! stack of the enclosing container names tells fields and enum constants
//! which registry entry to attach to. Containers are always addressed by
//! name through the registry.

use tracing::{debug, instrument};

use crate::decl::{DeclCursor, DeclKind, FieldType, TypeSpelling};
use crate::error::CoreError;
use crate::logging::{LogLevel, Logger};
use crate::registry::TypeRegistry;
use crate::types::{CompoundType, EnumType, FieldElement, TypeDescriptor, UnionType};

pub struct TypeGraphBuilder<'a> {
    registry: TypeRegistry,
    /// Qualified names of the records/enums currently being visited, innermost last
    containers: Vec<String>,
    logger: &'a Logger,
}

impl<'a> TypeGraphBuilder<'a> {
    pub fn new(logger: &'a Logger) -> Self {
        Self {
            registry: TypeRegistry::new(),
            containers: Vec::new(),
            logger,
        }
    }

    /// Visit every descendant of `root` and return the populated registry
    #[instrument(skip_all, fields(root = %root.spelling()))]
    pub fn build<C: DeclCursor>(mut self, root: C) -> Result<TypeRegistry, CoreError> {
        self.visit_children(&root)?;
        debug!(types = self.registry.len(), "type graph complete");
        Ok(self.registry)
    }

    fn visit_children<C: DeclCursor>(&mut self, cursor: &C) -> Result<(), CoreError> {
        for child in cursor.children() {
            if child.spelling().is_empty() {
                continue;
            }

            match child.kind() {
                DeclKind::Namespace => self.visit_children(&child)?,
                DeclKind::Struct | DeclKind::Class => {
                    if child.is_definition() {
                        let name = child.qualified_name().to_string();
                        let compound = CompoundType::new(name.clone(), declaring_file(&child));
                        self.register_and_visit(&child, name, TypeDescriptor::Compound(compound))?;
                    }
                }
                DeclKind::Union => {
                    if child.is_definition() {
                        let name = child.qualified_name().to_string();
                        let union = UnionType::new(name.clone(), declaring_file(&child));
                        self.register_and_visit(&child, name, TypeDescriptor::Union(union))?;
                    }
                }
                DeclKind::Enum => {
                    if child.is_definition() {
                        let name = child.qualified_name().to_string();
                        let underlying = child.enum_integer_type().ok_or_else(|| {
                            CoreError::InvalidDeclaration(format!(
                                "enum '{}' has no underlying integer type",
                                name
                            ))
                        })?;
                        let enumeration =
                            EnumType::new(name.clone(), underlying, declaring_file(&child));
                        self.register_and_visit(&child, name, TypeDescriptor::Enum(enumeration))?;
                    }
                }
                DeclKind::EnumConstant => self.add_enum_constant(&child)?,
                DeclKind::Field => self.add_field(&child)?,
                DeclKind::TranslationUnit | DeclKind::Other => {}
            }
        }
        Ok(())
    }

    fn register_and_visit<C: DeclCursor>(
        &mut self,
        cursor: &C,
        name: String,
        descriptor: TypeDescriptor,
    ) -> Result<(), CoreError> {
        self.logger.check(
            LogLevel::Debug2,
            format_args!("Registering {:?} {}", descriptor.kind(), name),
        )?;
        self.registry.register(name.clone(), descriptor)?;

        self.containers.push(name);
        let result = self.visit_children(cursor);
        self.containers.pop();
        result
    }

    fn current_container(&self, member: &str) -> Result<&str, CoreError> {
        self.containers
            .last()
            .map(String::as_str)
            .ok_or_else(|| CoreError::DetachedMember {
                member: member.to_string(),
            })
    }

    fn add_enum_constant<C: DeclCursor>(&mut self, cursor: &C) -> Result<(), CoreError> {
        let constant = cursor.spelling();
        let value = cursor.enum_value().ok_or_else(|| {
            CoreError::InvalidDeclaration(format!("enum constant '{}' has no value", constant))
        })?;
        let owner = self.current_container(constant)?.to_string();

        match self.registry.lookup_mut(&owner)? {
            TypeDescriptor::Enum(enumeration) => {
                enumeration.add_constant(constant, value);
                Ok(())
            }
            other => Err(CoreError::InvalidDeclaration(format!(
                "enum constant '{}' found inside {:?} '{}'",
                constant,
                other.kind(),
                owner
            ))),
        }
    }

    fn add_field<C: DeclCursor>(&mut self, cursor: &C) -> Result<(), CoreError> {
        let field_name = cursor.spelling();
        let field_type = cursor.field_type().ok_or_else(|| {
            CoreError::InvalidDeclaration(format!("field '{}' has no type information", field_name))
        })?;
        let owner = self.current_container(field_name)?.to_string();

        // HDF5_FIELD_OFFSET cannot take the address of a bitfield
        if let Some(width) = cursor.bit_width() {
            return self.logger.check(
                LogLevel::Warning,
                format_args!(
                    "Bitfield members are not supported: {} : {} (field '{}' of {} dropped)",
                    field_type_spelling(field_type),
                    width,
                    field_name,
                    owner
                ),
            );
        }

        let (element, count) = match field_type {
            FieldType::Scalar(spelling) => (spelling, 1),
            FieldType::ConstantArray { element, count } => (element, *count),
        };
        let type_name = element.resolved();

        if !self.registry.is_known(type_name) {
            return self.report_unresolved(field_name, &owner, field_type, element);
        }

        let type_kind = self.registry.lookup(type_name)?.kind();
        self.logger.check(
            LogLevel::Debug1,
            format_args!(
                "{} var: {} (child of {})",
                if count > 1 { "Array" } else { "Non-array" },
                field_name,
                owner
            ),
        )?;
        let field = FieldElement::new(field_name, type_name, type_kind, count);

        match self.registry.lookup_mut(&owner)? {
            TypeDescriptor::Compound(compound) => compound.add_field(field),
            TypeDescriptor::Union(union) => union.add_field(field),
            other => {
                return Err(CoreError::InvalidDeclaration(format!(
                    "field '{}' found inside {:?} '{}'",
                    field_name,
                    other.kind(),
                    owner
                )))
            }
        }
        Ok(())
    }

    /// The field is dropped; the warning may still end the run under
    /// warnings-as-errors.
    fn report_unresolved(
        &self,
        field_name: &str,
        owner: &str,
        field_type: &FieldType,
        element: &TypeSpelling,
    ) -> Result<(), CoreError> {
        let message = match field_type {
            FieldType::Scalar(_) => format!(
                "Unknown type not known to type manager: {} (field '{}' of {} dropped)",
                element.spelling, field_name, owner
            ),
            FieldType::ConstantArray { count, .. } => format!(
                "Unknown array type not known to type manager: {} | {}[{}] (field '{}' of {} dropped)",
                element.resolved(),
                element.spelling,
                count,
                field_name,
                owner
            ),
        };
        self.logger.check(LogLevel::Warning, message)
    }
}

fn field_type_spelling(field_type: &FieldType) -> &str {
    match field_type {
        FieldType::Scalar(spelling) => &spelling.spelling,
        FieldType::ConstantArray { element, .. } => &element.spelling,
    }
}

fn declaring_file<C: DeclCursor>(cursor: &C) -> std::path::PathBuf {
    cursor
        .location()
        .map(|path| path.to_path_buf())
        .unwrap_or_default()
}
