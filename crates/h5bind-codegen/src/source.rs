//! Binding class definitions (`<stem>_DxTransform.cpp`)
//!
//! Each constructor describes the in-memory layout of its type to HDF5:
//!
//! - atomic members map onto `H5::PredType` native types
//! - struct, class and union members reuse the dependent type's binding,
//!   fetched once per constructor through its `instance()` accessor
//! - fixed-size arrays become one `H5::ArrayType` member, except arrays of
//!   enums, which are registered element by element as `name[i]`
//! - enums insert every enumerator with its value
//!
//! Offsets come from `HDF5_FIELD_OFFSET` applied to a zero-initialised
//! instance of the owning type.

use std::collections::HashSet;

use h5bind_core::qualified_name::QualifiedName;
use h5bind_core::types::{EnumType, FieldElement, TypeDescriptor};
use h5bind_core::{LogLevel, Logger, TypeRegistry};
use tracing::instrument;

use crate::artifacts::write_preamble;
use crate::emitter::Emitter;
use crate::error::CodegenError;
use crate::naming;
use crate::plan::{Binding, BindingPlan, BindingTarget};

const DATATYPE_VAR: &str = "datatype";
const OFFSET_INSTANCE: &str = "zzz_tmp";

#[instrument(skip_all, fields(file = plan.source_file_name()))]
pub fn render_source(
    plan: &BindingPlan<'_>,
    logger: &Logger,
    indent_size: usize,
) -> Result<String, CodegenError> {
    let mut out = Emitter::new(indent_size);
    write_preamble(&mut out, plan.source_file_name())?;
    out.line(format_args!(
        "#include \"{}\"",
        naming::generated_header_name(plan.stem())
    ))?;

    for binding in plan.bindings() {
        out.blank()?;
        write_class_definition(&mut out, plan.registry(), binding, logger)?;
    }
    Ok(out.finish())
}

fn write_class_definition(
    out: &mut Emitter,
    registry: &TypeRegistry,
    binding: &Binding<'_>,
    logger: &Logger,
) -> Result<(), CodegenError> {
    let blocks = naming::namespace_blocks(&binding.name);
    for block in &blocks {
        out.open(format_args!("namespace {} {{", block))?;
    }

    let class = naming::binding_class_name(&binding.name);
    out.open(format_args!("{0}& {0}::instance() noexcept {{", class))?;
    out.line(format_args!("static {} binding {{}};", class))?;
    out.line(format_args!("return binding;"))?;
    out.close(format_args!("}}"))?;
    out.blank()?;

    out.open(format_args!("{0}::{0}() noexcept {{", class))?;
    out.line(format_args!(
        "{}& {} = mutable_datatype();",
        binding.target.category().as_str(),
        DATATYPE_VAR
    ))?;
    match binding.target {
        BindingTarget::Enum(enumeration) => write_enum_body(out, enumeration)?,
        BindingTarget::Compound(_) | BindingTarget::Union { .. } => {
            write_member_body(out, registry, binding, logger)?
        }
    }
    out.close(format_args!("}}"))?;

    for _ in &blocks {
        out.close(format_args!("}}"))?;
    }
    Ok(())
}

fn write_enum_body(out: &mut Emitter, enumeration: &EnumType) -> Result<(), CodegenError> {
    out.line(format_args!("{} ev {{}};", enumeration.underlying_type))?;
    for constant in enumeration.constants() {
        out.line(format_args!(
            "{}.insert(\"{}\", (ev = {}, &ev));",
            DATATYPE_VAR,
            constant.name,
            constant.value.cpp_literal()
        ))?;
    }
    Ok(())
}

fn write_member_body(
    out: &mut Emitter,
    registry: &TypeRegistry,
    binding: &Binding<'_>,
    logger: &Logger,
) -> Result<(), CodegenError> {
    let members = binding.target.members();
    if members.is_empty() {
        return Ok(());
    }

    out.line(format_args!(
        "static constexpr {} {} {{}};",
        binding.name, OFFSET_INSTANCE
    ))?;
    let mut body = MemberWriter {
        out,
        registry,
        logger,
        dependents: HashSet::new(),
    };
    for field in members {
        body.write_member(field)?;
    }
    Ok(())
}

/// Emits the members of one constructor; remembers which dependent bindings
/// have already been fetched in it
struct MemberWriter<'a, 'o> {
    out: &'o mut Emitter,
    registry: &'a TypeRegistry,
    logger: &'a Logger,
    dependents: HashSet<String>,
}

impl MemberWriter<'_, '_> {
    fn write_member(&mut self, field: &FieldElement) -> Result<(), CodegenError> {
        match self.registry.lookup(&field.type_name)? {
            TypeDescriptor::Atomic(atomic) => {
                let tag = format!("H5::PredType::{}", atomic.native_tag());
                self.insert_scalar_or_array(field, &tag)
            }
            TypeDescriptor::Compound(compound) => {
                let datatype = self.dependent_datatype(&compound.name)?;
                self.insert_scalar_or_array(field, &datatype)
            }
            TypeDescriptor::Union(union) => {
                if union.representative().is_none() {
                    self.logger.check(
                        LogLevel::Warning,
                        format_args!(
                            "Field {} uses union {} which has no members; field omitted",
                            field.name, union.name
                        ),
                    )?;
                    return Ok(());
                }
                let datatype = self.dependent_datatype(&union.name)?;
                self.insert_scalar_or_array(field, &datatype)
            }
            TypeDescriptor::Enum(enumeration) => {
                let datatype = self.dependent_datatype(&enumeration.name)?;
                if field.is_array() {
                    for index in 0..field.element_count {
                        let element = format!("{}[{}]", field.name, index);
                        self.insert_member(&element, &element, &datatype)?;
                    }
                    Ok(())
                } else {
                    self.insert_member(&field.name, &field.name, &datatype)
                }
            }
        }
    }

    fn insert_scalar_or_array(
        &mut self,
        field: &FieldElement,
        datatype: &str,
    ) -> Result<(), CodegenError> {
        if !field.is_array() {
            return self.insert_member(&field.name, &field.name, datatype);
        }
        self.out.line(format_args!(
            "hsize_t {}_dims[1] = {{{}}};",
            field.name, field.element_count
        ))?;
        let array = format!("H5::ArrayType({}, 1, {}_dims)", datatype, field.name);
        self.insert_member(&field.name, &format!("{}[0]", field.name), &array)
    }

    fn insert_member(
        &mut self,
        member: &str,
        offset_of: &str,
        datatype: &str,
    ) -> Result<(), CodegenError> {
        self.out.line(format_args!(
            "{}.insertMember(\"{}\", HDF5_FIELD_OFFSET({}, {}), {});",
            DATATYPE_VAR, member, OFFSET_INSTANCE, offset_of, datatype
        ))?;
        Ok(())
    }

    /// Expression for a dependent type's datatype, fetching its binding the
    /// first time the constructor needs it
    fn dependent_datatype(&mut self, type_name: &str) -> Result<String, CodegenError> {
        let name = QualifiedName::parse(type_name)?;
        let variable = naming::dependent_variable(&name);
        if self.dependents.insert(variable.clone()) {
            self.out.line(format_args!(
                "auto& {} = {}::instance();",
                variable,
                naming::qualified_binding_name(&name)
            ))?;
        }
        Ok(format!("{}.h5_datatype()", variable))
    }
}
