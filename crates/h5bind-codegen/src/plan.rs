//! What a run emits, decided once and shared by the header and source
//! renderers: the ordered bindings and the dependency headers to include.

use std::collections::{HashMap, HashSet};

use h5bind_core::dependency::TypeDependencyGraph;
use h5bind_core::qualified_name::QualifiedName;
use h5bind_core::types::{CompoundType, EnumType, FieldElement, UnionType};
use h5bind_core::{FileExcluder, FileScopeView, LogLevel, Logger, TypeRegistry};
use tracing::debug;

use crate::error::CodegenError;
use crate::naming::{self, H5Category};

/// A file-local type that gets a binding class
#[derive(Debug, Clone, Copy)]
pub enum BindingTarget<'v> {
    Enum(&'v EnumType),
    Compound(&'v CompoundType),
    /// Unions are stored as a compound holding only their representative member
    Union {
        union: &'v UnionType,
        representative: &'v FieldElement,
    },
}

impl<'v> BindingTarget<'v> {
    pub fn name(&self) -> &'v str {
        match *self {
            BindingTarget::Enum(enumeration) => &enumeration.name,
            BindingTarget::Compound(compound) => &compound.name,
            BindingTarget::Union { union, .. } => &union.name,
        }
    }

    pub fn category(&self) -> H5Category {
        match self {
            BindingTarget::Enum(_) => H5Category::Enum,
            BindingTarget::Compound(_) | BindingTarget::Union { .. } => H5Category::Compound,
        }
    }

    /// Members registered by the binding's constructor
    pub fn members(&self) -> &'v [FieldElement] {
        match *self {
            BindingTarget::Enum(_) => &[],
            BindingTarget::Compound(compound) => compound.fields(),
            BindingTarget::Union { representative, .. } => std::slice::from_ref(representative),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Binding<'v> {
    pub name: QualifiedName,
    pub target: BindingTarget<'v>,
}

#[derive(Debug)]
pub struct BindingPlan<'v> {
    registry: &'v TypeRegistry,
    source_file_name: String,
    stem: String,
    dependency_headers: Vec<String>,
    bindings: Vec<Binding<'v>>,
}

impl<'v> BindingPlan<'v> {
    pub fn build(
        view: &'v FileScopeView,
        excluder: &FileExcluder,
        logger: &Logger,
    ) -> Result<Self, CodegenError> {
        let source_file = view.source_file();
        let stem = naming::source_stem(source_file).ok_or_else(|| {
            CodegenError::Generation(format!(
                "Cannot derive output file names from {}",
                source_file.display()
            ))
        })?;
        let source_file_name = source_file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let dependency_headers = dependency_headers(view, excluder);
        let bindings = ordered_bindings(view, logger)?;

        debug!(
            file = %source_file.display(),
            bindings = bindings.len(),
            includes = dependency_headers.len(),
            "binding plan ready"
        );

        Ok(Self {
            registry: view.registry(),
            source_file_name,
            stem,
            dependency_headers,
            bindings,
        })
    }

    pub fn registry(&self) -> &'v TypeRegistry {
        self.registry
    }

    /// File name of the header the bindings are generated for
    pub fn source_file_name(&self) -> &str {
        &self.source_file_name
    }

    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// Generated headers of non-excluded dependency files
    pub fn dependency_headers(&self) -> &[String] {
        &self.dependency_headers
    }

    /// Bindings in emission order, dependencies first
    pub fn bindings(&self) -> &[Binding<'v>] {
        &self.bindings
    }
}

fn dependency_headers(view: &FileScopeView, excluder: &FileExcluder) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut headers = Vec::new();
    for include in view.resolved_includes() {
        if excluder.is_excluded(include.absolute()) {
            debug!(header = %include.absolute().display(), "dependency header excluded");
            continue;
        }
        let Some(stem) = naming::source_stem(include.raw()) else {
            continue;
        };
        let header = naming::generated_header_name(&stem);
        if seen.insert(header.clone()) {
            headers.push(header);
        }
    }
    headers
}

fn ordered_bindings<'v>(
    view: &'v FileScopeView,
    logger: &Logger,
) -> Result<Vec<Binding<'v>>, CodegenError> {
    let mut targets: Vec<BindingTarget<'v>> = Vec::new();
    targets.extend(view.enum_types_in_file().map(BindingTarget::Enum));
    targets.extend(view.compound_types_in_file().map(BindingTarget::Compound));
    for union in view.union_types_in_file() {
        match union.representative() {
            Some(representative) => targets.push(BindingTarget::Union {
                union,
                representative,
            }),
            None => logger.check(
                LogLevel::Debug1,
                format_args!("Skipping union {} because it has no members", union.name),
            )?,
        }
    }

    let roots: Vec<&str> = targets.iter().map(|target| target.name()).collect();
    let graph = TypeDependencyGraph::from_registry(view.registry());
    let order = graph.emission_order(&roots);

    let mut by_name: HashMap<&str, BindingTarget<'v>> = targets
        .into_iter()
        .map(|target| (target.name(), target))
        .collect();

    let mut bindings = Vec::with_capacity(order.len());
    for name in order {
        if let Some(target) = by_name.remove(name) {
            bindings.push(Binding {
                name: QualifiedName::parse(name)?,
                target,
            });
        }
    }
    Ok(bindings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use h5bind_core::logging::MemorySink;
    use h5bind_core::types::{TypeDescriptor, TypeKind};

    const SOURCE: &str = "/src/sample.h";

    fn view(descriptors: Vec<TypeDescriptor>) -> FileScopeView {
        let mut registry = TypeRegistry::new();
        for descriptor in descriptors {
            let name = descriptor.qualified_name().to_string();
            registry.register(name, descriptor).unwrap();
        }
        FileScopeView::new(registry, SOURCE, &[])
    }

    fn names(plan: &BindingPlan<'_>) -> Vec<String> {
        plan.bindings()
            .iter()
            .map(|binding| binding.name.as_str().to_string())
            .collect()
    }

    #[test]
    fn test_dependencies_are_bound_first() {
        let mut outer = CompoundType::new("Outer", SOURCE);
        outer.add_field(FieldElement::new("inner", "Inner", TypeKind::Compound, 1));
        let mut inner = CompoundType::new("Inner", SOURCE);
        inner.add_field(FieldElement::new("x", "int", TypeKind::Atomic, 1));

        let view = view(vec![
            TypeDescriptor::Compound(outer),
            TypeDescriptor::Compound(inner),
            TypeDescriptor::Enum(EnumType::new("Mode", "int", SOURCE)),
        ]);
        let plan = BindingPlan::build(&view, &FileExcluder::none(), &Logger::default()).unwrap();

        assert_eq!(names(&plan), vec!["Mode", "Inner", "Outer"]);
        assert_eq!(plan.stem(), "sample");
        assert_eq!(plan.source_file_name(), "sample.h");
    }

    #[test]
    fn test_empty_union_is_skipped() {
        let mut filled = UnionType::new("Filled", SOURCE);
        filled.add_field(FieldElement::new("i", "int", TypeKind::Atomic, 1));
        let view = view(vec![
            TypeDescriptor::Union(UnionType::new("Empty", SOURCE)),
            TypeDescriptor::Union(filled),
        ]);

        let sink = MemorySink::new();
        let logger = Logger::with_sink(LogLevel::Debug1, false, sink.clone());
        let plan = BindingPlan::build(&view, &FileExcluder::none(), &logger).unwrap();

        assert_eq!(names(&plan), vec!["Filled"]);
        assert_eq!(sink.count(LogLevel::Debug1), 1);
    }

    #[test]
    fn test_excluded_dependency_headers_are_dropped() {
        let view = view(vec![
            TypeDescriptor::Compound(CompoundType::new("Local", SOURCE)),
            TypeDescriptor::Compound(CompoundType::new("Geo", "/src/geo.h")),
            TypeDescriptor::Compound(CompoundType::new("Tm", "/usr/include/time.h")),
            TypeDescriptor::Compound(CompoundType::new("Geo2", "/src/geo.h")),
        ]);
        let excluder = FileExcluder::from_prefixes(["/usr/include"]);
        let plan = BindingPlan::build(&view, &excluder, &Logger::default()).unwrap();

        assert_eq!(plan.dependency_headers(), ["geo_DxTransform.h"]);
        assert_eq!(names(&plan), vec!["Local"]);
    }

    #[test]
    fn test_union_members_are_its_representative() {
        let mut union = UnionType::new("Value", SOURCE);
        union.add_field(FieldElement::new("i", "int", TypeKind::Atomic, 1));
        union.add_field(FieldElement::new("p", "Point", TypeKind::Compound, 1));
        let view = view(vec![
            TypeDescriptor::Compound(CompoundType::new("Point", SOURCE)),
            TypeDescriptor::Union(union),
        ]);
        let plan = BindingPlan::build(&view, &FileExcluder::none(), &Logger::default()).unwrap();

        let value = &plan.bindings()[1];
        assert_eq!(value.target.category(), H5Category::Compound);
        let members: Vec<_> = value.target.members().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(members, vec!["p"]);
    }
}
