//! Binding class declarations (`<stem>_DxTransform.h`)

use tracing::instrument;

use crate::artifacts::write_preamble;
use crate::emitter::Emitter;
use crate::error::CodegenError;
use crate::naming;
use crate::plan::{Binding, BindingPlan};

#[instrument(skip_all, fields(file = plan.source_file_name()))]
pub fn render_header(plan: &BindingPlan<'_>, indent_size: usize) -> Result<String, CodegenError> {
    let mut out = Emitter::new(indent_size);
    write_preamble(&mut out, plan.source_file_name())?;

    let guard = naming::include_guard(plan.stem());
    out.line(format_args!("#ifndef {}", guard))?;
    out.line(format_args!("#define {}", guard))?;
    out.blank()?;

    out.line(format_args!("#include \"{}\"", naming::BASE_HEADER))?;
    out.line(format_args!("#include \"{}\"", plan.source_file_name()))?;
    for header in plan.dependency_headers() {
        out.line(format_args!("#include \"{}\"", header))?;
    }

    for binding in plan.bindings() {
        out.blank()?;
        write_class_declaration(&mut out, binding)?;
    }

    out.blank()?;
    out.line(format_args!("#endif"))?;
    Ok(out.finish())
}

fn write_class_declaration(out: &mut Emitter, binding: &Binding<'_>) -> Result<(), CodegenError> {
    let blocks = naming::namespace_blocks(&binding.name);
    for block in &blocks {
        out.open(format_args!("namespace {} {{", block))?;
    }

    let class = naming::binding_class_name(&binding.name);
    out.line(format_args!(
        "class {} : public {} {{",
        class,
        naming::base_class(&binding.name, binding.target.category())
    ))?;
    out.line(format_args!("public:"))?;
    out.push();
    out.line(format_args!("static {}& instance() noexcept;", class))?;
    out.pop();
    out.blank()?;
    out.line(format_args!("private:"))?;
    out.push();
    out.line(format_args!("{}() noexcept;", class))?;
    out.pop();
    out.line(format_args!("}};"))?;

    for _ in &blocks {
        out.close(format_args!("}}"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use h5bind_core::types::{CompoundType, EnumType, TypeDescriptor};
    use h5bind_core::{FileExcluder, FileScopeView, Logger, TypeRegistry};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_header_layout() {
        let mut registry = TypeRegistry::new();
        registry
            .register(
                "testns::my_cool_enum",
                TypeDescriptor::Enum(EnumType::new("testns::my_cool_enum", "int", "/src/test.h")),
            )
            .unwrap();
        registry
            .register(
                "Sample",
                TypeDescriptor::Compound(CompoundType::new("Sample", "/src/test.h")),
            )
            .unwrap();
        registry
            .register(
                "Other",
                TypeDescriptor::Compound(CompoundType::new("Other", "/src/test2.h")),
            )
            .unwrap();
        let view = FileScopeView::new(registry, "/src/test.h", &[]);
        let plan = BindingPlan::build(&view, &FileExcluder::none(), &Logger::default()).unwrap();

        let header = render_header(&plan, 4).unwrap();
        let body = header
            .split_once("#ifndef")
            .map(|(_, rest)| rest)
            .unwrap();

        assert_eq!(
            body,
            r#" TEST_DX_TRANSFORM_H
#define TEST_DX_TRANSFORM_H

#include "DxTransformBase.h"
#include "test.h"
#include "test2_DxTransform.h"

namespace testns_Dx {
    class my_cool_enumDxTransform : public DxTransform::DxTransformBase<testns::my_cool_enum, H5::EnumType> {
    public:
        static my_cool_enumDxTransform& instance() noexcept;

    private:
        my_cool_enumDxTransform() noexcept;
    };
}

class SampleDxTransform : public DxTransform::DxTransformBase<Sample, H5::CompType> {
public:
    static SampleDxTransform& instance() noexcept;

private:
    SampleDxTransform() noexcept;
};

#endif
"#
        );
        assert!(header.contains("test.h"));
    }
}
