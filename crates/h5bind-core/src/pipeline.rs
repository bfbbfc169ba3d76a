//! Front half of a generation run: diagnostics gate, type graph, file scope

use std::path::PathBuf;

use tracing::{info, instrument};

use crate::builder::TypeGraphBuilder;
use crate::decl::TranslationUnit;
use crate::error::CoreError;
use crate::file_scope::FileScopeView;
use crate::logging::{LogLevel, Logger};

/// Reject units the front-end failed on, then build the registry and scope it
/// to the unit's file. Nothing is built when any error diagnostic is present.
#[instrument(skip_all, fields(file = %unit.file.display()))]
pub fn analyze(
    unit: &TranslationUnit,
    include_dirs: &[PathBuf],
    logger: &Logger,
) -> Result<FileScopeView, CoreError> {
    unit.check_diagnostics()?;

    let registry = TypeGraphBuilder::new(logger).build(&unit.root)?;
    logger.check(
        LogLevel::Info,
        format_args!(
            "Found {} compound, {} enum and {} union types for {}",
            registry.compound_types().count(),
            registry.enum_types().count(),
            registry.union_types().count(),
            unit.file.display()
        ),
    )?;

    let view = FileScopeView::new(registry, unit.file.clone(), include_dirs);
    info!(includes = view.resolved_includes().len(), "analysis complete");
    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::{DeclKind, DeclNode, Diagnostic, DiagnosticSeverity};
    use crate::logging::MemorySink;

    fn unit(diagnostics: Vec<Diagnostic>) -> TranslationUnit {
        TranslationUnit {
            file: PathBuf::from("/src/sample.h"),
            diagnostics,
            root: DeclNode::translation_unit("/src/sample.h").with_children([
                DeclNode::definition(DeclKind::Struct, "Local", "Local", "/src/sample.h")
                    .with_children([DeclNode::scalar_field("x", "int", "int")]),
            ]),
        }
    }

    #[test]
    fn test_analyze_builds_file_scope() {
        let logger = Logger::with_sink(LogLevel::Info, false, MemorySink::new());
        let view = analyze(&unit(Vec::new()), &[], &logger).unwrap();
        assert_eq!(view.compound_types_in_file().count(), 1);
        assert!(view.resolved_includes().is_empty());
    }

    #[test]
    fn test_error_diagnostics_stop_before_building() {
        let sink = MemorySink::new();
        let logger = Logger::with_sink(LogLevel::Debug3, false, sink.clone());
        let diagnostics = vec![Diagnostic {
            severity: DiagnosticSeverity::Error,
            message: "expected ';' after struct".into(),
            location: None,
        }];

        let err = analyze(&unit(diagnostics), &[], &logger).unwrap_err();
        assert!(err.is_front_end_error());
        assert!(sink.records().is_empty());
    }
}
