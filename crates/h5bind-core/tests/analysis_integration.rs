//! Integration tests for analysing a serialised declaration tree

use std::path::{Path, PathBuf};

use h5bind_core::decl::{Diagnostic, DiagnosticSeverity};
use h5bind_core::logging::MemorySink;
use h5bind_core::pipeline::analyze;
use h5bind_core::types::{EnumValue, TypeKind};
use h5bind_core::{CoreError, LogLevel, Logger, TranslationUnit, TypeDescriptor};
use pretty_assertions::assert_eq;

fn fixture() -> TranslationUnit {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/sample.json");
    TranslationUnit::load(&path).expect("fixture should parse")
}

#[test]
fn test_fixture_builds_registry() {
    let sink = MemorySink::new();
    let logger = Logger::with_sink(LogLevel::Info, false, sink.clone());
    let view = analyze(&fixture(), &[], &logger).unwrap();
    let registry = view.registry();

    // 15 atomics plus tm, geo::Point, the enum, MyClass, SampleStruct2, Value, Nothing
    assert_eq!(registry.len(), 22);

    let my_class = match registry.lookup("MyClass").unwrap() {
        TypeDescriptor::Compound(compound) => compound,
        other => panic!("expected compound, got {:?}", other.kind()),
    };
    let fields: Vec<_> = my_class
        .fields()
        .iter()
        .map(|f| (f.name.as_str(), f.type_name.as_str(), f.element_count))
        .collect();
    assert_eq!(
        fields,
        vec![
            ("i", "unsigned int", 21),
            ("k", "int", 21),
            ("enuma", "testns::my_cool_enum", 1),
            ("modes", "testns::my_cool_enum", 2),
        ]
    );

    match registry.lookup("testns::my_cool_enum").unwrap() {
        TypeDescriptor::Enum(enumeration) => {
            let constants: Vec<_> = enumeration
                .constants()
                .iter()
                .map(|c| (c.name.as_str(), c.value))
                .collect();
            assert_eq!(
                constants,
                vec![("value_1", EnumValue::from(1)), ("value_2", EnumValue::from(3))]
            );
            assert_eq!(enumeration.underlying_type, "unsigned int");
        }
        other => panic!("expected enum, got {:?}", other.kind()),
    }
}

#[test]
fn test_unresolved_field_dropped_with_single_warning() {
    let sink = MemorySink::new();
    let logger = Logger::with_sink(LogLevel::Info, false, sink.clone());
    let view = analyze(&fixture(), &[], &logger).unwrap();

    let sample = view.registry().lookup("SampleStruct2").unwrap();
    let names: Vec<_> = sample.fields().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["type1", "testType", "origin", "stamp"]);
    assert_eq!(sample.fields()[1].type_kind, TypeKind::Compound);

    assert_eq!(sink.count(LogLevel::Warning), 1);
    let (_, warning) = sink
        .records()
        .into_iter()
        .find(|(level, _)| *level == LogLevel::Warning)
        .unwrap();
    assert!(warning.contains("another_typedef_lol"));
}

#[test]
fn test_unresolved_field_is_fatal_with_warnings_as_errors() {
    let logger = Logger::with_sink(LogLevel::Info, true, MemorySink::new());
    let err = analyze(&fixture(), &[], &logger).unwrap_err();
    assert!(matches!(err, CoreError::FatalLog(message) if message.contains("another_typedef_lol")));
}

#[test]
fn test_file_scope_of_fixture() {
    let logger = Logger::with_sink(LogLevel::Info, false, MemorySink::new());
    let view = analyze(&fixture(), &[], &logger).unwrap();

    let local: Vec<_> = view
        .compound_types_in_file()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(local, vec!["MyClass", "SampleStruct2"]);
    assert_eq!(view.enum_types_in_file().count(), 1);
    assert_eq!(view.union_types_in_file().count(), 2);

    let includes: Vec<PathBuf> = view
        .resolved_includes()
        .iter()
        .map(|include| include.raw().to_path_buf())
        .collect();
    assert_eq!(
        includes,
        vec![PathBuf::from("/usr/include/time.h"), PathBuf::from("include/geometry.h")]
    );
}

#[test]
fn test_error_diagnostic_aborts_before_building() {
    let mut unit = fixture();
    unit.diagnostics.push(Diagnostic {
        severity: DiagnosticSeverity::Fatal,
        message: "'test2.h' file not found".into(),
        location: Some("include/test.h:4:10".into()),
    });

    let sink = MemorySink::new();
    let logger = Logger::with_sink(LogLevel::Debug3, false, sink.clone());
    let err = analyze(&unit, &[], &logger).unwrap_err();

    let message = err.to_string();
    assert!(message.starts_with("1 compiler error(s) were encountered when parsing include/test.h"));
    assert!(message.contains("'test2.h' file not found"));
    assert!(sink.records().is_empty());
}
