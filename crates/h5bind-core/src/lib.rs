//! Type model and analysis for the h5bind HDF5 binding generator
//!
//! A run walks the front-end's declaration tree with [`TypeGraphBuilder`],
//! producing a [`TypeRegistry`], and wraps it in a [`FileScopeView`] for the
//! header being generated.

pub mod atomic;
pub mod builder;
pub mod config;
pub mod decl;
pub mod dependency;
pub mod error;
pub mod exclusion;
pub mod file_scope;
pub mod include_path;
pub mod logging;
pub mod pipeline;
pub mod qualified_name;
pub mod registry;
pub mod types;

pub use atomic::AtomicType;
pub use builder::TypeGraphBuilder;
pub use config::GeneratorConfig;
pub use decl::{DeclCursor, DeclKind, DeclNode, TranslationUnit};
pub use error::CoreError;
pub use exclusion::FileExcluder;
pub use file_scope::FileScopeView;
pub use logging::{LogLevel, Logger};
pub use qualified_name::QualifiedName;
pub use registry::TypeRegistry;
pub use types::{
    CompoundType, EnumType, EnumValue, FieldElement, TypeDescriptor, TypeKind, UnionType,
};
