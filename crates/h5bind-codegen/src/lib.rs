//! C++ HDF5 datatype binding generator
//!
//! Renders, for one analysed header, a `<stem>_DxTransform.h` declaring a
//! binding class per file-local enum, struct, class and union, and a
//! `<stem>_DxTransform.cpp` whose constructors describe each type's memory
//! layout to HDF5.

pub mod artifacts;
pub mod emitter;
pub mod error;
pub mod header;
pub mod naming;
pub mod plan;
pub mod source;

use std::path::{Path, PathBuf};

use h5bind_core::{FileExcluder, FileScopeView, Logger};
use tracing::instrument;

pub use artifacts::{Artifact, GeneratedArtifacts};
pub use error::CodegenError;
pub use plan::BindingPlan;

/// Common trait for binding generators
pub trait Codegen {
    fn generate(
        &mut self,
        view: &FileScopeView,
        excluder: &FileExcluder,
    ) -> Result<GeneratedArtifacts, CodegenError>;
}

pub struct BindingCodegen<'l> {
    output_dir: PathBuf,
    indent_size: usize,
    logger: &'l Logger,
}

impl<'l> BindingCodegen<'l> {
    pub fn new(output_dir: impl Into<PathBuf>, logger: &'l Logger) -> Self {
        Self {
            output_dir: output_dir.into(),
            indent_size: 4,
            logger,
        }
    }

    pub fn with_indent_size(mut self, indent_size: usize) -> Self {
        self.indent_size = indent_size;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Generate and write both artifacts
    pub fn emit(
        &mut self,
        view: &FileScopeView,
        excluder: &FileExcluder,
    ) -> Result<GeneratedArtifacts, CodegenError> {
        let artifacts = self.generate(view, excluder)?;
        artifacts.write_all()?;
        Ok(artifacts)
    }
}

impl Codegen for BindingCodegen<'_> {
    #[instrument(skip_all, fields(file = %view.source_file().display()))]
    fn generate(
        &mut self,
        view: &FileScopeView,
        excluder: &FileExcluder,
    ) -> Result<GeneratedArtifacts, CodegenError> {
        let plan = BindingPlan::build(view, excluder, self.logger)?;

        let header = header::render_header(&plan, self.indent_size)?;
        let source = source::render_source(&plan, self.logger, self.indent_size)?;

        Ok(GeneratedArtifacts {
            header: Artifact {
                path: naming::header_path(&self.output_dir, plan.stem()),
                contents: header,
            },
            source: Artifact {
                path: naming::source_path(&self.output_dir, plan.stem()),
                contents: source,
            },
        })
    }
}
