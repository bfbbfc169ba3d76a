//! Rendered files and writing them out

use std::fs::{self, File};
use std::io::Write as _;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::emitter::Emitter;
use crate::error::CodegenError;
use crate::naming;

/// Base class and offset macro every generated header includes
pub const SUPPORT_HEADER: &str = include_str!("../support/DxTransformBase.h");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub contents: String,
}

impl Artifact {
    /// Create or truncate the file and write the contents
    pub fn write(&self) -> Result<(), CodegenError> {
        let wrap = |source| CodegenError::WriteArtifact {
            path: self.path.clone(),
            source,
        };
        let mut file = File::create(&self.path).map_err(wrap)?;
        file.write_all(self.contents.as_bytes()).map_err(wrap)?;
        Ok(())
    }
}

/// The two files generated for one input header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifacts {
    pub header: Artifact,
    pub source: Artifact,
}

impl GeneratedArtifacts {
    /// Write both files, creating `output_dir`'s missing parents. A failure on
    /// the second file leaves the first one in place.
    pub fn write_all(&self) -> Result<(), CodegenError> {
        for artifact in [&self.header, &self.source] {
            if let Some(parent) = artifact.path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).map_err(|source| CodegenError::WriteArtifact {
                        path: parent.to_path_buf(),
                        source,
                    })?;
                }
            }
            artifact.write()?;
            info!(path = %artifact.path.display(), "wrote binding artifact");
        }
        Ok(())
    }

    pub fn paths(&self) -> [&Path; 2] {
        [&self.header.path, &self.source.path]
    }
}

/// Write `DxTransformBase.h` into `output_dir`
pub fn write_support_header(output_dir: &Path) -> Result<PathBuf, CodegenError> {
    let artifact = Artifact {
        path: output_dir.join(naming::BASE_HEADER),
        contents: SUPPORT_HEADER.to_string(),
    };
    artifact.write()?;
    Ok(artifact.path)
}

pub(crate) fn write_preamble(out: &mut Emitter, source_file_name: &str) -> Result<(), CodegenError> {
    out.line(format_args!(
        "// HDF5 datatype bindings for {}, generated by h5bind.",
        source_file_name
    ))?;
    out.line(format_args!(
        "// Do not edit: this file is overwritten every time bindings are regenerated."
    ))?;
    out.blank()?;
    Ok(())
}
