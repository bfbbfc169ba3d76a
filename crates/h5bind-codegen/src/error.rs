//! Error types for binding generation

use std::path::PathBuf;

use h5bind_core::qualified_name::QualifiedNameError;
use h5bind_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodegenError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Code generation error: {0}")]
    Generation(String),

    #[error("Invalid type name: {0}")]
    InvalidName(#[from] QualifiedNameError),

    #[error("Failed to write {}: {source}", path.display())]
    WriteArtifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Format error: {0}")]
    Fmt(#[from] std::fmt::Error),
}

impl CodegenError {
    /// Whether generation stopped because a warning or error was logged as severe
    pub fn is_fatal_log(&self) -> bool {
        matches!(self, CodegenError::Core(CoreError::FatalLog(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_keep_their_message() {
        let err = CodegenError::from(CoreError::UnknownType("Missing".into()));
        assert_eq!(err.to_string(), "Type 'Missing' is not registered");
        assert!(!err.is_fatal_log());
    }

    #[test]
    fn test_fatal_log_detected() {
        let err = CodegenError::from(CoreError::FatalLog("boom".into()));
        assert!(err.is_fatal_log());
    }

    #[test]
    fn test_write_error_names_the_file() {
        let err = CodegenError::WriteArtifact {
            path: PathBuf::from("out/sample_DxTransform.h"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().starts_with("Failed to write out/sample_DxTransform.h"));
    }
}
