use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Type '{0}' is already registered")]
    DuplicateType(String),

    #[error("Type '{0}' is not registered")]
    UnknownType(String),

    #[error(
        "{} compiler error(s) were encountered when parsing {}:\n{}",
        diagnostics.len(),
        file.display(),
        diagnostics.join("\n")
    )]
    FrontEndParse {
        file: PathBuf,
        diagnostics: Vec<String>,
    },

    #[error("Aborted after severe log message: {0}")]
    FatalLog(String),

    #[error("Invalid declaration: {0}")]
    InvalidDeclaration(String),

    #[error("Member '{member}' appears outside of any struct, class, union or enum")]
    DetachedMember { member: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Declaration tree is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration is not valid TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

impl CoreError {
    /// Whether the error came from the front-end rejecting the translation unit
    pub fn is_front_end_error(&self) -> bool {
        matches!(self, CoreError::FrontEndParse { .. })
    }
}
