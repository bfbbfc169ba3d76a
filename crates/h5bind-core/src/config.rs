//! Generator settings, read from `h5bind.toml` and overridden by CLI flags

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::CoreError;
use crate::logging::{LogLevel, Logger};

/// Generator settings, loadable from an `h5bind.toml`:
///
/// ```toml
/// output_dir = "generated"
/// include_dirs = ["include", "/opt/vendor/include"]
/// verbosity = 3
/// ignore_file = "ignore.txt"
/// warnings_as_errors = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub include_dirs: Vec<PathBuf>,
    #[serde(default = "default_verbosity")]
    pub verbosity: u8,
    #[serde(default)]
    pub ignore_file: Option<PathBuf>,
    #[serde(default)]
    pub warnings_as_errors: bool,
    #[serde(default = "default_indent_width")]
    pub indent_width: usize,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_verbosity() -> u8 {
    2
}

fn default_indent_width() -> usize {
    4
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            include_dirs: Vec::new(),
            verbosity: default_verbosity(),
            ignore_file: None,
            warnings_as_errors: false,
            indent_width: default_indent_width(),
        }
    }
}

impl GeneratorConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, CoreError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.indent_width == 0 || self.indent_width > 16 {
            return Err(CoreError::Config(format!(
                "indent_width must be between 1 and 16, got {}",
                self.indent_width
            )));
        }
        Ok(())
    }

    pub fn log_level(&self) -> LogLevel {
        LogLevel::from_verbosity(self.verbosity)
    }

    /// Logger forwarding to `tracing` with this config's threshold and promotion
    pub fn logger(&self) -> Logger {
        Logger::new(self.log_level(), self.warnings_as_errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_empty() {
        let config = GeneratorConfig::from_toml_str("").unwrap();
        assert_eq!(config, GeneratorConfig::default());
        assert_eq!(config.log_level(), LogLevel::Info);
    }

    #[test]
    fn test_full_config() {
        let config = GeneratorConfig::from_toml_str(
            r#"
            output_dir = "generated"
            include_dirs = ["include", "/opt/vendor/include"]
            verbosity = 3
            ignore_file = "ignore.txt"
            warnings_as_errors = true
            indent_width = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.output_dir, PathBuf::from("generated"));
        assert_eq!(config.include_dirs.len(), 2);
        assert_eq!(config.log_level(), LogLevel::Debug1);
        assert_eq!(config.ignore_file, Some(PathBuf::from("ignore.txt")));
        assert!(config.warnings_as_errors);
        assert_eq!(config.indent_width, 2);
    }

    #[test]
    fn test_invalid_indent_rejected() {
        assert!(matches!(
            GeneratorConfig::from_toml_str("indent_width = 0"),
            Err(CoreError::Config(_))
        ));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        assert!(matches!(
            GeneratorConfig::from_toml_str("verbosity = \"loud\""),
            Err(CoreError::Toml(_))
        ));
    }
}
