//! Library interface for the h5bind command line

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use h5bind_codegen::artifacts::write_support_header;
use h5bind_codegen::{BindingCodegen, GeneratedArtifacts};
use h5bind_core::pipeline::analyze;
use h5bind_core::{FileExcluder, GeneratorConfig, Logger, TranslationUnit};
use tracing::info;

/// Ignore file picked up from the working directory when none is configured
pub const DEFAULT_IGNORE_FILE: &str = "ignore.txt";

#[derive(Parser, Debug, Clone)]
#[command(name = "h5bind", version)]
#[command(about = "Generate HDF5 datatype bindings for the types declared in a C++ header", long_about = None)]
pub struct Args {
    /// Declaration tree of the header (JSON written by the front-end)
    pub translation_unit: PathBuf,

    /// Directory the generated files are written to
    #[arg(short, long, env = "H5BIND_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Extra directory searched when resolving dependency headers (repeatable)
    #[arg(short = 'I', long = "include-directory")]
    pub include_dirs: Vec<PathBuf>,

    /// 0 = severe only, 1 = warnings, 2 = info, 3-5 = increasingly detailed debug
    #[arg(short, long, env = "H5BIND_VERBOSITY")]
    pub verbosity: Option<u8>,

    /// File of path prefixes whose generated headers are never included
    #[arg(short = 'i', long)]
    pub ignore_file: Option<PathBuf>,

    /// Treat warnings as errors
    #[arg(short = 'w', long = "enable-warnings-as-errors")]
    pub warnings_as_errors: bool,

    /// Settings file (TOML); command line flags take precedence
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Also write DxTransformBase.h into the output directory
    #[arg(long)]
    pub emit_support_header: bool,
}

impl Args {
    /// Layer the command line over the settings file (or the defaults)
    pub fn resolve_config(&self) -> Result<GeneratorConfig> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::load(path)
                .with_context(|| format!("Failed to load config: {:?}", path))?,
            None => GeneratorConfig::default(),
        };

        if let Some(output_dir) = &self.output_dir {
            config.output_dir = output_dir.clone();
        }
        config.include_dirs.extend(self.include_dirs.iter().cloned());
        if let Some(verbosity) = self.verbosity {
            config.verbosity = verbosity;
        }
        if let Some(ignore_file) = &self.ignore_file {
            config.ignore_file = Some(ignore_file.clone());
        } else if config.ignore_file.is_none() {
            config.ignore_file = Some(PathBuf::from(DEFAULT_IGNORE_FILE));
        }
        config.warnings_as_errors |= self.warnings_as_errors;

        config.validate()?;
        Ok(config)
    }
}

/// Run a full generation for the parsed command line
pub fn run(args: &Args, config: &GeneratorConfig) -> Result<GeneratedArtifacts> {
    let logger = config.logger();
    let artifacts = generate(&args.translation_unit, config, &logger)?;

    if args.emit_support_header {
        let path = write_support_header(&config.output_dir)?;
        info!("Support header written to {:?}", path);
    }
    Ok(artifacts)
}

/// Analyse one declaration tree and write its binding artifacts
pub fn generate(
    translation_unit: &Path,
    config: &GeneratorConfig,
    logger: &Logger,
) -> Result<GeneratedArtifacts> {
    info!("Generating bindings from {:?}", translation_unit);

    let unit = TranslationUnit::load(translation_unit)
        .with_context(|| format!("Failed to read declaration tree: {:?}", translation_unit))?;
    let excluder = FileExcluder::load_optional(config.ignore_file.as_ref())
        .with_context(|| format!("Failed to read ignore file: {:?}", config.ignore_file))?;

    let view = analyze(&unit, &config.include_dirs, logger)?;
    let artifacts = BindingCodegen::new(&config.output_dir, logger)
        .with_indent_size(config.indent_width)
        .emit(&view, &excluder)?;

    info!(
        "Bindings written to {:?} and {:?}",
        artifacts.header.path, artifacts.source.path
    );
    Ok(artifacts)
}
