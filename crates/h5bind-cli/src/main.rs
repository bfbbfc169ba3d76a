use anyhow::Result;
use clap::Parser;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

use h5bind::Args;

fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.resolve_config()?;

    // RUST_LOG, when set, overrides the verbosity flag
    let level = config.log_level().tracing_level();
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.verbosity >= 3)
        .init();

    h5bind::run(&args, &config)?;
    Ok(())
}
