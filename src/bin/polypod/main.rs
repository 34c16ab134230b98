//! polypod - terminal polyphonic synth
//!
//! Run with: cargo run -- --config polypod.toml --log-file polypod.log

mod app;
mod keyboard;
mod ui;

use std::{
    fs::File,
    path::{Path, PathBuf},
    sync::Mutex,
};

use clap::Parser;
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use polypod::config::SynthConfig;
use tracing_subscriber::EnvFilter;

/// Play the voice pool from the computer keyboard.
#[derive(Parser, Debug)]
#[command(name = "polypod")]
#[command(version)]
struct Args {
    /// TOML synth configuration (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write logs here. The terminal belongs to the UI, so without this
    /// nothing is logged.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let config = match &args.config {
        Some(path) => SynthConfig::load(path)
            .wrap_err_with(|| format!("failed to load config {}", path.display()))?,
        None => SynthConfig::default(),
    };

    app::run(config)
}

fn init_logging(path: &Path) -> EyreResult<()> {
    let file = File::create(path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "polypod=info".into()),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    tracing::info!(log = %path.display(), "logging started");
    Ok(())
}
