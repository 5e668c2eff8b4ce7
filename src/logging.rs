// src/logging.rs

//! Tracing subscriber setup.
//!
//! Three sinks, each with its own filter:
//! - console: everything at the configured level (`RUST_LOG` wins), plain or JSON
//! - application file (`logging.file`): same events as the console, no ANSI
//! - run history file (`logging.runs_file`): only events on the
//!   `leetmail::runs` target, so the file reads as one line per run outcome
//!
//! Files are opened in append mode and created if missing. An empty path
//! disables that sink.

use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use tracing::{Level, Subscriber};
use tracing_subscriber::{
    EnvFilter, Layer,
    filter::Targets,
    fmt,
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

use crate::error::{AppError, Result};
use crate::models::LoggingConfig;
use crate::pipeline::RUNS_TARGET;

/// A boxed layer over subscriber `S`.
pub type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

/// Install the global subscriber built from `config`.
pub fn init(config: &LoggingConfig, verbose: bool) -> Result<()> {
    tracing_subscriber::registry()
        .with(layers(config, verbose)?)
        .try_init()
        .map_err(|e| AppError::config(format!("Failed to install logger: {e}")))
}

/// Build the console and file layers for `config`.
pub fn layers<S>(config: &LoggingConfig, verbose: bool) -> Result<Vec<BoxedLayer<S>>>
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
{
    let mut layers = Vec::new();

    let console = if config.json {
        fmt::layer()
            .json()
            .with_filter(level_filter(config, verbose))
            .boxed()
    } else {
        fmt::layer()
            .with_filter(level_filter(config, verbose))
            .boxed()
    };
    layers.push(console);

    if !config.file.is_empty() {
        let file = open_append(Path::new(&config.file))?;
        layers.push(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Arc::new(file))
                .with_filter(level_filter(config, verbose))
                .boxed(),
        );
    }

    if !config.runs_file.is_empty() {
        let file = open_append(Path::new(&config.runs_file))?;
        layers.push(
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Arc::new(file))
                .with_filter(Targets::new().with_target(RUNS_TARGET, Level::INFO))
                .boxed(),
        );
    }

    Ok(layers)
}

fn level_filter(config: &LoggingConfig, verbose: bool) -> EnvFilter {
    let level = if verbose { "debug" } else { config.level.as_str() };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

fn open_append(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}
