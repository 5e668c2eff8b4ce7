//! leetmail CLI
//!
//! Runs the HTTP service, or a single update cycle for use from cron.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use leetmail::{
    config,
    error::Result,
    logging,
    models::Settings,
    pipeline::{self, RUNS_TARGET},
    server::{self, AppState},
    storage::UserStore,
};

/// leetmail - LeetCode progress digests by email
#[derive(Parser, Debug)]
#[command(
    name = "leetmail",
    version,
    about = "Emails LeetCode progress digests to a group of friends"
)]
struct Cli {
    /// Path to the TOML settings file
    #[arg(short, long, default_value = "leetmail.toml")]
    settings: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP service (default)
    Serve {
        /// Override the bind host
        #[arg(long)]
        host: Option<String>,

        /// Override the bind port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Run one update cycle and exit
    Trigger,

    /// Validate settings and the users file
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Serve {
        host: None,
        port: None,
    });

    let mut settings = config::load_settings(&cli.settings)?;
    if let Command::Serve { host, port } = &command {
        if let Some(host) = host {
            settings.server.host = host.clone();
        }
        if let Some(port) = port {
            settings.server.port = *port;
        }
    }

    logging::init(&settings.logging, cli.verbose)?;
    tracing::info!("leetmail {} starting", env!("CARGO_PKG_VERSION"));
    if cli.settings.exists() {
        tracing::info!("Loaded settings from {}", cli.settings.display());
    } else {
        tracing::debug!("No settings file at {}, using defaults", cli.settings.display());
    }

    if let Err(e) = settings.validate() {
        tracing::error!("Settings validation failed: {e}");
        return Err(e);
    }

    match command {
        Command::Serve { .. } => server::serve(&settings).await?,

        Command::Trigger => {
            let state = AppState::from_settings(&settings)?;
            let summary =
                pipeline::run_update(state.store.as_ref(), &state.aggregator, &state.dispatcher)
                    .await?;
            tracing::info!(
                target: RUNS_TARGET,
                "Triggered run done: {} emails sent, {} failed",
                summary.emails_sent,
                summary.emails_failed
            );
        }

        Command::Validate => validate(&settings).await?,
    }

    Ok(())
}

/// Check the users file. Settings were validated before dispatch.
async fn validate(settings: &Settings) -> Result<()> {
    tracing::info!("✓ Settings OK");

    let state = AppState::from_settings(settings)?;
    let doc = state.store.load().await.inspect_err(|e| {
        tracing::error!("Users file {} is invalid: {e}", settings.storage.users_file)
    })?;
    tracing::info!(
        "✓ Users file OK ({} users in {})",
        doc.users.len(),
        settings.storage.users_file
    );

    Ok(())
}
