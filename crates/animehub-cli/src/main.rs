mod cli;
mod commands;
mod logging;
mod render;
mod shell;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use animehub_api::jikan::JikanClient;
use animehub_core::config::AppConfig;
use animehub_core::error::AnimeHubError;
use animehub_core::library::LibraryStore;
use animehub_core::persistence::{Persistence, SqliteStore};
use animehub_core::session::Session;

use crate::cli::{Cli, Command};
use crate::commands::Context;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(AppConfig::config_path);
    let config = match AppConfig::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = logging::init(&config.logging.filter, &AppConfig::log_dir(), cli.verbose);

    match run(cli, config, config_path).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: AppConfig, config_path: PathBuf) -> Result<(), AnimeHubError> {
    let db_path = cli.db.clone().unwrap_or_else(AppConfig::db_path);
    AppConfig::ensure_parent(&db_path)?;
    tracing::debug!(path = %db_path.display(), "Opening library");

    let persistence = Persistence::new(
        SqliteStore::open(&db_path)?,
        config.general.storage_key.clone(),
    );
    let session = Session::new(LibraryStore::open(persistence), config.general.edit_pin.clone())
        .with_season_limit(config.catalog.season_limit);

    let catalog = JikanClient::with_base_url(&config.catalog.base_url, config.catalog.timeout())
        .map_err(|e| AnimeHubError::Config(format!("catalog client: {e}")))?;

    let mut ctx = Context {
        session,
        catalog,
        config,
        config_path,
    };

    if let Some(pin) = &cli.pin {
        ctx.session.unlock(pin)?;
    }

    match cli.command {
        None | Some(Command::Shell) => shell::run(&mut ctx).await?,
        Some(command) => commands::execute(&mut ctx, command).await?,
    }

    Ok(())
}
