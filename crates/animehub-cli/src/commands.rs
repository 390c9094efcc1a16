use std::path::PathBuf;

use animehub_api::jikan::JikanClient;
use animehub_core::config::AppConfig;
use animehub_core::error::AnimeHubError;
use animehub_core::library::UpsertOutcome;
use animehub_core::models::entry::ManualEntry;
use animehub_core::persistence::SqliteStore;
use animehub_core::quotes;
use animehub_core::session::Session;
use animehub_core::view;

use crate::cli::{BingoAction, Command, ProfileAction};
use crate::render;

/// Everything a command needs.
pub struct Context {
    pub session: Session<SqliteStore>,
    pub catalog: JikanClient,
    pub config: AppConfig,
    /// Where `config` was loaded from, or would be.
    pub config_path: PathBuf,
}

pub async fn execute(ctx: &mut Context, command: Command) -> Result<(), AnimeHubError> {
    let session = &mut ctx.session;

    match command {
        Command::Profile { action: None } => {
            render::profile(&view::profile_view(
                session.library().profile(),
                session.is_editing(),
            ));
        }
        Command::Profile {
            action: Some(ProfileAction::Set { name, avatar }),
        } => {
            session.save_profile(&name, &avatar)?;
            render::profile(&view::profile_view(
                session.library().profile(),
                session.is_editing(),
            ));
        }
        Command::List { filter } => {
            if let Some(filter) = filter {
                session.set_filter(filter);
            }
            let cards = view::library_view(&session.visible_entries(), session.is_editing());
            render::library(&cards, session.filter());
        }
        Command::Stats => {
            render::stats(&view::stat_tiles(&session.stats()));
            println!();
            render::recommendations(&view::recommendation_lines(&session.recommendations()));
        }
        Command::Recommend => {
            render::recommendations(&view::recommendation_lines(&session.recommendations()));
        }
        Command::Add(args) => {
            let form = ManualEntry {
                title: args.title.join(" "),
                total_episodes: args.total,
                minutes_per_ep: args.minutes,
                episodes_watched: args.watched,
                status: args.status,
                tags: args.tags,
            };
            let outcome = session.add_manual_entry(form)?;
            println!("Added with id {}.", outcome.local_id());
        }
        Command::Bump { local_id } => {
            let watched = session.bump_episode(&local_id)?;
            println!("Now at episode {watched}.");
        }
        Command::Status { local_id, status } => {
            session.set_status(&local_id, status)?;
            println!("Status set to {status}.");
        }
        Command::Remove { local_id } => {
            if session.remove_entry(&local_id)? {
                println!("Removed.");
            } else {
                println!("Nothing to remove.");
            }
        }
        Command::Bingo { action } => {
            if let Some(BingoAction::Toggle { index }) = action {
                session.toggle_bingo(index)?;
            }
            render::bingo(&view::bingo_grid(&session.library().state().bingo));
        }
        Command::Search { query } => {
            session.search(&ctx.catalog, &query.join(" ")).await;
            render::search(session.search_panel().state());
        }
        Command::Details { id, import } => {
            session.load_details(&ctx.catalog, id).await;
            render::details(session.details_panel().state());
            if import && session.details_panel().loaded().is_some() {
                match session.import_shown_details()? {
                    UpsertOutcome::Inserted { local_id } => {
                        println!();
                        println!("Added to your library (id {local_id}).");
                    }
                    UpsertOutcome::Updated { local_id } => {
                        println!();
                        println!("Updated library entry {local_id}.");
                    }
                }
            }
        }
        Command::Season => {
            session.load_season(&ctx.catalog).await;
            render::season(session.season_panel().state());
        }
        Command::Quote => render::quote(&quotes::quote_of_the_day()),
        Command::Unlock { code } => {
            session.unlock(&code)?;
            println!("Edit mode unlocked.");
        }
        Command::Lock => {
            session.lock();
            println!("Edit mode locked.");
        }
        Command::Config { init } => {
            let path = &ctx.config_path;
            if init {
                if path.exists() {
                    println!("Config already exists at {}", path.display());
                } else {
                    ctx.config.save_to(path)?;
                    println!("Wrote default config to {}", path.display());
                }
            } else {
                println!("{}", path.display());
            }
        }
        Command::Shell => println!("Already in the shell."),
    }

    Ok(())
}
