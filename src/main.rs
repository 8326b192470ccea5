//! QuickCourt - sports lobbies in the terminal
//!
//! Chat with your play group, log match results, climb the leaderboard.

mod app;
mod config;
mod lobby;
mod session;
mod stats;
mod storage;
mod tui;

use app::AppCoordinator;
use clap::Parser;
use config::Config;
use crossterm::event::{self, Event};
use lobby::LobbyRepository;
use session::Session;
use std::error::Error;
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tui::Tui;

const LOG_FILE: &str = "quickcourt.log";

fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::parse();

    // The terminal belongs to the UI, so logs go to a file
    let log_dir = if config.ephemeral && config.data_dir.is_none() {
        std::env::temp_dir()
    } else {
        config.resolve_data_dir()?
    };
    init_logging(&log_dir, &config.log_filter)?;
    info!(version = env!("CARGO_PKG_VERSION"), ephemeral = config.ephemeral, "starting");

    let storage = config.open_storage()?;
    info!(keys = storage.key_count()?, "opened store");
    let session = Session::resolve(&config, &storage);
    let repo = LobbyRepository::new(storage);
    let mut app = AppCoordinator::new(repo, session);

    let mut terminal = Tui::new()?;
    terminal.enter()?;

    // Main event loop
    let poll_rate = Duration::from_millis(250);
    loop {
        terminal.draw(|frame| tui::render(frame, &app))?;

        if event::poll(poll_rate)? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        if app.should_quit {
            break;
        }
    }

    terminal.exit()?;
    info!("exiting");
    Ok(())
}

fn init_logging(dir: &Path, filter: &str) -> Result<(), Box<dyn Error>> {
    std::fs::create_dir_all(dir)?;
    let file = File::options()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .init();
    Ok(())
}
