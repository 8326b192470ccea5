//! Command-line and environment configuration

use crate::storage::{Storage, StorageError};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "quickcourt")]
#[command(about = "Sports lobbies in the terminal: chat, log matches, climb the leaderboard")]
pub struct Config {
    /// Directory holding quickcourt.db and quickcourt.log
    #[arg(long, env = "QUICKCOURT_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Keep everything in memory; nothing is written to the database
    #[arg(long, env = "QUICKCOURT_EPHEMERAL")]
    pub ephemeral: bool,

    /// Display name of the signed-in user
    #[arg(long, env = "QUICKCOURT_USER_NAME")]
    pub user_name: Option<String>,

    /// Stable id of the signed-in user
    #[arg(long, env = "QUICKCOURT_USER_ID")]
    pub user_id: Option<String>,

    /// Avatar URL of the signed-in user
    #[arg(long, env = "QUICKCOURT_AVATAR")]
    pub avatar: Option<String>,

    /// Log filter directive, e.g. `quickcourt=debug`
    #[arg(long, env = "QUICKCOURT_LOG", default_value = "info")]
    pub log_filter: String,
}

impl Config {
    /// The configured data directory, or the OS default
    pub fn resolve_data_dir(&self) -> Result<PathBuf, StorageError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Storage::data_dir(),
        }
    }

    /// Open the store this configuration points at.
    pub fn open_storage(&self) -> Result<Storage, StorageError> {
        if self.ephemeral {
            Storage::open_in_memory()
        } else {
            Storage::open_in_dir(&self.resolve_data_dir()?)
        }
    }
}
