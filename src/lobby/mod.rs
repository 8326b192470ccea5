//! Lobbies: persistent groups of players
//!
//! Handles:
//! - The lobby data model (members, chat, match history, stats)
//! - Lobby creation
//! - Chat log appends and system notices
//! - Membership changes
//! - The repository that loads and saves the lobby collection
//!
//! Members and match participants are identified by display name. Renaming a
//! player fragments their history, and two users sharing a display name
//! share one member slot and one stats entry.

pub mod chat;
pub mod membership;
pub mod repository;
pub mod seed;

pub use chat::{is_reserved_name, ChatAuthor, ChatMessage};
pub use repository::{Durability, LobbyRepository};

use crate::stats::{Match, PlayerStats};
use chrono::NaiveDateTime;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A player as referenced by lobbies and matches: their display name
pub type PlayerHandle = String;

/// Input rejected before any state changed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select at least one participant.")]
    NoParticipants,
    #[error("Please select a winner from the participants.")]
    NoWinner,
    #[error("{0} is not one of the selected participants.")]
    WinnerNotParticipant(PlayerHandle),
    #[error("Please assign players to at least one team.")]
    NoTeamPlayers,
    #[error("Please select the winning team or 'Draw'.")]
    NoWinningSide,
    #[error("Member name cannot be empty.")]
    EmptyMemberName,
    #[error("{0} is a reserved name.")]
    ReservedName(PlayerHandle),
    #[error("{0} is already in the lobby.")]
    DuplicateMember(PlayerHandle),
    #[error("Message cannot be empty.")]
    EmptyMessage,
    #[error("You must be a member to chat.")]
    NotAMember(PlayerHandle),
    #[error("Lobby name cannot be empty.")]
    EmptyLobbyName,
}

/// Errors from lobby operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LobbyError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("lobby {0} not found")]
    LobbyNotFound(String),
}

/// A persistent group of players sharing chat, match history and stats
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lobby {
    pub id: String,
    pub name: String,
    pub description: String,
    pub avatar_url: String,
    /// User id of the creator
    pub admin_id: String,
    /// Display names, unique ignoring case
    pub members: Vec<PlayerHandle>,
    /// Oldest first
    pub chat: Vec<ChatMessage>,
    /// Most recent first
    pub matches: Vec<Match>,
    /// One entry per player name
    pub stats: Vec<PlayerStats>,
}

impl Lobby {
    /// Create a lobby with its creator as the first member.
    ///
    /// The creator also gets the first stats entry, and a system message
    /// announces the creation.
    pub fn create(
        name: &str,
        description: &str,
        creator_name: &str,
        creator_id: &str,
        now: NaiveDateTime,
    ) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyLobbyName);
        }

        let mut lobby = Lobby {
            id: generate_id("lobby"),
            name: name.to_string(),
            description: description.trim().to_string(),
            avatar_url: format!("https://source.unsplash.com/400x400/?sports,{}", name),
            admin_id: creator_id.to_string(),
            members: vec![creator_name.to_string()],
            chat: Vec::new(),
            matches: Vec::new(),
            stats: vec![PlayerStats::new(creator_name)],
        };
        chat::post_system_message(
            &mut lobby,
            &format!("Lobby created by {}.", creator_name),
            now,
        );
        Ok(lobby)
    }

    /// Bare lobby with no members, chat or history.
    #[cfg(test)]
    pub(crate) fn empty(id: &str, name: &str) -> Self {
        Lobby {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            avatar_url: String::new(),
            admin_id: String::new(),
            members: Vec::new(),
            chat: Vec::new(),
            matches: Vec::new(),
            stats: Vec::new(),
        }
    }

    /// Exact-name membership check, as used to gate chat
    pub fn is_member(&self, name: &str) -> bool {
        self.members.iter().any(|m| m == name)
    }

    /// Membership check ignoring case, as used to reject duplicates
    pub fn has_member_ignore_case(&self, name: &str) -> bool {
        let lowered = name.to_lowercase();
        self.members.iter().any(|m| m.to_lowercase() == lowered)
    }

    pub fn is_admin(&self, user_id: &str) -> bool {
        self.admin_id == user_id
    }

    pub fn stats_for(&self, name: &str) -> Option<&PlayerStats> {
        self.stats.iter().find(|s| s.player_name == name)
    }

    /// Stats entry for a player, created zeroed if missing
    pub fn stats_entry(&mut self, name: &str) -> &mut PlayerStats {
        let index = match self.stats.iter().position(|s| s.player_name == name) {
            Some(index) => index,
            None => {
                self.stats.push(PlayerStats::new(name));
                self.stats.len() - 1
            }
        };
        &mut self.stats[index]
    }

    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.chat.last()
    }

    /// "1 Member" / "3 Members"
    pub fn member_count_label(&self) -> String {
        let count = self.members.len();
        format!("{} Member{}", count, if count == 1 { "" } else { "s" })
    }
}

/// Generate an opaque id such as `lobby-3fa2c1d09b8e7a64`.
pub(crate) fn generate_id(prefix: &str) -> String {
    format!("{}-{:016x}", prefix, rand::rng().random::<u64>())
}
