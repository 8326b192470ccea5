//! Lobby repository: the only writer of lobby state
//!
//! The whole collection lives under one store key and every save rewrites it.
//! Each mutation first re-reads the collection so edits from another process
//! are not silently discarded, then validates on a copy of the lobby, so a
//! rejected operation leaves both memory and store untouched.
//!
//! A failed write flips the repository to `MemoryOnly`: from then on the
//! in-memory collection is authoritative and reloads are skipped until a
//! write succeeds again.

use super::{chat, membership, seed, ChatMessage, Lobby, LobbyError, PlayerHandle, ValidationError};
use crate::session::Session;
use crate::stats::{record_match, Match, MatchDraft, PlayerStats};
use crate::storage::{KeyValueStore, LOBBIES_KEY};
use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, error, info, warn};

/// Whether the last write reached the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Durability {
    Persisted,
    MemoryOnly,
}

pub struct LobbyRepository<S: KeyValueStore> {
    store: S,
    lobbies: Vec<Lobby>,
    durability: Durability,
}

impl<S: KeyValueStore> LobbyRepository<S> {
    /// Create a repository and load the collection.
    pub fn new(store: S) -> Self {
        let mut repo = LobbyRepository {
            store,
            lobbies: Vec::new(),
            durability: Durability::Persisted,
        };
        repo.load_all();
        repo
    }

    /// Load the collection from the store.
    ///
    /// An absent collection is seeded with the demo lobbies and the seed is
    /// written back. Malformed data or a failed read is answered with the
    /// seed without overwriting what is stored.
    pub fn load_all(&mut self) -> &[Lobby] {
        if self.durability == Durability::MemoryOnly {
            return &self.lobbies;
        }

        match self.store.get_json::<Vec<Lobby>>(LOBBIES_KEY) {
            Ok(Some(lobbies)) => {
                debug!(count = lobbies.len(), "loaded lobbies");
                for lobby in &lobbies {
                    if !lobby.stats.iter().all(PlayerStats::is_consistent) {
                        warn!(lobby = %lobby.id, "stored stats do not add up");
                    }
                }
                self.lobbies = lobbies;
            }
            Ok(None) => {
                info!("no stored lobbies, seeding demo data");
                self.lobbies = seed::demo_lobbies();
                self.write_all();
            }
            Err(e) => {
                warn!(error = %e, "could not load lobbies, using demo data");
                self.lobbies = seed::demo_lobbies();
            }
        }
        &self.lobbies
    }

    /// Current snapshot, in stored order
    pub fn lobbies(&self) -> &[Lobby] {
        &self.lobbies
    }

    pub fn find_by_id(&self, lobby_id: &str) -> Result<&Lobby, LobbyError> {
        self.lobbies
            .iter()
            .find(|l| l.id == lobby_id)
            .ok_or_else(|| LobbyError::LobbyNotFound(lobby_id.to_string()))
    }

    /// Replace the lobby with the same id, or append it, then write the
    /// whole collection.
    pub fn save(&mut self, lobby: Lobby) -> Durability {
        match self.lobbies.iter_mut().find(|l| l.id == lobby.id) {
            Some(existing) => *existing = lobby,
            None => self.lobbies.push(lobby),
        }
        self.write_all()
    }

    /// Create a lobby owned by the given user and persist it.
    pub fn create(
        &mut self,
        name: &str,
        description: &str,
        creator_name: &str,
        creator_id: &str,
        now: NaiveDateTime,
    ) -> Result<Lobby, LobbyError> {
        let lobby = Lobby::create(name, description, creator_name, creator_id, now)?;
        self.refresh();
        self.save(lobby.clone());
        info!(lobby = %lobby.id, name = %lobby.name, "created lobby");
        Ok(lobby)
    }

    /// Add a member to a lobby and persist it.
    pub fn add_member(
        &mut self,
        lobby_id: &str,
        name: &str,
        now: NaiveDateTime,
    ) -> Result<PlayerHandle, LobbyError> {
        let added = self.mutate(lobby_id, |lobby| membership::add_member(lobby, name, now))?;
        info!(lobby = %lobby_id, member = %added, "added member");
        Ok(added)
    }

    /// Post a chat message as the session user.
    ///
    /// Only members may chat; membership is an exact display-name match.
    pub fn send_message(
        &mut self,
        lobby_id: &str,
        session: &Session,
        text: &str,
        now: NaiveDateTime,
    ) -> Result<ChatMessage, LobbyError> {
        let message = self.mutate(lobby_id, |lobby| {
            if chat::is_reserved_name(session.display_name())
                || !lobby.is_member(session.display_name())
            {
                return Err(ValidationError::NotAMember(session.display_name().to_string()));
            }
            chat::append_message(lobby, session.chat_author(), text, now)
        })?;
        debug!(lobby = %lobby_id, message = %message.id, "sent message");
        Ok(message)
    }

    /// Validate and record a match, then persist the lobby.
    pub fn log_match(
        &mut self,
        lobby_id: &str,
        draft: &MatchDraft,
        today: NaiveDate,
    ) -> Result<Match, LobbyError> {
        self.mutate(lobby_id, |lobby| record_match(lobby, draft, today))
    }

    pub fn durability(&self) -> Durability {
        self.durability
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Re-read, apply `op` to a copy of one lobby, and save the copy on success.
    fn mutate<T>(
        &mut self,
        lobby_id: &str,
        op: impl FnOnce(&mut Lobby) -> Result<T, ValidationError>,
    ) -> Result<T, LobbyError> {
        self.refresh();
        let mut lobby = self.find_by_id(lobby_id)?.clone();
        let output = op(&mut lobby)?;
        self.save(lobby);
        Ok(output)
    }

    fn refresh(&mut self) {
        if self.durability == Durability::MemoryOnly {
            return;
        }
        match self.store.get_json::<Vec<Lobby>>(LOBBIES_KEY) {
            Ok(Some(lobbies)) => self.lobbies = lobbies,
            Ok(None) => {}
            Err(e) => warn!(error = %e, "could not refresh lobbies, keeping snapshot"),
        }
    }

    fn write_all(&mut self) -> Durability {
        self.durability = match self.store.set_json(LOBBIES_KEY, &self.lobbies) {
            Ok(()) => Durability::Persisted,
            Err(e) => {
                error!(error = %e, "failed to save lobbies, keeping changes in memory");
                Durability::MemoryOnly
            }
        };
        self.durability
    }
}
