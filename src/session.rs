//! The signed-in user
//!
//! Authentication is mocked: the session user comes from the command line,
//! from the last persisted user, or falls back to the demo account.

use crate::config::Config;
use crate::lobby::{is_reserved_name, ChatAuthor};
use crate::storage::{KeyValueStore, StorageError, USER_KEY};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Owner,
    Admin,
    Facilitator,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub avatar: String,
    pub role: Role,
}

impl User {
    /// The built-in demo account
    pub fn demo() -> Self {
        User {
            id: "u1".to_string(),
            full_name: "Alex Morgan".to_string(),
            email: "alex.morgan@example.com".to_string(),
            avatar: "https://i.pravatar.cc/150?u=alexmorgan".to_string(),
            role: Role::User,
        }
    }

    /// A player account built from a display name.
    ///
    /// Missing id and avatar are derived from the name, so the same name
    /// always maps to the same user.
    pub fn named(full_name: &str, id: Option<&str>, avatar: Option<&str>) -> Self {
        let slug: String = full_name
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();
        User {
            id: id.map_or_else(|| format!("u-{}", slug), str::to_string),
            full_name: full_name.to_string(),
            email: format!("{}@example.com", slug),
            avatar: avatar.map_or_else(
                || format!("https://i.pravatar.cc/150?u={}", slug),
                str::to_string,
            ),
            role: Role::User,
        }
    }
}

/// The current user, passed explicitly to operations that need an identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user: User,
}

impl Session {
    pub fn new(user: User) -> Self {
        Session { user }
    }

    pub fn demo() -> Self {
        Session::new(User::demo())
    }

    /// Determine the session user at startup.
    ///
    /// A name given in the configuration wins and is persisted. Otherwise the
    /// persisted user is restored, falling back to the demo user. The notice
    /// author's name is never accepted as a user. Storage problems are logged
    /// and never fail startup.
    pub fn resolve<S: KeyValueStore>(config: &Config, store: &S) -> Self {
        if let Some(name) = config.user_name.as_deref().map(str::trim) {
            if is_reserved_name(name) {
                warn!(user = name, "ignoring reserved user name");
            } else if !name.is_empty() {
                let user = User::named(name, config.user_id.as_deref(), config.avatar.as_deref());
                if let Err(e) = store.set_json(USER_KEY, &user) {
                    warn!(error = %e, "failed to persist session user");
                }
                info!(user = %user.id, "signed in from configuration");
                return Session::new(user);
            }
        }

        match store.get_json::<User>(USER_KEY) {
            Ok(Some(user)) if is_reserved_name(&user.full_name) => {
                warn!(user = %user.id, "ignoring stored user with a reserved name");
                Session::demo()
            }
            Ok(Some(user)) => {
                info!(user = %user.id, "restored session user");
                Session::new(user)
            }
            Ok(None) => Session::demo(),
            Err(e) => {
                warn!(error = %e, "ignoring stored session user");
                Session::demo()
            }
        }
    }

    /// Forget the persisted user.
    pub fn sign_out<S: KeyValueStore>(self, store: &S) -> Result<(), StorageError> {
        info!(user = %self.user.id, "signed out");
        store.remove(USER_KEY)
    }

    pub fn display_name(&self) -> &str {
        &self.user.full_name
    }

    pub fn user_id(&self) -> &str {
        &self.user.id
    }

    /// Identity snapshot attached to chat messages
    pub fn chat_author(&self) -> ChatAuthor {
        ChatAuthor::new(self.user.full_name.clone(), self.user.avatar.clone())
    }
}
