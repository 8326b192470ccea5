//! Adding members to a lobby

use super::{chat, Lobby, PlayerHandle, ValidationError};
use chrono::NaiveDateTime;

/// Add a member by display name.
///
/// The name is trimmed and must be non-empty and not already present,
/// ignoring case. The notice author's name is reserved. A zeroed stats entry is created unless the player already
/// has one from earlier matches. A system message announces the addition.
pub fn add_member(
    lobby: &mut Lobby,
    name: &str,
    now: NaiveDateTime,
) -> Result<PlayerHandle, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyMemberName);
    }
    if chat::is_reserved_name(name) {
        return Err(ValidationError::ReservedName(name.to_string()));
    }
    if lobby.has_member_ignore_case(name) {
        return Err(ValidationError::DuplicateMember(name.to_string()));
    }

    lobby.members.push(name.to_string());
    lobby.stats_entry(name);
    chat::post_system_message(lobby, &format!("{} has been added to the lobby.", name), now);
    Ok(name.to_string())
}
