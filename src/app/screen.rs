//! Application screen state management
//!
//! Handles transitions between screens and routes key presses:
//! - Lobby list
//! - Lobby detail (Chat, Matches, Leaderboard, Members tabs)
//! - Modals for creating a lobby, adding a member and logging a match

use super::state::{
    CreateField, DetailTab, Flash, LogMatchForm, Modal, TextInput, MAX_MESSAGE_LEN,
};
use crate::lobby::{Durability, Lobby, LobbyError, LobbyRepository};
use crate::session::Session;
use crate::stats::{SortConfig, SortKey};
use crate::storage::KeyValueStore;
use chrono::{Local, NaiveDateTime};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// The current application screen
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    /// All lobbies
    Lobbies { selected: usize },
    /// One lobby
    LobbyDetail {
        lobby_id: String,
        tab: DetailTab,
        chat_input: TextInput,
        sort: SortConfig,
    },
}

/// Main application coordinator
pub struct AppCoordinator<S: KeyValueStore> {
    pub repo: LobbyRepository<S>,
    pub session: Session,
    /// Current screen
    pub screen: Screen,
    pub modal: Option<Modal>,
    pub flash: Option<Flash>,
    /// Whether the application should quit
    pub should_quit: bool,
}

impl<S: KeyValueStore> AppCoordinator<S> {
    /// Create a coordinator starting at the lobby list
    pub fn new(repo: LobbyRepository<S>, session: Session) -> Self {
        AppCoordinator {
            repo,
            session,
            screen: Screen::Lobbies { selected: 0 },
            modal: None,
            flash: None,
            should_quit: false,
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Whether the last change only exists in memory
    pub fn unsaved(&self) -> bool {
        self.repo.durability() == Durability::MemoryOnly
    }

    /// The lobby shown on the detail screen, if it still exists
    pub fn current_lobby(&self) -> Option<&Lobby> {
        match &self.screen {
            Screen::LobbyDetail { lobby_id, .. } => self.repo.find_by_id(lobby_id).ok(),
            Screen::Lobbies { .. } => None,
        }
    }

    pub fn open_lobby(&mut self, lobby_id: &str) {
        self.screen = Screen::LobbyDetail {
            lobby_id: lobby_id.to_string(),
            tab: DetailTab::default(),
            chat_input: TextInput::new(MAX_MESSAGE_LEN),
            sort: SortConfig::default(),
        };
    }

    pub fn go_to_lobbies(&mut self) {
        let selected = match &self.screen {
            Screen::LobbyDetail { lobby_id, .. } => self
                .repo
                .lobbies()
                .iter()
                .position(|l| &l.id == lobby_id)
                .unwrap_or(0),
            Screen::Lobbies { selected } => *selected,
        };
        self.screen = Screen::Lobbies { selected };
    }

    /// Forget the persisted user and continue as the demo user.
    pub fn sign_out(&mut self) {
        let previous = std::mem::replace(&mut self.session, Session::demo());
        self.flash = Some(match previous.sign_out(self.repo.store()) {
            Ok(()) => Flash::info(format!("Signed out. Now playing as {}.", self.session.display_name())),
            Err(e) => Flash::error(e.to_string()),
        });
    }

    /// Handle a key press at the current wall-clock time.
    pub fn handle_key(&mut self, key: KeyEvent) {
        self.handle_key_at(key, Local::now().naive_local());
    }

    /// Handle a key press as if it happened at `now`.
    pub fn handle_key_at(&mut self, key: KeyEvent, now: NaiveDateTime) {
        // Only handle key press events (not release)
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return;
        }

        self.flash = None;
        if self.modal.is_some() {
            self.handle_modal_key(key, now);
            return;
        }
        match self.screen {
            Screen::Lobbies { .. } => self.handle_list_key(key),
            Screen::LobbyDetail { .. } => self.handle_detail_key(key, now),
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        let count = self.repo.lobbies().len();
        let Screen::Lobbies { selected } = &mut self.screen else {
            return;
        };
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => *selected = selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                if *selected + 1 < count {
                    *selected += 1;
                }
            }
            KeyCode::Enter => {
                let id = self.repo.lobbies().get(*selected).map(|l| l.id.clone());
                if let Some(id) = id {
                    self.open_lobby(&id);
                }
            }
            KeyCode::Char('c') => self.modal = Some(Modal::create_lobby()),
            KeyCode::Char('o') => self.sign_out(),
            KeyCode::Char('r') => {
                let count = self.repo.load_all().len();
                if let Screen::Lobbies { selected } = &mut self.screen {
                    *selected = (*selected).min(count.saturating_sub(1));
                }
                self.flash = Some(Flash::info("Reloaded."));
            }
            KeyCode::Char('q') | KeyCode::Esc => self.quit(),
            _ => {}
        }
    }

    fn handle_detail_key(&mut self, key: KeyEvent, now: NaiveDateTime) {
        let members = self
            .current_lobby()
            .map(|l| l.members.clone())
            .unwrap_or_default();
        let Screen::LobbyDetail {
            lobby_id,
            tab,
            chat_input,
            sort,
        } = &mut self.screen
        else {
            return;
        };

        match (key.code, *tab) {
            (KeyCode::Esc, _) => {
                self.go_to_lobbies();
                return;
            }
            (KeyCode::Tab, _) => *tab = tab.next(),
            (KeyCode::BackTab, _) => *tab = tab.prev(),
            (KeyCode::Enter, DetailTab::Chat) => {
                let text = chat_input.value().to_string();
                let lobby_id = lobby_id.clone();
                match self.repo.send_message(&lobby_id, &self.session, &text, now) {
                    Ok(_) => {
                        if let Screen::LobbyDetail { chat_input, .. } = &mut self.screen {
                            chat_input.clear();
                        }
                    }
                    Err(e) => self.flash = Some(Flash::error(e.to_string())),
                }
            }
            (KeyCode::Backspace, DetailTab::Chat) => chat_input.on_backspace(),
            (KeyCode::Char(c), DetailTab::Chat) => chat_input.on_char(c),
            (KeyCode::Char('l'), DetailTab::Matches) => {
                if members.is_empty() {
                    self.flash = Some(Flash::error("Add members before logging a match."));
                } else {
                    self.modal = Some(Modal::LogMatch(LogMatchForm::new(members)));
                }
            }
            (KeyCode::Char(c @ '1'..='5'), DetailTab::Leaderboard) => {
                let index = c as usize - '1' as usize;
                sort.request(SortKey::ALL[index]);
            }
            (KeyCode::Char('a'), DetailTab::Members) => self.modal = Some(Modal::add_member()),
            (KeyCode::Char('q'), _) => self.quit(),
            _ => {}
        }
    }

    fn handle_modal_key(&mut self, key: KeyEvent, now: NaiveDateTime) {
        if key.code == KeyCode::Esc {
            self.modal = None;
            return;
        }
        let Some(modal) = self.modal.as_mut() else {
            return;
        };

        let submit = match modal {
            Modal::CreateLobby {
                name,
                description,
                focus,
            } => {
                let field = match *focus {
                    CreateField::Name => name,
                    CreateField::Description => description,
                };
                match key.code {
                    KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                        *focus = match *focus {
                            CreateField::Name => CreateField::Description,
                            CreateField::Description => CreateField::Name,
                        };
                        false
                    }
                    KeyCode::Backspace => {
                        field.on_backspace();
                        false
                    }
                    KeyCode::Char(c) => {
                        field.on_char(c);
                        false
                    }
                    KeyCode::Enter => true,
                    _ => false,
                }
            }
            Modal::AddMember { name } => match key.code {
                KeyCode::Backspace => {
                    name.on_backspace();
                    false
                }
                KeyCode::Char(c) => {
                    name.on_char(c);
                    false
                }
                KeyCode::Enter => true,
                _ => false,
            },
            Modal::LogMatch(form) => match key.code {
                KeyCode::Up | KeyCode::Char('k') => {
                    form.up();
                    false
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    form.down();
                    false
                }
                KeyCode::Char(' ') => {
                    form.toggle_current();
                    false
                }
                KeyCode::Char('w') => {
                    if !form.choose_winner() {
                        self.flash = Some(Flash::error("Select the player before making them the winner."));
                    }
                    false
                }
                KeyCode::Char('m') => {
                    form.draft.toggle_mode();
                    false
                }
                KeyCode::Char('s') => {
                    form.draft.cycle_sport();
                    false
                }
                KeyCode::Char(c) if c.is_ascii_digit() || c == '-' || c == ':' || c == ',' => {
                    form.score_char(c);
                    false
                }
                KeyCode::Backspace => {
                    form.score_backspace();
                    false
                }
                KeyCode::Enter => true,
                _ => false,
            },
        };

        if submit {
            self.submit_modal(now);
        }
    }

    fn submit_modal(&mut self, now: NaiveDateTime) {
        let Some(modal) = self.modal.clone() else {
            return;
        };
        let lobby_id = match &self.screen {
            Screen::LobbyDetail { lobby_id, .. } => Some(lobby_id.clone()),
            Screen::Lobbies { .. } => None,
        };

        let result: Result<Option<String>, LobbyError> = match (&modal, lobby_id) {
            (
                Modal::CreateLobby {
                    name, description, ..
                },
                _,
            ) => self
                .repo
                .create(
                    name.value(),
                    description.value(),
                    self.session.display_name(),
                    self.session.user_id(),
                    now,
                )
                .map(|lobby| {
                    self.open_lobby(&lobby.id);
                    Some(format!("Created {}.", lobby.name))
                }),
            (Modal::AddMember { name }, Some(lobby_id)) => self
                .repo
                .add_member(&lobby_id, name.value(), now)
                .map(|added| Some(format!("{} has been added to the lobby.", added))),
            (Modal::LogMatch(form), Some(lobby_id)) => self
                .repo
                .log_match(&lobby_id, &form.draft, now.date())
                .map(|_| Some("Match logged.".to_string())),
            (_, None) => Ok(None),
        };

        match result {
            Ok(message) => {
                self.modal = None;
                self.flash = message.map(Flash::info);
            }
            // The modal stays open so the input can be corrected
            Err(e) => self.flash = Some(Flash::error(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::FlashKind;
    use crate::stats::{MatchMode, SortDirection};
    use crate::storage::Storage;
    use chrono::NaiveDate;

    fn app() -> AppCoordinator<Storage> {
        let repo = LobbyRepository::new(Storage::open_in_memory().unwrap());
        AppCoordinator::new(repo, Session::demo())
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 18)
            .unwrap()
            .and_hms_opt(18, 0, 0)
            .unwrap()
    }

    fn press(app: &mut AppCoordinator<Storage>, code: KeyCode) {
        app.handle_key_at(KeyEvent::new(code, KeyModifiers::NONE), now());
    }

    fn type_text(app: &mut AppCoordinator<Storage>, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn tab(app: &AppCoordinator<Storage>) -> DetailTab {
        match &app.screen {
            Screen::LobbyDetail { tab, .. } => *tab,
            Screen::Lobbies { .. } => panic!("not on a lobby"),
        }
    }

    #[test]
    fn test_starts_on_lobby_list() {
        let app = app();
        assert_eq!(app.screen, Screen::Lobbies { selected: 0 });
        assert!(app.modal.is_none());
        assert!(!app.unsaved());
    }

    #[test]
    fn test_navigate_and_open() {
        let mut app = app();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.screen, Screen::Lobbies { selected: 1 });

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.current_lobby().unwrap().id, "lobby-2");

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen, Screen::Lobbies { selected: 1 });
    }

    #[test]
    fn test_create_lobby_flow() {
        let mut app = app();
        press(&mut app, KeyCode::Char('c'));
        type_text(&mut app, "Net Ninjas");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "Tennis doubles");
        press(&mut app, KeyCode::Enter);

        assert!(app.modal.is_none());
        let lobby = app.current_lobby().unwrap();
        assert_eq!(lobby.name, "Net Ninjas");
        assert_eq!(lobby.description, "Tennis doubles");
        assert_eq!(lobby.members, vec!["Alex Morgan".to_string()]);
        assert_eq!(lobby.admin_id, "u1");
        assert_eq!(app.flash, Some(Flash::info("Created Net Ninjas.")));
    }

    #[test]
    fn test_create_requires_name() {
        let mut app = app();
        press(&mut app, KeyCode::Char('c'));
        press(&mut app, KeyCode::Enter);

        assert!(matches!(app.modal, Some(Modal::CreateLobby { .. })));
        assert_eq!(app.flash.as_ref().unwrap().kind, FlashKind::Error);
        assert_eq!(app.repo.lobbies().len(), 2);
    }

    #[test]
    fn test_chat_send() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "see you at 5");
        press(&mut app, KeyCode::Enter);

        let last = app.current_lobby().unwrap().last_message().unwrap();
        assert_eq!(last.text, "see you at 5");
        assert_eq!(last.user.full_name, "Alex Morgan");
        assert_eq!(last.timestamp, "06:00 PM");
        match &app.screen {
            Screen::LobbyDetail { chat_input, .. } => assert!(chat_input.is_empty()),
            Screen::Lobbies { .. } => panic!("left the lobby"),
        }
    }

    #[test]
    fn test_chat_rejected_for_non_member() {
        let mut app = app();
        // Alex Morgan is not in the second demo lobby
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "hello");
        press(&mut app, KeyCode::Enter);

        assert_eq!(
            app.flash,
            Some(Flash::error("You must be a member to chat."))
        );
    }

    #[test]
    fn test_tabs_cycle() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        assert_eq!(tab(&app), DetailTab::Chat);
        press(&mut app, KeyCode::Tab);
        assert_eq!(tab(&app), DetailTab::Matches);
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(tab(&app), DetailTab::Members);
    }

    #[test]
    fn test_add_member_flow() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "Priya");
        press(&mut app, KeyCode::Enter);

        assert!(app.modal.is_none());
        let lobby = app.current_lobby().unwrap();
        assert!(lobby.is_member("Priya"));
        assert!(lobby.stats_for("Priya").is_some());
    }

    #[test]
    fn test_add_duplicate_member_keeps_modal() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "JANE DOE");
        press(&mut app, KeyCode::Enter);

        assert!(matches!(app.modal, Some(Modal::AddMember { .. })));
        assert_eq!(
            app.flash,
            Some(Flash::error("JANE DOE is already in the lobby."))
        );
    }

    #[test]
    fn test_log_individual_match_flow() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char('l'));

        // Alex Morgan and Jane Doe play, Jane wins 21-19
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Char('w'));
        type_text(&mut app, "21-19");
        press(&mut app, KeyCode::Enter);

        assert!(app.modal.is_none());
        let lobby = app.current_lobby().unwrap();
        let latest = &lobby.matches[0];
        assert_eq!(latest.winner_label(), "Jane Doe");
        assert_eq!(latest.score.as_deref(), Some("21-19"));
        assert_eq!(latest.date, now().date());
        assert!(lobby.stats.iter().all(|s| s.is_consistent()));
    }

    #[test]
    fn test_log_match_validation_keeps_modal() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char('l'));
        let before = app.current_lobby().unwrap().matches.len();

        press(&mut app, KeyCode::Enter);

        assert_eq!(
            app.flash,
            Some(Flash::error("Please select at least one participant."))
        );
        assert!(matches!(app.modal, Some(Modal::LogMatch(_))));
        assert_eq!(app.current_lobby().unwrap().matches.len(), before);
    }

    #[test]
    fn test_log_match_mode_toggle() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char('l'));
        press(&mut app, KeyCode::Char('m'));
        press(&mut app, KeyCode::Char('s'));

        match &app.modal {
            Some(Modal::LogMatch(form)) => {
                assert_eq!(form.draft.mode(), MatchMode::Team);
                assert_eq!(form.draft.sport(), crate::stats::Sport::Football);
            }
            other => panic!("unexpected modal {:?}", other),
        }

        press(&mut app, KeyCode::Esc);
        assert!(app.modal.is_none());
    }

    #[test]
    fn test_leaderboard_sort_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char('2'));

        match &app.screen {
            Screen::LobbyDetail { sort, .. } => {
                assert_eq!(sort.key, SortKey::Wins);
                assert_eq!(sort.direction, SortDirection::Ascending);
            }
            Screen::Lobbies { .. } => panic!("left the lobby"),
        }

        press(&mut app, KeyCode::Char('5'));
        match &app.screen {
            Screen::LobbyDetail { sort, .. } => {
                assert_eq!(sort.key, SortKey::WinRate);
                assert_eq!(sort.direction, SortDirection::Descending);
            }
            Screen::Lobbies { .. } => panic!("left the lobby"),
        }
    }

    #[test]
    fn test_typing_q_in_chat_does_not_quit() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);

        let mut app = self::app();
        press(&mut app, KeyCode::Enter);
        app.handle_key_at(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            now(),
        );
        assert!(app.should_quit);
    }

    #[test]
    fn test_sign_out_returns_to_demo_user() {
        let store = Storage::open_in_memory().unwrap();
        let jane = Session::new(crate::session::User::named("Jane Doe", None, None));
        store.set(crate::storage::USER_KEY, "{}").unwrap();
        let mut app = AppCoordinator::new(LobbyRepository::new(store), jane);

        press(&mut app, KeyCode::Char('o'));

        assert_eq!(app.session, Session::demo());
        assert_eq!(app.repo.store().get(crate::storage::USER_KEY).unwrap(), None);
        assert_eq!(
            app.flash,
            Some(Flash::info("Signed out. Now playing as Alex Morgan."))
        );
    }

    #[test]
    fn test_missing_lobby_has_no_current() {
        let mut app = app();
        app.open_lobby("lobby-gone");
        assert!(app.current_lobby().is_none());
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen, Screen::Lobbies { selected: 0 });
    }
}
