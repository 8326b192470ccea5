//! Form and input state shared by the screens

use crate::lobby::PlayerHandle;
use crate::stats::{MatchDraft, MatchMode, Team};

/// Longest accepted chat message, in characters
pub const MAX_MESSAGE_LEN: usize = 280;

/// Longest accepted name or description, in characters
pub const MAX_FIELD_LEN: usize = 60;

/// Longest accepted score, in characters
pub const MAX_SCORE_LEN: usize = 16;

/// A single-line text field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    max_len: usize,
}

impl TextInput {
    pub fn new(max_len: usize) -> Self {
        TextInput {
            value: String::new(),
            max_len,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Append a character unless the field is full.
    pub fn on_char(&mut self, c: char) {
        if self.value.chars().count() < self.max_len {
            self.value.push(c);
        }
    }

    pub fn on_backspace(&mut self) {
        self.value.pop();
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }
}

/// Tone of a flash line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Info,
    Error,
}

/// One-line feedback shown until the next key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub text: String,
    pub kind: FlashKind,
}

impl Flash {
    pub fn info(text: impl Into<String>) -> Self {
        Flash {
            text: text.into(),
            kind: FlashKind::Info,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Flash {
            text: text.into(),
            kind: FlashKind::Error,
        }
    }
}

/// Tabs of the lobby detail screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailTab {
    #[default]
    Chat,
    Matches,
    Leaderboard,
    Members,
}

impl DetailTab {
    pub const ALL: [DetailTab; 4] = [
        DetailTab::Chat,
        DetailTab::Matches,
        DetailTab::Leaderboard,
        DetailTab::Members,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DetailTab::Chat => "Chat",
            DetailTab::Matches => "Matches",
            DetailTab::Leaderboard => "Leaderboard",
            DetailTab::Members => "Members",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    pub fn next(&self) -> DetailTab {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> DetailTab {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Focused field of the create-lobby form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateField {
    Name,
    Description,
}

/// The log-match form: a draft plus a cursor over the lobby's members
#[derive(Debug, Clone, PartialEq)]
pub struct LogMatchForm {
    pub draft: MatchDraft,
    pub candidates: Vec<PlayerHandle>,
    pub cursor: usize,
}

impl LogMatchForm {
    pub fn new(candidates: Vec<PlayerHandle>) -> Self {
        LogMatchForm {
            draft: MatchDraft::new(),
            candidates,
            cursor: 0,
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.candidates.get(self.cursor).map(String::as_str)
    }

    pub fn up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn down(&mut self) {
        if self.cursor + 1 < self.candidates.len() {
            self.cursor += 1;
        }
    }

    /// Individual mode: select or deselect. Team mode: cycle A, B, none.
    pub fn toggle_current(&mut self) {
        let Some(name) = self.current().map(str::to_string) else {
            return;
        };
        match self.draft.mode() {
            MatchMode::Individual => self.draft.toggle_participant(&name),
            MatchMode::Team => {
                self.draft.cycle_team(&name);
            }
        }
    }

    /// Individual mode: make the highlighted participant the winner.
    /// Team mode: cycle the winning side.
    ///
    /// Returns false when the highlighted player is not selected.
    pub fn choose_winner(&mut self) -> bool {
        match self.draft.mode() {
            MatchMode::Individual => match self.current().map(str::to_string) {
                Some(name) if self.draft.is_selected(&name) => {
                    self.draft.set_winner(Some(&name));
                    true
                }
                _ => false,
            },
            MatchMode::Team => {
                self.draft.cycle_winning_side();
                true
            }
        }
    }

    /// Marker shown next to a candidate
    pub fn marker(&self, name: &str) -> &'static str {
        match self.draft.mode() {
            MatchMode::Individual if self.draft.winner() == Some(name) => "[W]",
            MatchMode::Individual if self.draft.is_selected(name) => "[x]",
            MatchMode::Individual => "[ ]",
            MatchMode::Team => match self.draft.team_of(name) {
                Some(Team::A) => "[A]",
                Some(Team::B) => "[B]",
                None => "[ ]",
            },
        }
    }

    pub fn score_char(&mut self, c: char) {
        let mut score = self.draft.score().to_string();
        if score.chars().count() < MAX_SCORE_LEN {
            score.push(c);
            self.draft.set_score(score);
        }
    }

    pub fn score_backspace(&mut self) {
        let mut score = self.draft.score().to_string();
        score.pop();
        self.draft.set_score(score);
    }
}

/// An open dialog over the current screen
#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    CreateLobby {
        name: TextInput,
        description: TextInput,
        focus: CreateField,
    },
    AddMember {
        name: TextInput,
    },
    LogMatch(LogMatchForm),
}

impl Modal {
    pub fn create_lobby() -> Self {
        Modal::CreateLobby {
            name: TextInput::new(MAX_FIELD_LEN),
            description: TextInput::new(MAX_FIELD_LEN),
            focus: CreateField::Name,
        }
    }

    pub fn add_member() -> Self {
        Modal::AddMember {
            name: TextInput::new(MAX_FIELD_LEN),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Modal::CreateLobby { .. } => " Create Lobby ",
            Modal::AddMember { .. } => " Add Member ",
            Modal::LogMatch(_) => " Log Match ",
        }
    }
}
