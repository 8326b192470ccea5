//! Match logging engine
//!
//! A `MatchDraft` holds what the log-match form collects: mode, sport, score,
//! and either a participant selection with a winner (individual) or per-player
//! team assignments with a winning side (team). `record_match` validates the
//! draft, builds an immutable `Match`, prepends it to the lobby history and
//! updates every participant's stats.

use super::{PlayerResult, Sport};
use crate::lobby::{generate_id, Lobby, PlayerHandle, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Which side won a team match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinningSide {
    #[serde(rename = "Team A")]
    TeamA,
    #[serde(rename = "Team B")]
    TeamB,
    Draw,
}

impl WinningSide {
    pub fn label(&self) -> &'static str {
        match self {
            WinningSide::TeamA => "Team A",
            WinningSide::TeamB => "Team B",
            WinningSide::Draw => "Draw",
        }
    }
}

/// A team slot in a team match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Team {
    A,
    B,
}

impl Team {
    fn side(&self) -> WinningSide {
        match self {
            Team::A => WinningSide::TeamA,
            Team::B => WinningSide::TeamB,
        }
    }
}

/// The result part of a match, with an explicit discriminant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchOutcome {
    /// Free-for-all or 1v1: one winner among the participants
    Individual {
        participants: Vec<PlayerHandle>,
        winner: PlayerHandle,
    },
    /// Two rosters, one winning side or a draw
    Team {
        team_a: Vec<PlayerHandle>,
        team_b: Vec<PlayerHandle>,
        winning_team: WinningSide,
    },
}

/// A logged match. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: String,
    /// Day the match was logged
    pub date: NaiveDate,
    pub sport: Sport,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<String>,
    #[serde(flatten)]
    pub outcome: MatchOutcome,
}

impl Match {
    /// Whether this is a team match
    pub fn is_team(&self) -> bool {
        matches!(self.outcome, MatchOutcome::Team { .. })
    }

    /// Everyone who played, team A before team B
    pub fn participants(&self) -> Vec<&str> {
        match &self.outcome {
            MatchOutcome::Individual { participants, .. } => {
                participants.iter().map(String::as_str).collect()
            }
            MatchOutcome::Team { team_a, team_b, .. } => team_a
                .iter()
                .chain(team_b.iter())
                .map(String::as_str)
                .collect(),
        }
    }

    /// Per-player result of this match
    pub fn results(&self) -> Vec<(&str, PlayerResult)> {
        match &self.outcome {
            MatchOutcome::Individual {
                participants,
                winner,
            } => participants
                .iter()
                .map(|name| {
                    let result = if name == winner {
                        PlayerResult::Win
                    } else {
                        PlayerResult::Loss
                    };
                    (name.as_str(), result)
                })
                .collect(),
            MatchOutcome::Team {
                team_a,
                team_b,
                winning_team,
            } => {
                let side_result = |team: Team| match winning_team {
                    WinningSide::Draw => PlayerResult::Draw,
                    side if *side == team.side() => PlayerResult::Win,
                    _ => PlayerResult::Loss,
                };
                team_a
                    .iter()
                    .map(|name| (name.as_str(), side_result(Team::A)))
                    .chain(team_b.iter().map(|name| (name.as_str(), side_result(Team::B))))
                    .collect()
            }
        }
    }

    /// Winner label for display: a player name or a side
    pub fn winner_label(&self) -> &str {
        match &self.outcome {
            MatchOutcome::Individual { winner, .. } => winner,
            MatchOutcome::Team { winning_team, .. } => winning_team.label(),
        }
    }
}

/// Form mode of a draft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    #[default]
    Individual,
    Team,
}

/// An unvalidated match submission
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchDraft {
    mode: MatchMode,
    sport: Sport,
    score: String,
    /// Individual mode: selected participants in selection order
    participants: Vec<PlayerHandle>,
    winner: Option<PlayerHandle>,
    /// Team mode: one slot per name, in assignment order
    assignments: Vec<(PlayerHandle, Team)>,
    winning_side: Option<WinningSide>,
}

impl MatchDraft {
    /// Empty individual-mode draft with the first sport selected
    pub fn new() -> Self {
        Self::default()
    }

    /// Individual draft from a participant list and an optional winner
    #[cfg(test)]
    pub fn individual<I, S>(participants: I, winner: Option<&str>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PlayerHandle>,
    {
        let mut draft = Self::new();
        for name in participants {
            let name = name.into();
            if !draft.participants.contains(&name) {
                draft.participants.push(name);
            }
        }
        draft.winner = winner.map(str::to_string);
        draft
    }

    /// Team draft from two rosters and an optional winning side
    #[cfg(test)]
    pub fn team<A, B, S>(team_a: A, team_b: B, winning_side: Option<WinningSide>) -> Self
    where
        A: IntoIterator<Item = S>,
        B: IntoIterator<Item = S>,
        S: Into<PlayerHandle>,
    {
        let mut draft = Self {
            mode: MatchMode::Team,
            winning_side,
            ..Self::default()
        };
        for name in team_a {
            draft.assign(name.into(), Some(Team::A));
        }
        for name in team_b {
            draft.assign(name.into(), Some(Team::B));
        }
        draft
    }

    #[cfg(test)]
    pub fn with_score(mut self, score: impl Into<String>) -> Self {
        self.score = score.into();
        self
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Switch between individual and team mode, keeping both selections.
    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            MatchMode::Individual => MatchMode::Team,
            MatchMode::Team => MatchMode::Individual,
        };
    }

    pub fn sport(&self) -> Sport {
        self.sport
    }

    pub fn cycle_sport(&mut self) {
        self.sport = self.sport.next();
    }

    pub fn score(&self) -> &str {
        &self.score
    }

    pub fn set_score(&mut self, score: impl Into<String>) {
        self.score = score.into();
    }

    pub fn participants(&self) -> &[PlayerHandle] {
        &self.participants
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.participants.iter().any(|p| p == name)
    }

    /// Select or deselect a participant. Deselecting the winner clears it.
    pub fn toggle_participant(&mut self, name: &str) {
        if let Some(pos) = self.participants.iter().position(|p| p == name) {
            self.participants.remove(pos);
            if self.winner.as_deref() == Some(name) {
                self.winner = None;
            }
        } else {
            self.participants.push(name.to_string());
        }
    }

    pub fn winner(&self) -> Option<&str> {
        self.winner.as_deref()
    }

    pub fn set_winner(&mut self, name: Option<&str>) {
        self.winner = name.map(str::to_string);
    }

    /// Current team slot of a player, `None` when unassigned
    pub fn team_of(&self, name: &str) -> Option<Team> {
        self.assignments
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, team)| *team)
    }

    /// Cycle a player unassigned → A → B → unassigned. Returns the new slot.
    pub fn cycle_team(&mut self, name: &str) -> Option<Team> {
        let next = match self.team_of(name) {
            None => Some(Team::A),
            Some(Team::A) => Some(Team::B),
            Some(Team::B) => None,
        };
        self.assign(name.to_string(), next);
        next
    }

    fn assign(&mut self, name: PlayerHandle, team: Option<Team>) {
        match (self.assignments.iter().position(|(n, _)| *n == name), team) {
            (Some(pos), Some(team)) => self.assignments[pos].1 = team,
            // Unassigning drops the slot; a later assignment goes to the end
            (Some(pos), None) => {
                self.assignments.remove(pos);
            }
            (None, Some(team)) => self.assignments.push((name, team)),
            (None, None) => {}
        }
    }

    /// Names assigned to one team, in assignment order
    pub fn roster(&self, team: Team) -> Vec<PlayerHandle> {
        self.assignments
            .iter()
            .filter(|(_, t)| *t == team)
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn winning_side(&self) -> Option<WinningSide> {
        self.winning_side
    }

    /// Cycle the winning side: none → Team A → Team B → Draw → Team A
    pub fn cycle_winning_side(&mut self) {
        self.winning_side = Some(match self.winning_side {
            None | Some(WinningSide::Draw) => WinningSide::TeamA,
            Some(WinningSide::TeamA) => WinningSide::TeamB,
            Some(WinningSide::TeamB) => WinningSide::Draw,
        });
    }

    /// Check the draft and produce the outcome it describes.
    pub fn validate(&self) -> Result<MatchOutcome, ValidationError> {
        match self.mode {
            MatchMode::Individual => {
                if self.participants.is_empty() {
                    return Err(ValidationError::NoParticipants);
                }
                let winner = self.winner.clone().ok_or(ValidationError::NoWinner)?;
                if !self.participants.contains(&winner) {
                    return Err(ValidationError::WinnerNotParticipant(winner));
                }
                Ok(MatchOutcome::Individual {
                    participants: self.participants.clone(),
                    winner,
                })
            }
            MatchMode::Team => {
                let team_a = self.roster(Team::A);
                let team_b = self.roster(Team::B);
                if team_a.is_empty() && team_b.is_empty() {
                    return Err(ValidationError::NoTeamPlayers);
                }
                let winning_team = self.winning_side.ok_or(ValidationError::NoWinningSide)?;
                Ok(MatchOutcome::Team {
                    team_a,
                    team_b,
                    winning_team,
                })
            }
        }
    }

    fn score_value(&self) -> Option<String> {
        let trimmed = self.score.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

/// Validate a draft and record it in the lobby.
///
/// Nothing in the lobby changes when validation fails. There is no duplicate
/// guard: recording the same draft twice logs two matches.
pub fn record_match(
    lobby: &mut Lobby,
    draft: &MatchDraft,
    today: NaiveDate,
) -> Result<Match, ValidationError> {
    let outcome = draft.validate()?;

    let logged = Match {
        id: generate_id("match"),
        date: today,
        sport: draft.sport,
        score: draft.score_value(),
        outcome,
    };

    apply_match(lobby, logged.clone());
    info!(
        lobby = %lobby.id,
        match_id = %logged.id,
        players = logged.participants().len(),
        "recorded match"
    );
    Ok(logged)
}

/// Prepend an already-built match and update every participant's stats.
pub fn apply_match(lobby: &mut Lobby, logged: Match) {
    for (name, result) in logged.results() {
        lobby.stats_entry(name).record(result);
    }
    lobby.matches.insert(0, logged);
}
