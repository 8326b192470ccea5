//! Match results and player statistics
//!
//! This module provides:
//! - The sport catalog matches are logged against
//! - The match logging engine (validation, recording, stat updates)
//! - Per-player win/loss/draw aggregates
//! - Leaderboard ranking with a derived win rate
//!
//! Stats are only ever incremented: matches are never edited or retracted,
//! so every entry keeps `matches_played == wins + losses + draws`.

pub mod leaderboard;
pub mod recorder;
pub mod sport;

pub use leaderboard::{position_of, rank, SortConfig, SortDirection, SortKey};
pub use recorder::{
    apply_match, record_match, Match, MatchDraft, MatchMode, MatchOutcome, Team, WinningSide,
};
pub use sport::Sport;

use crate::lobby::PlayerHandle;
use serde::{Deserialize, Serialize};

/// How a single player fared in one match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerResult {
    Win,
    Loss,
    Draw,
}

/// Lifetime statistics for one player within a lobby
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    /// Player display name
    pub player_name: PlayerHandle,
    /// Total matches played
    pub matches_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl PlayerStats {
    /// Create zeroed stats for a new player
    pub fn new(player_name: impl Into<PlayerHandle>) -> Self {
        PlayerStats {
            player_name: player_name.into(),
            ..Default::default()
        }
    }

    /// Count one match with the given result.
    pub fn record(&mut self, result: PlayerResult) {
        self.matches_played += 1;
        match result {
            PlayerResult::Win => self.wins += 1,
            PlayerResult::Loss => self.losses += 1,
            PlayerResult::Draw => self.draws += 1,
        }
    }

    /// Fraction of matches won, or `None` before the first match
    pub fn win_rate(&self) -> Option<f64> {
        if self.matches_played == 0 {
            None
        } else {
            Some(self.wins as f64 / self.matches_played as f64)
        }
    }

    /// Win rate as a rounded percentage, `N/A` with no matches
    pub fn win_rate_label(&self) -> String {
        match self.win_rate() {
            Some(rate) => format!("{}%", (rate * 100.0).round() as u32),
            None => "N/A".to_string(),
        }
    }

    /// Whether the counters agree with each other
    pub fn is_consistent(&self) -> bool {
        self.matches_played == self.wins + self.losses + self.draws
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stats_are_zero() {
        let stats = PlayerStats::new("Alex");
        assert_eq!(stats.player_name, "Alex");
        assert_eq!(stats.matches_played, 0);
        assert_eq!(stats.wins + stats.losses + stats.draws, 0);
        assert!(stats.is_consistent());
    }

    #[test]
    fn test_record_keeps_counters_consistent() {
        let mut stats = PlayerStats::new("Alex");
        stats.record(PlayerResult::Win);
        stats.record(PlayerResult::Loss);
        stats.record(PlayerResult::Draw);
        stats.record(PlayerResult::Win);

        assert_eq!(stats.matches_played, 4);
        assert_eq!(stats.wins, 2);
        assert_eq!(stats.losses, 1);
        assert_eq!(stats.draws, 1);
        assert!(stats.is_consistent());
    }

    #[test]
    fn test_win_rate() {
        let mut stats = PlayerStats::new("Jane");
        assert_eq!(stats.win_rate(), None);
        assert_eq!(stats.win_rate_label(), "N/A");

        stats.record(PlayerResult::Win);
        stats.record(PlayerResult::Win);
        stats.record(PlayerResult::Loss);
        assert!((stats.win_rate().unwrap() - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(stats.win_rate_label(), "67%");
    }

    #[test]
    fn test_win_rate_zero_wins() {
        let mut stats = PlayerStats::new("Mike");
        stats.record(PlayerResult::Draw);
        assert_eq!(stats.win_rate(), Some(0.0));
        assert_eq!(stats.win_rate_label(), "0%");
    }

    #[test]
    fn test_stats_json_shape() {
        let stats = PlayerStats::new("Alex");
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["player_name"], "Alex");
        assert_eq!(json["matches_played"], 0);
    }
}
