//! Leaderboard ranking over a lobby's player stats

use super::PlayerStats;
use std::cmp::Ordering;

/// Win-rate value used for players without matches; below any real rate.
const NO_MATCHES_RATE: f64 = -1.0;

/// Column a leaderboard can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    MatchesPlayed,
    Wins,
    Losses,
    Draws,
    WinRate,
}

impl SortKey {
    /// All keys in column order
    pub const ALL: [SortKey; 5] = [
        SortKey::MatchesPlayed,
        SortKey::Wins,
        SortKey::Losses,
        SortKey::Draws,
        SortKey::WinRate,
    ];

    /// Column header
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::MatchesPlayed => "MP",
            SortKey::Wins => "W",
            SortKey::Losses => "L",
            SortKey::Draws => "D",
            SortKey::WinRate => "Win %",
        }
    }

    fn value(&self, stats: &PlayerStats) -> f64 {
        match self {
            SortKey::MatchesPlayed => stats.matches_played as f64,
            SortKey::Wins => stats.wins as f64,
            SortKey::Losses => stats.losses as f64,
            SortKey::Draws => stats.draws as f64,
            SortKey::WinRate => stats.win_rate().unwrap_or(NO_MATCHES_RATE),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Active sort column and direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortConfig {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortConfig {
    fn default() -> Self {
        SortConfig {
            key: SortKey::Wins,
            direction: SortDirection::Descending,
        }
    }
}

impl SortConfig {
    /// Apply a header click.
    ///
    /// Clicking the active column while descending switches to ascending;
    /// every other click sorts descending by the clicked column.
    pub fn request(&mut self, key: SortKey) {
        let direction = if self.key == key && self.direction == SortDirection::Descending {
            SortDirection::Ascending
        } else {
            SortDirection::Descending
        };
        *self = SortConfig { key, direction };
    }
}

/// Rank stats by the configured column.
///
/// The sort is stable: tied players keep their input order. The input is
/// left untouched.
pub fn rank(stats: &[PlayerStats], config: SortConfig) -> Vec<PlayerStats> {
    let mut ranked = stats.to_vec();
    ranked.sort_by(|a, b| compare(a, b, config));
    ranked
}

/// Position of a player in a ranking, 1-based
pub fn position_of(ranked: &[PlayerStats], player_name: &str) -> Option<usize> {
    ranked
        .iter()
        .position(|s| s.player_name == player_name)
        .map(|i| i + 1)
}

/// Compare two players the way the leaderboard would.
pub fn compare(a: &PlayerStats, b: &PlayerStats, config: SortConfig) -> Ordering {
    let ordering = config.key.value(a).total_cmp(&config.key.value(b));
    match config.direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(name: &str, played: u32, wins: u32, losses: u32, draws: u32) -> PlayerStats {
        PlayerStats {
            player_name: name.to_string(),
            matches_played: played,
            wins,
            losses,
            draws,
        }
    }

    fn names(ranked: &[PlayerStats]) -> Vec<&str> {
        ranked.iter().map(|s| s.player_name.as_str()).collect()
    }

    #[test]
    fn test_default_config() {
        let config = SortConfig::default();
        assert_eq!(config.key, SortKey::Wins);
        assert_eq!(config.direction, SortDirection::Descending);
    }

    #[test]
    fn test_wins_descending_then_toggle() {
        let input = vec![stats("Jane", 2, 0, 1, 1), stats("Alex", 2, 1, 0, 1)];
        let mut config = SortConfig::default();

        assert_eq!(names(&rank(&input, config)), vec!["Alex", "Jane"]);

        config.request(SortKey::Wins);
        assert_eq!(config.direction, SortDirection::Ascending);
        assert_eq!(names(&rank(&input, config)), vec!["Jane", "Alex"]);
    }

    #[test]
    fn test_request_new_key_resets_to_descending() {
        let mut config = SortConfig::default();
        config.request(SortKey::Wins); // ascending
        config.request(SortKey::Losses);
        assert_eq!(
            config,
            SortConfig {
                key: SortKey::Losses,
                direction: SortDirection::Descending
            }
        );
    }

    #[test]
    fn test_request_third_click_back_to_descending() {
        let mut config = SortConfig::default();
        config.request(SortKey::Draws);
        config.request(SortKey::Draws);
        config.request(SortKey::Draws);
        assert_eq!(config.direction, SortDirection::Descending);
    }

    #[test]
    fn test_stable_ties() {
        let input = vec![
            stats("A", 3, 1, 2, 0),
            stats("B", 5, 1, 4, 0),
            stats("C", 1, 1, 0, 0),
            stats("D", 2, 2, 0, 0),
        ];
        let config = SortConfig::default();

        let first = rank(&input, config);
        assert_eq!(names(&first), vec!["D", "A", "B", "C"]);

        // Sorting again (even the already-sorted output) keeps tie order
        let second = rank(&first, config);
        assert_eq!(names(&second), names(&first));
        assert_eq!(names(&rank(&input, config)), names(&first));

        let ascending = SortConfig {
            key: SortKey::Wins,
            direction: SortDirection::Ascending,
        };
        assert_eq!(names(&rank(&input, ascending)), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_win_rate_zero_matches_last_descending() {
        let input = vec![
            stats("Fresh", 0, 0, 0, 0),
            stats("Loser", 4, 0, 4, 0),
            stats("Newbie", 0, 0, 0, 0),
            stats("Winner", 2, 2, 0, 0),
            stats("Mid", 4, 2, 1, 1),
        ];
        let config = SortConfig {
            key: SortKey::WinRate,
            direction: SortDirection::Descending,
        };

        let ranked = rank(&input, config);
        assert_eq!(names(&ranked), vec!["Winner", "Mid", "Loser", "Fresh", "Newbie"]);
    }

    #[test]
    fn test_win_rate_zero_matches_first_ascending() {
        let input = vec![stats("Loser", 4, 0, 4, 0), stats("Fresh", 0, 0, 0, 0)];
        let config = SortConfig {
            key: SortKey::WinRate,
            direction: SortDirection::Ascending,
        };
        assert_eq!(names(&rank(&input, config)), vec!["Fresh", "Loser"]);
    }

    #[test]
    fn test_rank_does_not_mutate_input() {
        let input = vec![stats("B", 1, 0, 1, 0), stats("A", 1, 1, 0, 0)];
        let snapshot = input.clone();
        let _ = rank(&input, SortConfig::default());
        assert_eq!(input, snapshot);
    }

    #[test]
    fn test_rank_empty() {
        assert!(rank(&[], SortConfig::default()).is_empty());
    }

    #[test]
    fn test_position_of() {
        let ranked = rank(
            &[stats("B", 1, 0, 1, 0), stats("A", 1, 1, 0, 0)],
            SortConfig::default(),
        );
        assert_eq!(position_of(&ranked, "A"), Some(1));
        assert_eq!(position_of(&ranked, "B"), Some(2));
        assert_eq!(position_of(&ranked, "Z"), None);
    }

    #[test]
    fn test_compare_matches_rank() {
        let a = stats("A", 2, 2, 0, 0);
        let b = stats("B", 2, 1, 1, 0);
        assert_eq!(compare(&a, &b, SortConfig::default()), Ordering::Less);
        assert_eq!(
            compare(
                &a,
                &b,
                SortConfig {
                    key: SortKey::Losses,
                    direction: SortDirection::Descending
                }
            ),
            Ordering::Greater
        );
    }

    #[test]
    fn test_labels() {
        let labels: Vec<_> = SortKey::ALL.iter().map(SortKey::label).collect();
        assert_eq!(labels, vec!["MP", "W", "L", "D", "Win %"]);
    }
}
