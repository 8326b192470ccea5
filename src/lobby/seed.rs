//! Built-in demo lobbies, written to the store on first launch

use super::{ChatAuthor, ChatMessage, Lobby};
use crate::stats::{apply_match, Match, MatchOutcome, PlayerStats, Sport, WinningSide};
use chrono::NaiveDate;

fn avatar(tag: &str) -> String {
    format!("https://i.pravatar.cc/150?u={}", tag)
}

fn message(id: &str, name: &str, tag: &str, text: &str, timestamp: &str) -> ChatMessage {
    ChatMessage {
        id: id.to_string(),
        user: ChatAuthor::new(name, avatar(tag)),
        text: text.to_string(),
        timestamp: timestamp.to_string(),
    }
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, d).unwrap_or_default()
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|n| n.to_string()).collect()
}

/// The demo dataset.
///
/// Stats are derived by replaying the matches, oldest first, so every
/// participant has a consistent entry.
pub fn demo_lobbies() -> Vec<Lobby> {
    vec![badminton_legends(), sunday_football()]
}

fn badminton_legends() -> Lobby {
    let mut lobby = Lobby {
        id: "lobby-1".to_string(),
        name: "Badminton Legends".to_string(),
        description: "Evening doubles at Urban Sports Hub. All levels welcome.".to_string(),
        avatar_url: "https://source.unsplash.com/400x400/?sports,badminton".to_string(),
        admin_id: "u1".to_string(),
        members: names(&["Alex Morgan", "Jane Doe", "Mike Ross"]),
        chat: vec![
            message(
                "cm1",
                "Jane Doe",
                "jane",
                "Anyone up for a game of badminton tomorrow evening at Urban Sports Hub?",
                "10:30 AM",
            ),
            message(
                "cm2",
                "Alex Morgan",
                "alexmorgan",
                "Count me in. I'll book Court A for 5 PM.",
                "10:41 AM",
            ),
        ],
        matches: Vec::new(),
        stats: vec![
            PlayerStats::new("Alex Morgan"),
            PlayerStats::new("Jane Doe"),
            PlayerStats::new("Mike Ross"),
        ],
    };

    apply_match(
        &mut lobby,
        Match {
            id: "match-1".to_string(),
            date: day(14),
            sport: Sport::Badminton,
            score: Some("21-18".to_string()),
            outcome: MatchOutcome::Individual {
                participants: names(&["Alex Morgan", "Jane Doe"]),
                winner: "Jane Doe".to_string(),
            },
        },
    );
    apply_match(
        &mut lobby,
        Match {
            id: "match-2".to_string(),
            date: day(16),
            sport: Sport::Badminton,
            score: None,
            outcome: MatchOutcome::Team {
                team_a: names(&["Alex Morgan", "Mike Ross"]),
                team_b: names(&["Jane Doe"]),
                winning_team: WinningSide::TeamA,
            },
        },
    );
    lobby
}

fn sunday_football() -> Lobby {
    let mut lobby = Lobby {
        id: "lobby-2".to_string(),
        name: "Sunday Football Club".to_string(),
        description: "5-a-side every Sunday morning at PowerPlay Turf.".to_string(),
        avatar_url: "https://source.unsplash.com/400x400/?sports,football".to_string(),
        admin_id: "u2".to_string(),
        members: names(&["Mike Ross", "Jane Doe"]),
        chat: vec![message(
            "cm3",
            "Mike Ross",
            "mike",
            "Looking for a +1 for football at PowerPlay Turf this weekend. We need a striker!",
            "10:32 AM",
        )],
        matches: Vec::new(),
        stats: vec![PlayerStats::new("Mike Ross"), PlayerStats::new("Jane Doe")],
    };

    apply_match(
        &mut lobby,
        Match {
            id: "match-3".to_string(),
            date: day(15),
            sport: Sport::Football,
            score: Some("3-3".to_string()),
            outcome: MatchOutcome::Team {
                team_a: names(&["Mike Ross"]),
                team_b: names(&["Jane Doe"]),
                winning_team: WinningSide::Draw,
            },
        },
    );
    lobby
}
