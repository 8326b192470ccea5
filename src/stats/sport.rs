//! Fixed sport catalog for logged matches

use serde::{Deserialize, Serialize};

/// A sport a match can be logged for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Sport {
    #[default]
    #[serde(rename = "Box Cricket")]
    BoxCricket,
    Football,
    Badminton,
    Pickleball,
    #[serde(rename = "Cricket Nets")]
    CricketNets,
    Tennis,
    #[serde(rename = "Table Tennis")]
    TableTennis,
}

impl Sport {
    /// All sports in catalog order
    pub const ALL: [Sport; 7] = [
        Sport::BoxCricket,
        Sport::Football,
        Sport::Badminton,
        Sport::Pickleball,
        Sport::CricketNets,
        Sport::Tennis,
        Sport::TableTennis,
    ];

    /// Display name
    pub fn label(&self) -> &'static str {
        match self {
            Sport::BoxCricket => "Box Cricket",
            Sport::Football => "Football",
            Sport::Badminton => "Badminton",
            Sport::Pickleball => "Pickleball",
            Sport::CricketNets => "Cricket Nets",
            Sport::Tennis => "Tennis",
            Sport::TableTennis => "Table Tennis",
        }
    }

    /// The next sport in the catalog, wrapping around.
    pub fn next(&self) -> Sport {
        let index = Self::ALL.iter().position(|s| s == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

impl std::fmt::Display for Sport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_first_in_catalog() {
        assert_eq!(Sport::default(), Sport::ALL[0]);
    }

    #[test]
    fn test_next_wraps() {
        assert_eq!(Sport::BoxCricket.next(), Sport::Football);
        assert_eq!(Sport::TableTennis.next(), Sport::BoxCricket);
    }

    #[test]
    fn test_serializes_as_display_name() {
        let json = serde_json::to_string(&Sport::TableTennis).unwrap();
        assert_eq!(json, r#""Table Tennis""#);
        let back: Sport = serde_json::from_str(r#""Cricket Nets""#).unwrap();
        assert_eq!(back, Sport::CricketNets);
    }

    #[test]
    fn test_labels_match_serialized_names() {
        for sport in Sport::ALL {
            let json = serde_json::to_string(&sport).unwrap();
            assert_eq!(json, format!("\"{}\"", sport.label()));
        }
    }
}
