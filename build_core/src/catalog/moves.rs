//! Moves and their race eligibility

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveCategory {
    Ki,
    Melee,
    Other,
    RaceExclusive,
    Event,
}

impl MoveCategory {
    pub fn name(&self) -> &'static str {
        match self {
            MoveCategory::Ki => "Ki",
            MoveCategory::Melee => "Melee",
            MoveCategory::Other => "Other",
            MoveCategory::RaceExclusive => "Race-Exclusive",
            MoveCategory::Event => "Event",
        }
    }
}

/// A move that can be slotted in a loadout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Move {
    pub name: String,
    pub category: MoveCategory,
    /// `None` means every race. Entries are race names or `Race:Subrace`.
    #[serde(default)]
    pub allowed_races: Option<Vec<String>>,
}

impl Move {
    /// Whether `race` (with its resolved subrace) may slot this move
    pub fn is_available_to(&self, race: &str, subrace: Option<&str>) -> bool {
        let Some(allowed) = &self.allowed_races else {
            return true;
        };
        allowed.iter().any(|entry| match entry.split_once(':') {
            Some((r, s)) => r == race && subrace == Some(s),
            None => entry == race,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn restricted(races: &[&str]) -> Move {
        Move {
            name: "Sleep".to_string(),
            category: MoveCategory::RaceExclusive,
            allowed_races: Some(races.iter().map(|r| r.to_string()).collect()),
        }
    }

    #[test]
    fn test_unrestricted_move() {
        let mv = Move {
            name: "Kamehameha".to_string(),
            category: MoveCategory::Ki,
            allowed_races: None,
        };
        assert!(mv.is_available_to("Android", None));
    }

    #[test]
    fn test_subrace_entry() {
        let mv = restricted(&["Majin", "Alien:Beerus"]);
        assert!(mv.is_available_to("Majin", None));
        assert!(mv.is_available_to("Alien", Some("Beerus")));
        assert!(!mv.is_available_to("Alien", Some("Generic")));
        assert!(!mv.is_available_to("Human", None));
    }

    #[test]
    fn test_plain_race_entry_covers_all_subraces() {
        let mv = restricted(&["Human", "Alien"]);
        assert!(mv.is_available_to("Alien", Some("Pikon")));
        assert!(mv.is_available_to("Alien", None));
    }
}
