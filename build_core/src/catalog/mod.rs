//! Catalog - Immutable game data the calculator reads from

mod form;
mod modifier;
mod moves;
mod race;

pub use form::Form;
pub use modifier::{Modifier, ModifierBonus, ModifierCategory};
pub use moves::{Move, MoveCategory};
pub use race::{GrowthRule, GrowthTable, Race, Subrace};

use crate::config::ConfigError;
use crate::stat_block::StatBlock;
use crate::types::RaceMechanic;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Fixed stat preset a Majin can absorb
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcPreset {
    pub name: String,
    pub stats: StatBlock,
}

/// All catalogs the calculator consumes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub races: Vec<Race>,
    pub modifiers: Vec<Modifier>,
    pub moves: Vec<Move>,
    pub npcs: Vec<NpcPreset>,
}

impl Catalog {
    pub fn race(&self, name: &str) -> Option<&Race> {
        self.races.iter().find(|r| r.name == name)
    }

    pub fn race_by_code(&self, code: &str) -> Option<&Race> {
        self.races.iter().find(|r| r.code == code)
    }

    /// Race selected when nothing else is known
    pub fn default_race(&self) -> Option<&Race> {
        self.races.first()
    }

    pub fn modifier(&self, index: usize) -> Option<&Modifier> {
        self.modifiers.get(index)
    }

    pub fn modifier_index(&self, name: &str) -> Option<usize> {
        self.modifiers.iter().position(|m| m.name == name)
    }

    pub fn move_at(&self, index: usize) -> Option<&Move> {
        self.moves.get(index)
    }

    pub fn npc(&self, name: &str) -> Option<&NpcPreset> {
        self.npcs.iter().find(|n| n.name == name)
    }

    /// Races a possessing race may inhabit. Races with a mechanic of their
    /// own are excluded.
    pub fn possession_targets(&self) -> impl Iterator<Item = &Race> {
        self.races.iter().filter(|r| r.mechanic.is_none())
    }

    /// Moves `race` may slot, with their catalog index
    pub fn moves_for<'a>(
        &'a self,
        race: &'a Race,
        subrace: Option<&'a str>,
    ) -> impl Iterator<Item = (usize, &'a Move)> + 'a {
        let resolved = race.resolve_subrace(subrace).map(|s| s.name.as_str());
        self.moves
            .iter()
            .enumerate()
            .filter(move |(_, m)| m.is_available_to(&race.name, resolved))
    }

    /// Check cross-references and value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.races.is_empty() {
            return Err(ConfigError::ValidationError("catalog has no races".to_string()));
        }

        let mut names = HashSet::new();
        let mut codes = HashSet::new();
        for race in &self.races {
            if !names.insert(race.name.as_str()) {
                return Err(invalid(format!("duplicate race name '{}'", race.name)));
            }
            if !codes.insert(race.code.as_str()) {
                return Err(invalid(format!("duplicate race code '{}'", race.code)));
            }

            let tables = std::iter::once(&race.growth).chain(race.subraces.iter().map(|s| &s.growth));
            for table in tables {
                if let Some((stat, _)) = table.iter().find(|(_, rule)| rule.every == 0) {
                    return Err(invalid(format!(
                        "race '{}' grows {} every 0 levels",
                        race.name,
                        stat.key()
                    )));
                }
            }

            for form in &race.forms {
                if let Some(only) = &form.subrace {
                    if race.subrace(only).is_none() {
                        return Err(invalid(format!(
                            "form '{}' of race '{}' names unknown subrace '{}'",
                            form.name, race.name, only
                        )));
                    }
                }
            }
        }

        for mechanic in [RaceMechanic::Absorption, RaceMechanic::Possession] {
            let count = self.races.iter().filter(|r| r.has_mechanic(mechanic)).count();
            if count > 1 {
                return Err(invalid(format!("{:?} is assigned to {} races", mechanic, count)));
            }
        }

        let mut modifier_names = HashSet::new();
        for modifier in &self.modifiers {
            if !modifier_names.insert(modifier.name.as_str()) {
                return Err(invalid(format!("duplicate modifier '{}'", modifier.name)));
            }
            if !modifier.affects_stats && !modifier.stat_bonuses.is_empty() {
                return Err(invalid(format!(
                    "modifier '{}' lists stat bonuses but does not affect stats",
                    modifier.name
                )));
            }
        }

        let mut move_names = HashSet::new();
        for mv in &self.moves {
            if !move_names.insert(mv.name.as_str()) {
                return Err(invalid(format!("duplicate move '{}'", mv.name)));
            }
        }

        Ok(())
    }
}

fn invalid(message: String) -> ConfigError {
    ConfigError::ValidationError(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stat_block::StatTable;

    fn race(name: &str, code: &str) -> Race {
        Race {
            name: name.to_string(),
            code: code.to_string(),
            growth: StatTable::from_fn(|_| GrowthRule::new(1.0, 2)),
            forms: Vec::new(),
            subraces: Vec::new(),
            mechanic: None,
        }
    }

    #[test]
    fn test_lookup_by_code() {
        let catalog = Catalog {
            races: vec![race("Human", "H"), race("Alien", "AL")],
            ..Default::default()
        };
        assert_eq!(catalog.race_by_code("AL").map(|r| r.name.as_str()), Some("Alien"));
        assert!(catalog.race_by_code("X").is_none());
        assert_eq!(catalog.default_race().map(|r| r.name.as_str()), Some("Human"));
    }

    #[test]
    fn test_validate_rejects_duplicate_codes() {
        let catalog = Catalog {
            races: vec![race("Human", "H"), race("Hero", "H")],
            ..Default::default()
        };
        assert!(matches!(catalog.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let mut bad = race("Human", "H");
        bad.growth.speed.every = 0;
        let catalog = Catalog {
            races: vec![bad],
            ..Default::default()
        };
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_second_absorber() {
        let mut a = race("Majin", "M");
        a.mechanic = Some(RaceMechanic::Absorption);
        let mut b = race("Cell", "C");
        b.mechanic = Some(RaceMechanic::Absorption);
        let catalog = Catalog {
            races: vec![a, b],
            ..Default::default()
        };
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_hidden_bonuses() {
        let mut modifier = Modifier::new("Odd Capsule", ModifierCategory::Passive);
        modifier
            .stat_bonuses
            .insert(crate::types::StatKind::Speed, ModifierBonus::flat(1.0));
        let catalog = Catalog {
            races: vec![race("Human", "H")],
            modifiers: vec![modifier],
            ..Default::default()
        };
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn test_possession_targets_skip_mechanic_races() {
        let mut majin = race("Majin", "M");
        majin.mechanic = Some(RaceMechanic::Absorption);
        let mut tuffle = race("Tuffle", "T");
        tuffle.mechanic = Some(RaceMechanic::Possession);
        let catalog = Catalog {
            races: vec![race("Human", "H"), majin, tuffle, race("Saiyan", "S")],
            ..Default::default()
        };
        let names: Vec<&str> = catalog.possession_targets().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Human", "Saiyan"]);
    }

    #[test]
    fn test_empty_catalog_is_invalid() {
        assert!(Catalog::default().validate().is_err());
    }
}
