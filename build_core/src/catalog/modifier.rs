//! Modifier - Equippable capsule with optional stat effects

use crate::types::StatKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Capsule grouping shown by the loadout picker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierCategory {
    Active,
    Passive,
    RaidDungeon,
    Halloween,
}

impl ModifierCategory {
    pub fn name(&self) -> &'static str {
        match self {
            ModifierCategory::Active => "Active",
            ModifierCategory::Passive => "Passive",
            ModifierCategory::RaidDungeon => "Raid/Dungeon",
            ModifierCategory::Halloween => "Halloween",
        }
    }
}

/// Bonus to one stat
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModifierBonus {
    pub value: f64,
    /// `stats[s] = floor(stats[s] * (1 + value))` instead of `+= value`
    #[serde(default)]
    pub percentage: bool,
}

impl ModifierBonus {
    pub fn flat(value: f64) -> Self {
        ModifierBonus { value, percentage: false }
    }

    pub fn percent(value: f64) -> Self {
        ModifierBonus { value, percentage: true }
    }
}

/// An equippable catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modifier {
    pub name: String,
    pub category: ModifierCategory,
    /// `false` for capsules whose effect is not modeled by the calculator
    #[serde(default)]
    pub affects_stats: bool,
    #[serde(default)]
    pub stat_bonuses: BTreeMap<StatKind, ModifierBonus>,
    #[serde(default)]
    pub description: String,
}

impl Modifier {
    pub fn new(name: impl Into<String>, category: ModifierCategory) -> Self {
        Modifier {
            name: name.into(),
            category,
            affects_stats: false,
            stat_bonuses: BTreeMap::new(),
            description: String::new(),
        }
    }

    /// Add a stat bonus; marks the modifier as stat-affecting
    pub fn with_bonus(mut self, stat: StatKind, bonus: ModifierBonus) -> Self {
        self.affects_stats = true;
        self.stat_bonuses.insert(stat, bonus);
        self
    }

    /// Bonuses that reach the stat pipeline
    pub fn effective_bonuses(&self) -> impl Iterator<Item = (StatKind, &ModifierBonus)> + '_ {
        self.stat_bonuses
            .iter()
            .filter(move |_| self.affects_stats)
            .map(|(s, b)| (*s, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosmetic_modifier_has_no_effect() {
        let mut modifier = Modifier::new("Garden Capsule", ModifierCategory::Active);
        modifier.stat_bonuses.insert(StatKind::HpMax, ModifierBonus::flat(10.0));
        assert_eq!(modifier.effective_bonuses().count(), 0);
    }

    #[test]
    fn test_parse_from_toml() {
        let toml = r#"
name = "Weighted Clothing"
category = "passive"
affects_stats = true
description = "Reduces speed"

[stat_bonuses]
speed = { value = -0.5, percentage = true }
"#;
        let modifier: Modifier = toml::from_str(toml).unwrap();
        let bonus = modifier.stat_bonuses[&StatKind::Speed];
        assert!(bonus.percentage);
        assert!((bonus.value + 0.5).abs() < f64::EPSILON);
        assert_eq!(modifier.effective_bonuses().count(), 1);
    }

    #[test]
    fn test_category_names() {
        assert_eq!(ModifierCategory::RaidDungeon.name(), "Raid/Dungeon");
    }
}
