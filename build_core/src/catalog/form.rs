//! Form - A transformation with tiered strength

use crate::types::{BonusType, MasteryMultipliers, StatKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A togglable transformation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Form {
    pub name: String,
    /// Stackable forms can be active alongside any other form
    #[serde(default)]
    pub stackable: bool,
    /// Contribution mode for every stat without an override
    #[serde(default)]
    pub bonus_type: BonusType,
    /// Bonus magnitude per stat; unlisted stats are untouched
    #[serde(default)]
    pub bonus_stats: BTreeMap<StatKind, f64>,
    /// Stats applied at their raw value regardless of mastery
    #[serde(default)]
    pub ignore_mastery: BTreeSet<StatKind>,
    /// Per-stat override of `bonus_type`
    #[serde(default)]
    pub stat_bonus_types: BTreeMap<StatKind, BonusType>,
    #[serde(default)]
    pub mastery_multipliers: Option<MasteryMultipliers>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Only selectable by this subrace of the owning race
    #[serde(default)]
    pub subrace: Option<String>,
}

impl Form {
    pub fn new(name: impl Into<String>, bonus_type: BonusType) -> Self {
        Form {
            name: name.into(),
            stackable: false,
            bonus_type,
            bonus_stats: BTreeMap::new(),
            ignore_mastery: BTreeSet::new(),
            stat_bonus_types: BTreeMap::new(),
            mastery_multipliers: None,
            tags: Vec::new(),
            subrace: None,
        }
    }

    pub fn with_bonus(mut self, stat: StatKind, value: f64) -> Self {
        self.bonus_stats.insert(stat, value);
        self
    }

    pub fn stackable(mut self) -> Self {
        self.stackable = true;
        self
    }

    pub fn ignoring_mastery(mut self, stat: StatKind) -> Self {
        self.ignore_mastery.insert(stat);
        self
    }

    pub fn with_stat_type(mut self, stat: StatKind, bonus_type: BonusType) -> Self {
        self.stat_bonus_types.insert(stat, bonus_type);
        self
    }

    pub fn with_multipliers(mut self, multipliers: MasteryMultipliers) -> Self {
        self.mastery_multipliers = Some(multipliers);
        self
    }

    /// Bonus type used for `stat`, honoring per-stat overrides
    pub fn effective_bonus_type(&self, stat: StatKind) -> BonusType {
        self.stat_bonus_types
            .get(&stat)
            .copied()
            .unwrap_or(self.bonus_type)
    }

    /// Tier multipliers, custom or default
    pub fn multipliers(&self) -> MasteryMultipliers {
        self.mastery_multipliers.unwrap_or_default()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Whether a character of the given (resolved) subrace may use this form
    pub fn available_to(&self, subrace: Option<&str>) -> bool {
        match &self.subrace {
            None => true,
            Some(only) => subrace == Some(only.as_str()),
        }
    }
}
