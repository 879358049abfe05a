//! StatBlock - The seven-stat shape used by every stage of the calculator

mod accumulator;

pub use accumulator::{FormStep, Stage, StageSnapshot, StatAccumulator, StatBreakdown};

use crate::types::StatKind;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One value per stat.
///
/// Growth tables, stat blocks, manual allocations and NPC presets all share
/// this shape so no per-stat map can silently miss a field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatTable<T> {
    pub hp_max: T,
    pub ki_max: T,
    pub melee_damage: T,
    pub ki_damage: T,
    pub melee_resistance: T,
    pub ki_resistance: T,
    pub speed: T,
}

/// Dense numeric stat values
pub type StatBlock = StatTable<f64>;

impl<T> StatTable<T> {
    /// Build a table by evaluating `f` for each stat in order
    pub fn from_fn(mut f: impl FnMut(StatKind) -> T) -> Self {
        StatTable {
            hp_max: f(StatKind::HpMax),
            ki_max: f(StatKind::KiMax),
            melee_damage: f(StatKind::MeleeDamage),
            ki_damage: f(StatKind::KiDamage),
            melee_resistance: f(StatKind::MeleeResistance),
            ki_resistance: f(StatKind::KiResistance),
            speed: f(StatKind::Speed),
        }
    }

    pub fn get(&self, stat: StatKind) -> &T {
        match stat {
            StatKind::HpMax => &self.hp_max,
            StatKind::KiMax => &self.ki_max,
            StatKind::MeleeDamage => &self.melee_damage,
            StatKind::KiDamage => &self.ki_damage,
            StatKind::MeleeResistance => &self.melee_resistance,
            StatKind::KiResistance => &self.ki_resistance,
            StatKind::Speed => &self.speed,
        }
    }

    pub fn get_mut(&mut self, stat: StatKind) -> &mut T {
        match stat {
            StatKind::HpMax => &mut self.hp_max,
            StatKind::KiMax => &mut self.ki_max,
            StatKind::MeleeDamage => &mut self.melee_damage,
            StatKind::KiDamage => &mut self.ki_damage,
            StatKind::MeleeResistance => &mut self.melee_resistance,
            StatKind::KiResistance => &mut self.ki_resistance,
            StatKind::Speed => &mut self.speed,
        }
    }

    /// Iterate `(stat, value)` pairs in `StatKind` order
    pub fn iter(&self) -> impl Iterator<Item = (StatKind, &T)> + '_ {
        StatKind::all().iter().map(move |s| (*s, self.get(*s)))
    }

    /// Transform every value, keeping the stat it belongs to
    pub fn map<U>(&self, mut f: impl FnMut(StatKind, &T) -> U) -> StatTable<U> {
        StatTable::from_fn(|s| f(s, self.get(s)))
    }
}

impl<T> Index<StatKind> for StatTable<T> {
    type Output = T;

    fn index(&self, stat: StatKind) -> &T {
        self.get(stat)
    }
}

impl<T> IndexMut<StatKind> for StatTable<T> {
    fn index_mut(&mut self, stat: StatKind) -> &mut T {
        self.get_mut(stat)
    }
}

impl StatTable<f64> {
    /// All stats zero
    pub fn zero() -> Self {
        StatTable::default()
    }

    /// Every stat set to `value`
    pub fn splat(value: f64) -> Self {
        StatTable::from_fn(|_| value)
    }

    pub fn set(&mut self, stat: StatKind, value: f64) {
        *self.get_mut(stat) = value;
    }

    /// Sum of all seven values
    pub fn sum(&self) -> f64 {
        self.iter().map(|(_, v)| *v).sum()
    }

    /// Per-stat addition
    pub fn plus(&self, other: &StatBlock) -> StatBlock {
        StatTable::from_fn(|s| self[s] + other[s])
    }

    pub fn is_zero(&self) -> bool {
        self.iter().all(|(_, v)| *v == 0.0)
    }
}
